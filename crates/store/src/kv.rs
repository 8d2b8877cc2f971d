//! Key-value text stores.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parcela_core::store::StoreError;
use tokio::sync::Mutex;
use tracing::debug;

/// A store of text values under fixed string keys.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Reads the value under `key`, `None` if it was never written.
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the value under `key`.
    async fn write(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    root: PathBuf,
}

impl FileKvStore {
    /// Store rooted at `root`; the directory is created on first write.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path(key)).await {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::backend(format!("reading {key}: {err}"))),
        }
    }

    async fn write(&self, key: &str, value: String) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|err| StoreError::backend(format!("creating {}: {err}", self.root.display())))?;

        // Staged write, then an atomic rename over the old file.
        let staging = self.root.join(format!(".{key}.json.tmp"));
        tokio::fs::write(&staging, value)
            .await
            .map_err(|err| StoreError::backend(format!("writing {key}: {err}")))?;
        tokio::fs::rename(&staging, self.path(key))
            .await
            .map_err(|err| StoreError::backend(format!("replacing {key}: {err}")))?;

        debug!(key, root = %self.root.display(), "Local store key written");
        Ok(())
    }
}

/// A store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}
