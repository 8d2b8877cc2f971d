//! Whole-collection mirroring onto a key-value store.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use parcela_core::store::{ChangeNotice, Collection, Entity, StoreError, merge_patch};
use tokio::sync::{Mutex, broadcast};
use tracing::debug;

use crate::kv::KvStore;

/// Stores every record of `E` as one JSON array under `E::KIND`.
///
/// Writes are read-modify-write of the full array, serialized by an
/// in-process lock.
pub struct LocalCollection<E: Entity, S: KvStore> {
    store: Arc<S>,
    write_lock: Mutex<()>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, S: KvStore> LocalCollection<E, S> {
    /// Collection for `E` inside `store`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            _entity: PhantomData,
        }
    }

    async fn load(&self) -> Result<Vec<E>, StoreError> {
        match self.store.read(E::KIND).await? {
            Some(text) if !text.trim().is_empty() => Ok(serde_json::from_str(&text)?),
            _ => Ok(Vec::new()),
        }
    }

    async fn save(&self, records: &[E]) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(records)?;
        self.store.write(E::KIND, text).await?;
        debug!(kind = E::KIND, count = records.len(), "Collection saved locally");
        Ok(())
    }
}

#[async_trait]
impl<E: Entity, S: KvStore + 'static> Collection<E> for LocalCollection<E, S> {
    async fn get_all(&self) -> Result<Vec<E>, StoreError> {
        self.load().await
    }

    async fn create(&self, record: E) -> Result<E, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::Duplicate {
                kind: E::KIND,
                id: record.id().to_string(),
            });
        }
        records.push(record.clone());
        self.save(&records).await?;
        Ok(record)
    }

    async fn update(&self, id: E::Id, patch: &E::Patch) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let slot = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| StoreError::not_found(E::KIND, id))?;
        records[slot] = merge_patch(&records[slot], patch)?;
        self.save(&records).await
    }

    async fn delete(&self, id: E::Id) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(StoreError::not_found(E::KIND, id));
        }
        self.save(&records).await
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<ChangeNotice>> {
        None
    }
}
