//! In-memory collection with change notifications.
//!
//! Used for the no-persistence configuration and as the reference
//! collaborator in tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::{ChangeNotice, Collection, Entity, StoreError, merge_patch};

const NOTICE_CAPACITY: usize = 64;

/// A collection kept in process memory, in creation order.
pub struct MemoryCollection<E: Entity> {
    records: Mutex<Vec<E>>,
    notices: broadcast::Sender<ChangeNotice>,
}

impl<E: Entity> MemoryCollection<E> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Creates a collection pre-filled with `records`.
    #[must_use]
    pub fn with_records(records: Vec<E>) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            records: Mutex::new(records),
            notices,
        }
    }

    fn records(&self) -> Result<MutexGuard<'_, Vec<E>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::backend(format!("{} collection lock poisoned", E::KIND)))
    }

    fn notify(&self) {
        // No subscribers is fine.
        let _ = self.notices.send(ChangeNotice { kind: E::KIND });
    }
}

impl<E: Entity> Default for MemoryCollection<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Collection<E> for MemoryCollection<E> {
    async fn get_all(&self) -> Result<Vec<E>, StoreError> {
        Ok(self.records()?.clone())
    }

    async fn create(&self, record: E) -> Result<E, StoreError> {
        {
            let mut records = self.records()?;
            if records.iter().any(|r| r.id() == record.id()) {
                return Err(StoreError::Duplicate {
                    kind: E::KIND,
                    id: record.id().to_string(),
                });
            }
            records.push(record.clone());
        }
        self.notify();
        Ok(record)
    }

    async fn update(&self, id: E::Id, patch: &E::Patch) -> Result<(), StoreError> {
        {
            let mut records = self.records()?;
            let slot = records
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or_else(|| StoreError::not_found(E::KIND, id))?;
            *slot = merge_patch(slot, patch)?;
        }
        self.notify();
        Ok(())
    }

    async fn delete(&self, id: E::Id) -> Result<(), StoreError> {
        {
            let mut records = self.records()?;
            let before = records.len();
            records.retain(|r| r.id() != id);
            if records.len() == before {
                return Err(StoreError::not_found(E::KIND, id));
            }
        }
        self.notify();
        Ok(())
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<ChangeNotice>> {
        Some(self.notices.subscribe())
    }
}
