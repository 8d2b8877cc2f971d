//! Test doubles for the persistence port.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::{ChangeNotice, Collection, Entity, MemoryCollection, StoreError};

/// Memory collection whose writes can be switched to fail.
pub(crate) struct FlakyCollection<E: Entity> {
    inner: MemoryCollection<E>,
    failing: AtomicBool,
    fail_after: AtomicUsize,
}

impl<E: Entity> FlakyCollection<E> {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryCollection::new(),
            failing: AtomicBool::new(false),
            fail_after: AtomicUsize::new(usize::MAX),
        })
    }

    /// Every write fails while `on` is set.
    pub(crate) fn fail_writes(&self, on: bool) {
        self.failing.store(on, Ordering::SeqCst);
    }

    /// The next `n` writes succeed, the one after fails, later ones succeed.
    pub(crate) fn fail_after(&self, n: usize) {
        self.fail_after.store(n, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::backend("injected failure"));
        }
        let remaining = self.fail_after.load(Ordering::SeqCst);
        if remaining == 0 {
            self.fail_after.store(usize::MAX, Ordering::SeqCst);
            return Err(StoreError::backend("injected failure"));
        }
        if remaining != usize::MAX {
            self.fail_after.store(remaining - 1, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[async_trait]
impl<E: Entity> Collection<E> for FlakyCollection<E> {
    async fn get_all(&self) -> Result<Vec<E>, StoreError> {
        self.inner.get_all().await
    }

    async fn create(&self, record: E) -> Result<E, StoreError> {
        self.check()?;
        self.inner.create(record).await
    }

    async fn update(&self, id: E::Id, patch: &E::Patch) -> Result<(), StoreError> {
        self.check()?;
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: E::Id) -> Result<(), StoreError> {
        self.check()?;
        self.inner.delete(id).await
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<ChangeNotice>> {
        self.inner.subscribe()
    }
}
