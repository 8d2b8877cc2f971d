//! Local persistence for the Parcela engine.
//!
//! This crate provides:
//! - The [`KvStore`] abstraction over a key-value text store
//! - A file-backed store (one JSON file per key) and an in-memory one
//! - [`LocalCollection`], which mirrors a whole entity kind under one key
//!
//! Used when no remote collaborator is available. Every write rewrites the
//! full collection and no change notices are emitted.

pub mod collection;
pub mod kv;

pub use collection::LocalCollection;
pub use kv::{FileKvStore, KvStore, MemoryKvStore};

use std::sync::Arc;

use parcela_core::Backends;
use parcela_core::debt::DebtBalance;
use parcela_core::observation::Observation;
use parcela_core::partial::PartialPayment;
use parcela_core::personal::PersonalExpense;
use parcela_core::schedule::Purchase;
use parcela_shared::config::StoreConfig;

/// Collections for every entity kind, all backed by `store`.
pub fn local_backends<S: KvStore + 'static>(store: Arc<S>) -> Backends {
    Backends {
        purchases: Arc::new(LocalCollection::<Purchase, S>::new(store.clone())),
        debts: Arc::new(LocalCollection::<DebtBalance, S>::new(store.clone())),
        partial_payments: Arc::new(LocalCollection::<PartialPayment, S>::new(store.clone())),
        observations: Arc::new(LocalCollection::<Observation, S>::new(store.clone())),
        personal_expenses: Arc::new(LocalCollection::<PersonalExpense, S>::new(store)),
    }
}

/// File-backed collections rooted at the configured data directory.
#[must_use]
pub fn open_local(config: &StoreConfig) -> Backends {
    local_backends(Arc::new(FileKvStore::new(&config.data_dir)))
}
