//! Persistence port.
//!
//! The engine never talks to a storage transport directly. Every entity kind
//! is mirrored through a [`Collection`]: `get_all`, `create`, `update` with a
//! typed partial patch, `delete`, and an optional change stream whose notices
//! carry no payload. Consumers react to a notice by re-fetching everything.
//!
//! ```text
//! validate -> compute -> collection write -> (ok) apply to snapshot
//!                                         -> (err) snapshot untouched
//! ```

mod error;
mod memory;
mod patch;
#[cfg(test)]
pub(crate) mod testing;

pub use error::StoreError;
pub use memory::MemoryCollection;
pub use patch::merge_patch;

use std::fmt::{Debug, Display};
use std::hash::Hash;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;

/// A record kind the engine persists.
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Typed identifier.
    type Id: Copy + Eq + Hash + Debug + Display + Serialize + Send + Sync + 'static;
    /// Partial update document; fields left `None` must not serialize.
    type Patch: Serialize + Send + Sync;

    /// Fixed storage key for this kind (also the local store key).
    const KIND: &'static str;

    /// Returns the record's identifier.
    fn id(&self) -> Self::Id;
}

/// "Something in this collection changed". Carries no delta on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeNotice {
    /// The entity kind that changed.
    pub kind: &'static str,
}

/// Storage collaborator for one entity kind.
#[async_trait]
pub trait Collection<E: Entity>: Send + Sync {
    /// Fetches every record, in creation order.
    async fn get_all(&self) -> Result<Vec<E>, StoreError>;

    /// Persists a new record and returns it as stored.
    async fn create(&self, record: E) -> Result<E, StoreError>;

    /// Merges `patch` into the stored record.
    async fn update(&self, id: E::Id, patch: &E::Patch) -> Result<(), StoreError>;

    /// Removes a record.
    async fn delete(&self, id: E::Id) -> Result<(), StoreError>;

    /// Change notifications, or `None` when the backend has no stream
    /// (local-only mode, where the engine is the sole writer).
    fn subscribe(&self) -> Option<broadcast::Receiver<ChangeNotice>>;
}
