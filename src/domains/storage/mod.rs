//! Storage domain module.
//!
//! Collections are stored behind the [`ResourceStore`] trait. Two backends
//! implement it and are picked once at startup:
//!
//! - `memory.rs` - an ordered `Vec` owned by the process
//! - `document.rs` - an adapter over a [`DocumentCollection`] client
//! - `sqlite.rs` - the SQLite document collection (feature: `sqlite`)
//!
//! Swapping the backend changes latency and durability only. Ids, ordering,
//! not-found and idempotent-delete behavior are the same for both.

mod document;
mod error;
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use document::{Document, DocumentCollection, DocumentError, DocumentResult, DocumentStore, Filter};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteCollection, SqliteDatabase};

use async_trait::async_trait;
use std::sync::Arc;

use crate::domains::resources::{Payload, ResourceDefinition};

/// Shared handle to a store, as held by routers and services.
pub type SharedStore<R> = Arc<dyn ResourceStore<R>>;

/// Capability set every collection backend provides.
///
/// Calls may suspend on I/O, so the collection can change between two calls
/// made by the same request. Writes are last-write-wins.
#[async_trait]
pub trait ResourceStore<R: ResourceDefinition>: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Every resource, in insertion order.
    async fn list(&self) -> StoreResult<Vec<R>>;

    /// The resource with this id, or [`StoreError::NotFound`].
    async fn get(&self, id: &str) -> StoreResult<R>;

    /// Assign an id to `draft` and append it.
    async fn create(&self, draft: R::Draft) -> StoreResult<R>;

    /// Swap the resource with this id for `patch` merged over it.
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent and
    /// [`StoreError::Invalid`] if the merged value fails validation.
    async fn replace(&self, id: &str, patch: &Payload) -> StoreResult<R>;

    /// Remove the resource with this id. Absent ids are not an error.
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Number of stored resources.
    async fn count(&self) -> StoreResult<usize> {
        Ok(self.list().await?.len())
    }
}
