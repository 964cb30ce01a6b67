//! Resource service implementation.
//!
//! The ResourceService is what handlers talk to. It validates payloads
//! before anything reaches the store, so an invalid request never produces a
//! partial write or consumes an id.

use std::sync::Arc;
use tracing::info;

use super::definitions::ResourceDefinition;
use super::error::ResourceError;
use super::payload::Payload;
use crate::domains::storage::{ResourceStore, SharedStore};

/// Result type for resource service operations.
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Service for one resource collection.
pub struct ResourceService<R: ResourceDefinition> {
    store: SharedStore<R>,
}

impl<R: ResourceDefinition> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<R: ResourceDefinition> ResourceService<R> {
    /// Create a service over the given store.
    pub fn new(store: SharedStore<R>) -> Self {
        Self { store }
    }

    /// Create a service owning `store`.
    pub fn from_store(store: impl ResourceStore<R> + 'static) -> Self {
        Self::new(Arc::new(store))
    }

    /// Name of the backing store.
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// List every resource.
    pub async fn list(&self) -> ResourceResult<Vec<R>> {
        Ok(self.store.list().await?)
    }

    /// Fetch one resource.
    pub async fn get(&self, id: &str) -> ResourceResult<R> {
        Ok(self.store.get(id).await?)
    }

    /// Validate `payload` and store it under a new id.
    pub async fn create(&self, payload: &Payload) -> ResourceResult<R> {
        let draft = R::validate(payload)?;
        Ok(self.store.create(draft).await?)
    }

    /// Replace the resource with this id by `payload` merged over it.
    pub async fn replace(&self, id: &str, payload: &Payload) -> ResourceResult<R> {
        Ok(self.store.replace(id, payload).await?)
    }

    /// Delete the resource with this id, if present.
    pub async fn delete(&self, id: &str) -> ResourceResult<()> {
        Ok(self.store.delete(id).await?)
    }

    /// Number of resources.
    pub async fn count(&self) -> ResourceResult<usize> {
        Ok(self.store.count().await?)
    }

    /// Fill an empty collection with the definition's sample data.
    ///
    /// Returns how many resources were created.
    pub async fn seed_if_empty(&self) -> ResourceResult<usize> {
        if self.count().await? > 0 {
            return Ok(0);
        }

        let samples = R::samples();
        let created = samples.len();
        for draft in samples {
            self.store.create(draft).await?;
        }

        info!(
            collection = R::COLLECTION,
            count = created,
            "Seeded empty collection"
        );
        Ok(created)
    }
}
