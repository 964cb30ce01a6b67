//! Resource server construction and lifecycle.
//!
//! The server owns one store per collection, built once at startup from the
//! configuration and shared with the HTTP layer as router state. Nothing is
//! reached through globals.

use std::sync::Arc;
use tracing::info;

use super::config::{Config, StoreBackend};
use super::error::{Error, Result};
use crate::domains::resources::{Collections, Note, Person, ResourceService};
use crate::domains::storage::MemoryStore;

#[cfg(feature = "sqlite")]
use crate::domains::resources::ResourceDefinition;
#[cfg(feature = "sqlite")]
use crate::domains::storage::{DocumentStore, SqliteDatabase};

/// The resource server: configuration plus the collection registry.
#[derive(Clone)]
pub struct ResourceServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Every collection, each with its selected backend.
    collections: Collections,
}

impl ResourceServer {
    /// Create a server over already-built collections.
    pub fn new(config: Config, collections: Collections) -> Self {
        Self {
            config: Arc::new(config),
            collections,
        }
    }

    /// Build the configured backend for every collection.
    ///
    /// Fails if the configuration is invalid or the document backend cannot
    /// be opened.
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;

        let collections = match config.storage.backend()? {
            StoreBackend::Memory => Collections::new(
                ResourceService::from_store(MemoryStore::<Note>::new()),
                ResourceService::from_store(MemoryStore::<Person>::new()),
            ),
            StoreBackend::Document => Self::document_collections(&config)?,
        };

        info!(
            backend = collections.notes.backend(),
            "Collections initialized"
        );
        Ok(Self::new(config, collections))
    }

    #[cfg(feature = "sqlite")]
    fn document_collections(config: &Config) -> Result<Collections> {
        let url = config
            .storage
            .database_url()
            .ok_or_else(|| Error::config("missing database URL"))?;
        let db = SqliteDatabase::open(url)?;

        Ok(Collections::new(
            ResourceService::from_store(DocumentStore::<Note>::new(Arc::new(
                db.collection(Note::COLLECTION),
            ))),
            ResourceService::from_store(DocumentStore::<Person>::new(Arc::new(
                db.collection(Person::COLLECTION),
            ))),
        ))
    }

    #[cfg(not(feature = "sqlite"))]
    fn document_collections(_config: &Config) -> Result<Collections> {
        Err(Error::config(
            "document store support is not compiled in (enable the `sqlite` feature)",
        ))
    }

    /// Seed empty collections if the configuration asks for it.
    pub async fn seed(&self) -> Result<()> {
        if self.config.storage.seed {
            self.collections.seed_if_empty().await?;
        }
        Ok(())
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the collection registry.
    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    /// Name of the backend the collections use.
    pub fn backend(&self) -> &'static str {
        self.collections.notes.backend()
    }
}
