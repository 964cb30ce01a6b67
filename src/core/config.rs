//! Configuration management for the resource server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults.

use super::error::{Error, Result};
use super::transport::HttpConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Main configuration structure for the resource server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP listener configuration.
    pub http: HttpConfig,

    /// Where collections are kept.
    pub storage: StorageConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server, shown on the landing page.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Which [`ResourceStore`](crate::domains::storage::ResourceStore) backs the
/// collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process memory; nothing survives a restart.
    Memory,
    /// The document database named by `database_url`.
    Document,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "" => Ok(Self::Memory),
            "document" | "sqlite" => Ok(Self::Document),
            other => Err(Error::config(format!(
                "unknown store backend `{other}` (expected `memory` or `document`)"
            ))),
        }
    }
}

/// Storage configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend name as configured; parsed by [`StorageConfig::backend`].
    pub backend: String,

    /// Connection string for the document backend.
    pub database_url: Option<String>,

    /// Seed empty collections with sample data on startup.
    pub seed: bool,
}

/// Custom Debug implementation to redact the connection string, which may
/// carry credentials.
impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("backend", &self.backend)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("seed", &self.seed)
            .finish()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
            seed: true,
        }
    }
}

impl StorageConfig {
    /// The configured backend.
    pub fn backend(&self) -> Result<StoreBackend> {
        self.backend.parse()
    }

    /// The connection string, if set and non-blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "notes-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            http: HttpConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `NOTES_`.
    /// For example: `NOTES_SERVER_NAME`, `NOTES_LOG_LEVEL`. A `.env` file in
    /// the working directory is read first if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("NOTES_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("NOTES_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("NOTES_LOG_TIMESTAMPS") {
            config.logging.with_timestamps = timestamps.parse().unwrap_or(true);
        }

        config.http = HttpConfig::from_env();

        if let Ok(backend) = std::env::var("NOTES_STORE") {
            config.storage.backend = backend;
        }

        if let Ok(url) = std::env::var("NOTES_DATABASE_URL") {
            config.storage.database_url = Some(url);
        }

        if let Ok(seed) = std::env::var("NOTES_SEED") {
            config.storage.seed = seed.to_lowercase() != "false" && seed != "0";
        }

        config
    }

    /// Check the configuration before anything is started.
    ///
    /// The document backend needs a connection string.
    pub fn validate(&self) -> Result<()> {
        match self.storage.backend()? {
            StoreBackend::Memory => Ok(()),
            StoreBackend::Document if self.storage.database_url().is_none() => Err(
                Error::config("NOTES_DATABASE_URL must be set when NOTES_STORE=document"),
            ),
            StoreBackend::Document => Ok(()),
        }
    }
}
