//! Notes Server Library
//!
//! This crate provides a small JSON-over-HTTP resource server for notes and
//! phonebook entries, backed either by process memory or by a document
//! database.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Configuration, error handling, server construction, and the HTTP transport
//! - **domains**: Business logic organized by bounded contexts
//!   - **resources**: Resource definitions, validation, id generation, and handlers
//!   - **storage**: The in-memory and document-collection stores
//!
//! # Example
//!
//! ```rust,no_run
//! use notes_server::core::{Config, HttpTransport, ResourceServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = ResourceServer::from_config(config.clone())?;
//!     HttpTransport::new(config.http).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, ResourceServer, Result};
