//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the resource
//! server, including error handling, configuration, server construction,
//! and the HTTP transport.

pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use config::{Config, StoreBackend};
pub use error::{Error, Result};
pub use server::ResourceServer;
pub use transport::{HttpConfig, HttpTransport};
