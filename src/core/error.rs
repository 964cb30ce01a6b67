//! Error types and handling for the resource server.
//!
//! This module defines a unified error type for startup and lifecycle
//! failures. Per-request failures use
//! [`ApiError`](super::transport::ApiError) instead.

use thiserror::Error;

/// A specialized Result type for server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the resource server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the resources domain.
    #[error("Resource error: {0}")]
    Resource(#[from] crate::domains::resources::ResourceError),

    /// Error opening or talking to the document backend.
    #[error("Storage error: {0}")]
    Storage(#[from] crate::domains::storage::DocumentError),

    /// Error from the HTTP listener.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from file operations or network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
