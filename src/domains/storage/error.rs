//! Store error types.

use thiserror::Error;

use super::document::DocumentError;
use crate::domains::resources::{IdsExhausted, ValidationError};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a [`ResourceStore`](super::ResourceStore) can return.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No resource with this id.
    #[error("No resource with id {0}")]
    NotFound(String),

    /// A merged replacement did not pass validation.
    #[error("Invalid resource: {0}")]
    Invalid(#[from] ValidationError),

    /// The collection cannot issue another id.
    #[error("Cannot create resource: {0}")]
    Exhausted(#[from] IdsExhausted),

    /// The document backend failed.
    #[error("Document store error: {0}")]
    Backend(#[from] DocumentError),
}

impl StoreError {
    /// Create a new "not found" error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }
}
