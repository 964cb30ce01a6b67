//! Resource-specific error types.

use thiserror::Error;

use crate::domains::storage::StoreError;

/// A payload was rejected before reaching the store.
///
/// The display text is what clients see in the `error` field of a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was absent or empty.
    #[error("{0} missing")]
    Missing(&'static str),

    /// A field was present with the wrong JSON type.
    #[error("{field} must be a {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },
}

impl ValidationError {
    /// The offending field name.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing(field) => field,
            Self::InvalidType { field, .. } => field,
        }
    }
}

/// Errors that can occur during resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The payload failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No resource with the given id exists.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The backing store could not complete the operation.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for ResourceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Invalid(e) => Self::Validation(e),
            other => Self::Storage(other.to_string()),
        }
    }
}
