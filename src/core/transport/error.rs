//! Transport error types.
//!
//! [`TransportError`] covers the listener itself. [`ApiError`] is what a
//! request handler or middleware stage fails with; it is turned into an HTTP
//! response in exactly one place, its `IntoResponse` impl.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::domains::resources::{ResourceError, ValidationError};

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that can occur in transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to bind to address.
    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error during transport.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// HTTP-specific error.
    #[error("HTTP error: {0}")]
    HttpError(String),
}

impl TransportError {
    /// Create a bind error.
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::BindError {
            address: address.into(),
            source,
        }
    }

    /// Create an HTTP error.
    pub fn http(msg: impl Into<String>) -> Self {
        Self::HttpError(msg.into())
    }
}

/// A request that failed, mapped to a status code and body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required field missing or mistyped. 400 with the message.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No resource with the requested id. 404 with an empty body.
    #[error("No resource with id {0}")]
    NotFound(String),

    /// The request body was not usable JSON. 400.
    #[error("{0}")]
    MalformedInput(String),

    /// The request body exceeded the configured limit. 413.
    #[error("request entity too large")]
    PayloadTooLarge,

    /// The store failed. 500; details are logged, never sent.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Nothing is routed at this method and path. 404.
    #[error("unknown endpoint")]
    UnknownRoute,
}

impl ApiError {
    /// Create a malformed input error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    /// Status code sent for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::UnknownRoute => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::BackendUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ResourceError> for ApiError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::Validation(e) => Self::Validation(e),
            ResourceError::NotFound(id) => Self::NotFound(id),
            ResourceError::Storage(msg) => Self::BackendUnavailable(msg),
        }
    }
}

/// JSON body `{"error": message}`.
pub fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::NotFound(_) => status.into_response(),
            Self::BackendUnavailable(detail) => {
                error!(error = %detail, "Request failed in storage backend");
                error_body(status, "internal server error")
            }
            other => error_body(status, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let response = ApiError::from(ValidationError::Missing("content")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "content missing"}));
    }

    #[tokio::test]
    async fn test_backend_error_hides_details() {
        let response =
            ApiError::BackendUnavailable("disk I/O error at /var/db".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "internal server error"})
        );
    }

    #[tokio::test]
    async fn test_not_found_has_empty_body() {
        let response = ApiError::NotFound("3".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_resource_error_mapping() {
        let api: ApiError = ResourceError::Storage("down".into()).into();
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::UnknownRoute.status(), StatusCode::NOT_FOUND);
    }
}
