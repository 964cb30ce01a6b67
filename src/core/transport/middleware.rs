//! Request pipeline stages wrapped around the router.
//!
//! Order, outermost first:
//! 1. panic translation ([`panic_response`], via `CatchPanicLayer`)
//! 2. body parsing ([`parse_json_body`])
//! 3. request logging ([`log_request`])
//! 4. the routes, then [`unknown_endpoint`] when nothing matched
//!
//! Errors returned by handlers become responses through
//! [`ApiError`]'s `IntoResponse` impl.

use axum::body::{Body, to_bytes};
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;
use bytes::Bytes;
use http_body_util::LengthLimitError;
use serde_json::Value;
use std::any::Any;
use std::error::Error as StdError;
use std::time::Instant;
use tracing::{error, info, warn};

use super::error::{ApiError, error_body};
use crate::domains::resources::Payload;

/// Largest request body the parser will buffer.
#[derive(Debug, Clone, Copy)]
pub struct BodyLimit(pub usize);

/// The decoded JSON body, stored in request extensions by [`parse_json_body`].
///
/// `None` when the request carried no JSON body.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Option<Value>);

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            let mime = ct.split(';').next().unwrap_or_default().trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

/// Decode a JSON request body before any handler runs.
///
/// Bodies without a JSON content type are passed through undecoded. The raw
/// bytes are put back on the request either way.
pub async fn parse_json_body(
    State(BodyLimit(limit)): State<BodyLimit>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = req.into_parts();

    let bytes: Bytes = to_bytes(body, limit).await.map_err(|e| {
        warn!(path = parts.uri.path(), error = %e, "Rejected request body");
        if exceeds_limit(&e) {
            ApiError::PayloadTooLarge
        } else {
            ApiError::malformed("request body could not be read")
        }
    })?;

    let parsed = if is_json(&parts.headers) && !bytes.is_empty() {
        let value = serde_json::from_slice::<Value>(&bytes).map_err(|e| {
            warn!(path = parts.uri.path(), error = %e, "Malformed JSON body");
            ApiError::malformed("malformatted JSON")
        })?;
        Some(value)
    } else {
        None
    };

    parts.extensions.insert(JsonBody(parsed));
    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

fn exceeds_limit(err: &axum::Error) -> bool {
    let mut cause: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = cause {
        if e.is::<LengthLimitError>() {
            return true;
        }
        cause = e.source();
    }
    false
}

/// Log method, path, and body of every routed request with its outcome.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let body = match req.extensions().get::<JsonBody>() {
        Some(JsonBody(Some(value))) => value.to_string(),
        _ => "-".to_owned(),
    };
    let started_at = Instant::now();

    let response = next.run(req).await;

    info!(
        %method,
        %path,
        %body,
        status = response.status().as_u16(),
        elapsed_ms = started_at.elapsed().as_millis() as u64,
        "Handled request"
    );
    response
}

/// Terminal handler for requests no route matched.
pub async fn unknown_endpoint() -> ApiError {
    ApiError::UnknownRoute
}

/// Response for a handler that panicked.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Handler panicked");
    error_body(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}

impl<S: Send + Sync> FromRequestParts<S> for Payload {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<JsonBody>() {
            Some(JsonBody(Some(value))) => Payload::from_value(value.clone())
                .ok_or_else(|| ApiError::malformed("request body must be a JSON object")),
            _ => Ok(Payload::new()),
        }
    }
}
