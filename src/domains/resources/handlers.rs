//! HTTP handlers for a resource collection.
//!
//! Handlers are generic over the [`ResourceDefinition`], so every collection
//! gets the same routes and status codes. Path ids are passed to the service
//! as plain strings.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use super::definitions::ResourceDefinition;
use super::payload::Payload;
use super::service::ResourceService;
use crate::core::transport::ApiError;

/// `GET /api/<collection>`
pub async fn list<R: ResourceDefinition>(
    State(service): State<ResourceService<R>>,
) -> Result<Json<Vec<R>>, ApiError> {
    Ok(Json(service.list().await?))
}

/// `GET /api/<collection>/{id}`
pub async fn get_one<R: ResourceDefinition>(
    State(service): State<ResourceService<R>>,
    Path(id): Path<String>,
) -> Result<Json<R>, ApiError> {
    Ok(Json(service.get(&id).await?))
}

/// `POST /api/<collection>`
pub async fn create<R: ResourceDefinition>(
    State(service): State<ResourceService<R>>,
    payload: Payload,
) -> Result<Json<R>, ApiError> {
    Ok(Json(service.create(&payload).await?))
}

/// `PUT /api/<collection>/{id}`
pub async fn replace<R: ResourceDefinition>(
    State(service): State<ResourceService<R>>,
    Path(id): Path<String>,
    payload: Payload,
) -> Result<Json<R>, ApiError> {
    Ok(Json(service.replace(&id, &payload).await?))
}

/// `DELETE /api/<collection>/{id}`
///
/// Always 204 unless the backend fails.
pub async fn delete<R: ResourceDefinition>(
    State(service): State<ResourceService<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
