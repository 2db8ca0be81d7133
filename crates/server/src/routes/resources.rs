//! `/resources` handlers. Every response body is an `Envelope`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use common::types::Envelope;
use service::resources::{Resource, ResourceInput, ResourceStore};

use crate::errors::ApiError;

/// Shared handler state: the store injected at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResourceStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedOutput {
    pub id: String,
}

/// GET /resources/:id
pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Resource>>, ApiError> {
    let resource = state.store.get(&id).await?;
    Ok(Json(Envelope::data(resource)))
}

/// POST /resources/ -- a body `id` is dropped; the store assigns one.
pub async fn create_resource(
    State(state): State<AppState>,
    payload: Result<Json<ResourceInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let id = state.store.create(input).await;
    let location = format!("/resources/{id}");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(Envelope::data(CreatedOutput { id })),
    ))
}

/// PUT /resources/:id -- the path id selects the target; the body never does.
pub async fn update_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ResourceInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<()>>), ApiError> {
    let Json(input) = payload?;
    state.store.update(input.into_resource(id)).await?;
    Ok((StatusCode::ACCEPTED, Json(Envelope::empty())))
}

/// DELETE /resources/:id -- succeeds for unknown ids too.
pub async fn delete_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Envelope<()>>) {
    state.store.delete(&id).await;
    (StatusCode::ACCEPTED, Json(Envelope::empty()))
}
