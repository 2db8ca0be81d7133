use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::errors::ApiError;

pub mod resources;

pub use resources::AppState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn fallback() -> ApiError {
    ApiError::NotFound("route not found".into())
}

/// Known path, unsupported verb.
async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("method not allowed".into())
}

/// Build the full application router around an already constructed store.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let resource_routes = Router::new()
        .route(
            "/resources",
            post(resources::create_resource).fallback(method_not_allowed),
        )
        .route(
            "/resources/",
            post(resources::create_resource).fallback(method_not_allowed),
        )
        .route(
            "/resources/:id",
            get(resources::get_resource)
                .put(resources::update_resource)
                .delete(resources::delete_resource)
                .fallback(method_not_allowed),
        );

    Router::new()
        .route("/health", get(health).fallback(method_not_allowed))
        .merge(resource_routes)
        .fallback(fallback)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
