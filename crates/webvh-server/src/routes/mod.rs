//! API routes for the webvh server.

pub mod resources;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::store::ResourceStore;

/// Creates the main router with all routes mounted.
pub fn create_router(store: ResourceStore) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(resources::router(store))
        .layer(TraceLayer::new_for_http())
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
