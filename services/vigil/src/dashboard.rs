//! Reporting endpoint serving the status snapshot as JSON

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::registry::Registry;

/// Build the reporting axum router
pub fn build_router(registry: Arc<Registry>) -> Router {
    Router::new()
        .route("/", get(snapshot_handler))
        .route("/health", get(health_handler))
        .with_state(registry)
}

async fn snapshot_handler(State(registry): State<Arc<Registry>>) -> Response {
    let snapshot = registry.snapshot().await;

    match serde_json::to_vec(&snapshot) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to serialize snapshot: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
