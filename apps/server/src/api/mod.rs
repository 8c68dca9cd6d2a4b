//! API layer - routes, handlers, and middleware

pub mod handlers;
pub mod middleware;
pub mod routes;

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;

use crate::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.server.max_request_body_size;
    let cors_origins = state.config.server.cors_origins.clone();
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Catalog API routes
        .nest("/api", routes::api_routes())
        // Add state
        .with_state(state)
        // Add middleware (applied in reverse order: the deadline sits inside
        // the request-id span so timeouts are still logged with their id)
        .layer(axum::middleware::from_fn(move |req, next| {
            middleware::deadline(request_timeout, req, next)
        }))
        .layer(middleware::compression())
        .layer(middleware::cors(&cors_origins))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        // Limit request body size to prevent DoS via large payloads
        .layer(DefaultBodyLimit::max(max_body_size))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "catalog-server"
    }))
}
