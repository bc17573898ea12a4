//! Router configuration for the web server.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, options, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check for container orchestration
        .route("/health", get(handlers::health))
        // Task API - chunked document processing
        .route("/api/tasks", get(handlers::list_tasks))
        .route("/api/tasks/:task", post(handlers::run_task))
        // Chat API - whole-document question answering
        .route("/api/chat", post(handlers::chat))
        // OpenAPI spec
        .route("/api", options(handlers::openapi_spec))
        .route("/api/openapi.json", get(handlers::openapi_spec))
        // Documents have no size cap; chunking handles large inputs
        .layer(DefaultBodyLimit::disable())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
