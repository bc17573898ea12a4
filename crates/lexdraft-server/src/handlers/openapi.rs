//! OpenAPI spec generation and serving.

use axum::{http::StatusCode, response::IntoResponse};
use utoipa::OpenApi;

use super::api;
use super::api_types;
use super::tasks_api;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "lexdraft API",
        description = "Legal document summaries, reviews, drafts and chat over hosted LLMs"
    ),
    paths(
        // Health
        api::health,
        // Tasks
        api::list_tasks,
        tasks_api::run_task,
        // Chat
        tasks_api::chat,
    ),
    components(schemas(
        // Envelope types
        api_types::EmptyContext,
        api_types::ErrorData,
        // Task types
        api_types::TaskInfo,
        api_types::TaskRequest,
        api_types::TaskResponse,
        // Chat types
        api_types::ChatRequest,
        api_types::ChatResponse,
    )),
    tags(
        (name = "Health", description = "Health check"),
        (name = "Tasks", description = "Chunked legal document tasks"),
        (name = "Chat", description = "Questions about a whole document"),
    )
)]
struct ApiDoc;

/// Serve the OpenAPI spec as JSON.
pub async fn openapi_spec() -> impl IntoResponse {
    let spec = ApiDoc::openapi()
        .to_json()
        .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e));
    (StatusCode::OK, [("content-type", "application/json")], spec)
}
