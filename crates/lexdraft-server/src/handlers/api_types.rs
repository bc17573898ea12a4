//! Typed API request and response types for OpenAPI spec generation.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard API response envelope.
///
/// Every endpoint returns this wrapper:
/// ```json
/// { "error": false, "context": {}, "data": { ... } }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<C: Serialize, T: Serialize> {
    pub error: bool,
    pub context: C,
    pub data: T,
}

/// Empty context for responses without metadata.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct EmptyContext {}

/// Error payload inside the envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorData {
    pub message: String,
}

impl ApiResponse<EmptyContext, ErrorData> {
    pub fn error(status: StatusCode, message: impl Into<String>) -> impl IntoResponse {
        (
            status,
            Json(ApiResponse {
                error: true,
                context: EmptyContext {},
                data: ErrorData {
                    message: message.into(),
                },
            }),
        )
    }
}

impl<T: Serialize> ApiResponse<EmptyContext, T> {
    pub fn ok(data: T) -> Json<ApiResponse<EmptyContext, T>> {
        Json(ApiResponse {
            error: false,
            context: EmptyContext {},
            data,
        })
    }
}

/// Task entry returned by `GET /api/tasks`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskInfo {
    pub name: String,
    pub description: String,
}

/// Body of `POST /api/tasks/{task}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TaskRequest {
    /// Full document text. Chunked before it is sent to the model.
    pub document: String,
}

/// Result of a chunked task.
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskResponse {
    pub task: String,
    /// Space-joined outputs of every chunk, in document order.
    pub output: String,
    pub chunks: usize,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// Full document text. Sent whole, never chunked.
    pub document: String,
    pub question: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub answer: String,
}
