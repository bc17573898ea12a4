//! Task and chat endpoints.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use lexdraft::Task;

use super::super::AppState;
use super::api_types::{ApiResponse, ChatRequest, ChatResponse, TaskRequest, TaskResponse};
use super::helpers::{bad_gateway, not_found};

/// Run a chunked task over a document.
#[utoipa::path(
    post,
    path = "/api/tasks/{task}",
    params(("task" = String, Path, description = "Task name, e.g. summary or contract-analysis")),
    request_body = TaskRequest,
    responses(
        (status = 200, description = "Joined task output", body = TaskResponse),
        (status = 404, description = "Unknown task"),
        (status = 502, description = "Completion API failed")
    ),
    tag = "Tasks"
)]
pub async fn run_task(
    State(state): State<AppState>,
    Path(task_name): Path<String>,
    Json(body): Json<TaskRequest>,
) -> impl IntoResponse {
    let Some(task) = Task::from_str(&task_name) else {
        return not_found(format!("Unknown task: {}", task_name)).into_response();
    };

    let chunks = state.assistant.chunk_count(&body.document);
    match state.assistant.try_run(task, &body.document).await {
        Ok(output) => ApiResponse::ok(TaskResponse {
            task: task.name().to_string(),
            output,
            chunks,
        })
        .into_response(),
        Err(e) => bad_gateway(e.to_string()).into_response(),
    }
}

/// Ask a question about a whole document.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Model answer", body = ChatResponse),
        (status = 502, description = "Completion API failed; message is a fixed apology")
    ),
    tag = "Chat"
)]
pub async fn chat(State(state): State<AppState>, Json(body): Json<ChatRequest>) -> impl IntoResponse {
    match state
        .assistant
        .try_chat(&body.document, body.question.as_deref())
        .await
    {
        Ok(answer) => ApiResponse::ok(ChatResponse { answer }).into_response(),
        Err(_) => bad_gateway(lexdraft::prompts::CHAT_APOLOGY).into_response(),
    }
}
