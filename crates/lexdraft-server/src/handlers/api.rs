//! Health and discovery endpoints.

use axum::{http::StatusCode, response::IntoResponse};
use lexdraft::Task;

use super::api_types::{ApiResponse, TaskInfo};

/// Health check endpoint for container orchestration.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is healthy")
    ),
    tag = "Health"
)]
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// List the chunked tasks this server can run.
#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "Available tasks", body = Vec<TaskInfo>)
    ),
    tag = "Tasks"
)]
pub async fn list_tasks() -> impl IntoResponse {
    let tasks: Vec<TaskInfo> = Task::all()
        .iter()
        .map(|task| TaskInfo {
            name: task.name().to_string(),
            description: task.description().to_string(),
        })
        .collect();

    ApiResponse::ok(tasks)
}
