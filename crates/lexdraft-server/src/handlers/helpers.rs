//! Error responses shared by the API handlers.

use axum::{http::StatusCode, response::IntoResponse};

use super::api_types::ApiResponse;

pub fn not_found(message: impl Into<String>) -> impl IntoResponse {
    ApiResponse::error(StatusCode::NOT_FOUND, message)
}

/// The upstream completion API failed.
pub fn bad_gateway(message: impl Into<String>) -> impl IntoResponse {
    ApiResponse::error(StatusCode::BAD_GATEWAY, message)
}
