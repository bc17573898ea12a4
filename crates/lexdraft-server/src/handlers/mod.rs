//! HTTP request handlers for the web server.

mod api;
pub mod api_types;
mod helpers;
pub mod openapi;
mod tasks_api;

// Re-export handlers for use by the router
pub use api::{health, list_tasks};
pub use openapi::openapi_spec;
pub use tasks_api::{chat, run_task};
