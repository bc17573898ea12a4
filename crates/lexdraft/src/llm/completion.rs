//! Completion client abstraction.

use async_trait::async_trait;
use thiserror::Error;

/// Something that can run one model inference from a system instruction and
/// a user instruction.
///
/// Agents hold this behind an `Arc<dyn CompletionClient>` so tests can swap
/// in fakes and the process builds the real client exactly once.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Submit `(system, user)` and return the generated text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError>;
}

/// Errors from a completion call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("LLM is disabled")]
    Disabled,
}
