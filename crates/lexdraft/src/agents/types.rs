//! Types shared by the task agents.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chunker::DEFAULT_MAX_CHUNK_CHARS;
use crate::llm::CompletionError;
use crate::prompts::Task;

/// Chunking and dispatch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, prefer::FromValue)]
pub struct AgentOptions {
    /// Maximum characters per chunk
    #[serde(default = "default_max_chunk_chars")]
    #[prefer(default)]
    pub max_chunk_chars: usize,
    /// Chunks submitted at once. 1 keeps the calls strictly sequential.
    #[serde(default = "default_concurrency")]
    #[prefer(default)]
    pub concurrency: usize,
}

fn default_max_chunk_chars() -> usize {
    DEFAULT_MAX_CHUNK_CHARS
}

fn default_concurrency() -> usize {
    1
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chunk_chars(),
            concurrency: default_concurrency(),
        }
    }
}

impl AgentOptions {
    /// Check if the options equal the default (for skip_serializing_if).
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Events emitted while a task runs.
/// Used by the CLI to drive a progress bar.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    Started { task: Task, total_chunks: usize },
    ChunkCompleted { index: usize },
    Failed { index: usize, error: String },
    Completed { total_chunks: usize },
}

/// A chunked task failed. No partial output is kept.
///
/// Displays as the task's failure prefix followed by the completion error,
/// e.g. `Error generating summary: API error: HTTP 500 ...`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}: {}", .task.failure_prefix(), .source)]
pub struct TaskError {
    pub task: Task,
    /// Index of the chunk whose completion failed.
    pub chunk_index: usize,
    #[source]
    pub source: CompletionError,
}

/// The chat completion failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Error in chat helper: {source}")]
pub struct ChatError {
    #[from]
    pub source: CompletionError,
}
