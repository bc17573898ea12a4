//! lexdraft - legal document processing over hosted LLM completion APIs.
//!
//! Core library exposing the chunker, prompt templates, completion client
//! and task agents for the workspace crates.

// Task names use `from_str` methods that return Option<Self>,
// not Result<Self, Error> as std::str::FromStr requires.
#![allow(clippy::should_implement_trait)]

pub mod agents;
pub mod chunker;
pub mod config;
pub mod llm;
pub mod prompts;

pub use agents::{AgentOptions, ChatError, LegalAssistant, TaskError, TaskEvent};
pub use chunker::{chunk_document, DEFAULT_MAX_CHUNK_CHARS};
pub use config::{Config, ConfigError};
pub use llm::{CompletionClient, CompletionError, LlmClient, LlmConfig};
pub use prompts::Task;
