//! LLM integration for the legal document tasks.
//!
//! The agents only see the [`CompletionClient`] trait. [`LlmClient`] is the
//! HTTP implementation for OpenAI-compatible providers and Ollama.

mod client;
mod completion;

pub use client::{LlmAppConfig, LlmClient, LlmConfig, LlmDeviceConfig, LlmProvider};
pub use completion::{CompletionClient, CompletionError};
