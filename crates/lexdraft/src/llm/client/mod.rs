//! HTTP completion client.
//!
//! Supports OpenAI-compatible chat completion APIs (OpenAI, Groq, Together)
//! and the Ollama chat API for local inference.

mod config;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use config::{LlmAppConfig, LlmConfig, LlmDeviceConfig, LlmProvider};

use super::completion::{CompletionClient, CompletionError};
use crate::config::ConfigError;

/// LLM client for document processing.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// OpenAI-compatible chat completion request.
#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Option<Vec<OpenAiChoice>>,
    error: Option<OpenAiError>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    error: OpenAiError,
}

/// Ollama chat API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama chat API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: Option<OllamaResponseMessage>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    ///
    /// Fails when the provider needs a credential and none is configured, so
    /// a misconfigured process stops at startup instead of on the first call.
    pub fn new(config: LlmConfig) -> Result<Self, ConfigError> {
        if config.requires_api_key() && config.api_key().is_none() {
            return Err(ConfigError::MissingApiKey {
                provider: config.provider_name().to_string(),
                hint: config.availability_hint(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs()))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Get the config.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Check if the LLM service is reachable.
    pub async fn is_available(&self) -> bool {
        if !self.config.enabled() {
            return false;
        }
        match self.models_request().send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// List models offered by the provider.
    pub async fn list_models(&self) -> Result<Vec<String>, CompletionError> {
        let resp = self
            .models_request()
            .send()
            .await
            .map_err(|e| CompletionError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        #[derive(Deserialize)]
        struct OpenAiModels {
            data: Vec<OpenAiModel>,
        }

        #[derive(Deserialize)]
        struct OpenAiModel {
            id: String,
        }

        #[derive(Deserialize)]
        struct OllamaTags {
            models: Vec<OllamaModel>,
        }

        #[derive(Deserialize)]
        struct OllamaModel {
            name: String,
        }

        let models = match self.config.provider() {
            LlmProvider::OpenAI => {
                let list: OpenAiModels = resp
                    .json()
                    .await
                    .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;
                list.data.into_iter().map(|m| m.id).collect()
            }
            LlmProvider::Ollama => {
                let tags: OllamaTags = resp
                    .json()
                    .await
                    .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;
                tags.models.into_iter().map(|m| m.name).collect()
            }
        };

        Ok(models)
    }

    fn models_request(&self) -> reqwest::RequestBuilder {
        match self.config.provider() {
            LlmProvider::OpenAI => self.authorized(
                self.client
                    .get(format!("{}/v1/models", self.config.endpoint())),
            ),
            LlmProvider::Ollama => self
                .client
                .get(format!("{}/api/tags", self.config.endpoint())),
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key() {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Call an OpenAI-compatible chat completion endpoint.
    async fn call_openai(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let request = OpenAiRequest {
            model: self.config.model(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature(),
            max_tokens: self.config.max_tokens(),
        };

        let url = format!("{}/v1/chat/completions", self.config.endpoint());
        let resp = self
            .authorized(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let completion: OpenAiResponse = resp
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        if let Some(error) = completion.error {
            return Err(CompletionError::Api(error.message));
        }

        completion
            .choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                CompletionError::MalformedResponse("response contained no message content".into())
            })
    }

    /// Call the Ollama chat endpoint.
    async fn call_ollama(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let request = OllamaRequest {
            model: self.config.model(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature(),
                num_predict: self.config.max_tokens(),
            },
        };

        let url = format!("{}/api/chat", self.config.endpoint());
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let ollama_resp: OllamaResponse = resp
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        if let Some(error) = ollama_resp.error {
            return Err(CompletionError::Api(error));
        }

        ollama_resp.message.map(|m| m.content).ok_or_else(|| {
            CompletionError::MalformedResponse("response contained no message".into())
        })
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        if !self.config.enabled() {
            return Err(CompletionError::Disabled);
        }

        debug!(
            "Requesting completion from {} ({}), {} chars",
            self.config.provider_name(),
            self.config.model(),
            user.chars().count()
        );

        match self.config.provider() {
            LlmProvider::OpenAI => self.call_openai(system, user).await,
            LlmProvider::Ollama => self.call_ollama(system, user).await,
        }
    }
}

/// Map a non-success HTTP status to a completion error.
fn status_error(status: StatusCode, body: &str) -> CompletionError {
    let message = serde_json::from_str::<OpenAiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let detail = format!("HTTP {}: {}", status, message);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CompletionError::Authentication(detail),
        StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimited(detail),
        _ => CompletionError::Api(detail),
    }
}
