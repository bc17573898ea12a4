//! LLM client configuration.
//!
//! Split into two tiers:
//! - `LlmAppConfig`: From the config file (generation params, timeout)
//! - `LlmDeviceConfig`: From env vars, device-specific (provider, endpoint, model, api_key)
//!
//! Env vars: LEXDRAFT_PROVIDER, LEXDRAFT_MODEL, LEXDRAFT_ENDPOINT, LEXDRAFT_API_KEY
//! (OPENAI_API_KEY, GROQ_API_KEY, TOGETHER_API_KEY and OLLAMA_HOST also accepted)

use serde::{Deserialize, Serialize};

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI-compatible API (OpenAI, Groq, Together.ai, etc.)
    #[default]
    OpenAI,
    /// Ollama API (local, no credential)
    Ollama,
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" | "groq" | "together" => Some(Self::OpenAI),
            _ => None,
        }
    }
}

/// Application-level LLM config (from the config file).
/// Controls how generation behaves, not how to connect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, prefer::FromValue)]
pub struct LlmAppConfig {
    /// Whether LLM calls are enabled
    #[serde(default = "default_enabled")]
    #[prefer(default)]
    pub enabled: bool,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    #[prefer(default)]
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    #[prefer(default)]
    pub temperature: f32,
    /// HTTP timeout for a single completion call, in seconds
    #[serde(default = "default_timeout_secs")]
    #[prefer(default)]
    pub timeout_secs: u64,
}

/// Device-level LLM config (from env vars, varies per device).
/// Controls how to connect to the LLM backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmDeviceConfig {
    /// LLM provider (openai or ollama)
    pub provider: LlmProvider,
    /// API base URL (provider-specific defaults apply)
    pub endpoint: String,
    /// Model identifier
    pub model: String,
    /// API key for OpenAI-compatible providers
    pub api_key: Option<String>,
}

/// Combined LLM configuration (runtime).
///
/// Serde: only the app config is serialized/deserialized. Device config is
/// populated from environment variables during Default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct LlmConfig {
    /// Application-level settings (from file)
    #[serde(flatten)]
    #[prefer(flatten)]
    pub app: LlmAppConfig,
    /// Device-level settings (from env) - not serialized
    #[serde(skip)]
    #[prefer(skip)]
    pub device: LlmDeviceConfig,
}

fn default_enabled() -> bool {
    true
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    300
}

const OPENAI_ENDPOINT: &str = "https://api.openai.com";
const OPENAI_MODEL: &str = "gpt-4o-mini";
const GROQ_ENDPOINT: &str = "https://api.groq.com/openai";
const GROQ_MODEL: &str = "llama-3.3-70b-versatile";
const TOGETHER_ENDPOINT: &str = "https://api.together.xyz";
const TOGETHER_MODEL: &str = "meta-llama/Meta-Llama-3.1-70B-Instruct-Turbo";
const OLLAMA_ENDPOINT: &str = "http://localhost:11434";
const OLLAMA_MODEL: &str = "llama3.1:8b";

/// Endpoint, model and key variable for a named provider flavor.
fn flavor_defaults(flavor: &str) -> Option<(&'static str, &'static str, Option<&'static str>)> {
    match flavor {
        "openai" => Some((OPENAI_ENDPOINT, OPENAI_MODEL, Some("OPENAI_API_KEY"))),
        "groq" => Some((GROQ_ENDPOINT, GROQ_MODEL, Some("GROQ_API_KEY"))),
        "together" => Some((TOGETHER_ENDPOINT, TOGETHER_MODEL, Some("TOGETHER_API_KEY"))),
        "ollama" => Some((OLLAMA_ENDPOINT, OLLAMA_MODEL, None)),
        _ => None,
    }
}

// === LlmAppConfig implementations ===

impl Default for LlmAppConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmAppConfig {
    /// Check if the config equals the default (for skip_serializing_if).
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

// === LlmDeviceConfig implementations ===

impl Default for LlmDeviceConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl LlmDeviceConfig {
    /// Create device config from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create device config from an arbitrary variable lookup.
    ///
    /// Resolution order:
    /// - LEXDRAFT_PROVIDER picks the flavor (openai, groq, together, ollama).
    ///   Without it, the first of OPENAI_API_KEY / GROQ_API_KEY / TOGETHER_API_KEY
    ///   that is set picks the flavor, falling back to openai.
    /// - LEXDRAFT_ENDPOINT wins, then OLLAMA_HOST for ollama, then the flavor default.
    /// - LEXDRAFT_API_KEY wins, then the flavor's own key variable.
    /// - LEXDRAFT_MODEL wins, then the flavor default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let explicit_flavor = get("LEXDRAFT_PROVIDER")
            .map(|p| p.to_lowercase())
            .filter(|p| flavor_defaults(p).is_some());

        let flavor = explicit_flavor.unwrap_or_else(|| {
            ["openai", "groq", "together"]
                .into_iter()
                .find(|f| {
                    flavor_defaults(f)
                        .and_then(|(_, _, key_var)| key_var)
                        .and_then(&get)
                        .is_some()
                })
                .unwrap_or("openai")
                .to_string()
        });

        let (default_endpoint, default_model, key_var) =
            flavor_defaults(&flavor).unwrap_or((OPENAI_ENDPOINT, OPENAI_MODEL, None));
        let provider = LlmProvider::from_str(&flavor).unwrap_or_default();

        let endpoint = get("LEXDRAFT_ENDPOINT")
            .or_else(|| {
                if provider == LlmProvider::Ollama {
                    get("OLLAMA_HOST")
                } else {
                    None
                }
            })
            .unwrap_or_else(|| default_endpoint.to_string());

        let api_key = get("LEXDRAFT_API_KEY").or_else(|| key_var.and_then(&get));

        let model = get("LEXDRAFT_MODEL").unwrap_or_else(|| default_model.to_string());

        Self {
            provider,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model,
            api_key,
        }
    }

    /// Whether this provider refuses requests without a credential.
    pub fn requires_api_key(&self) -> bool {
        self.provider == LlmProvider::OpenAI
    }

    /// Get the provider name for display.
    pub fn provider_name(&self) -> &'static str {
        match self.provider {
            LlmProvider::Ollama => "Ollama",
            LlmProvider::OpenAI => {
                if self.endpoint.contains("groq.com") {
                    "Groq"
                } else if self.endpoint.contains("together.xyz") {
                    "Together.ai"
                } else {
                    "OpenAI"
                }
            }
        }
    }

    /// Provider-specific environment variable that carries the API key.
    pub fn key_var(&self) -> Option<&'static str> {
        match self.provider_name() {
            "Ollama" => None,
            "Groq" => Some("GROQ_API_KEY"),
            "Together.ai" => Some("TOGETHER_API_KEY"),
            _ => Some("OPENAI_API_KEY"),
        }
    }

    /// Get a provider-aware availability hint for error messages.
    pub fn availability_hint(&self) -> String {
        match self.provider {
            LlmProvider::Ollama => {
                format!(
                    "Ollama not available at {}. Make sure Ollama is running: ollama serve",
                    self.endpoint
                )
            }
            LlmProvider::OpenAI => {
                if self.api_key.is_none() {
                    format!(
                        "{} API key not set. Set LEXDRAFT_API_KEY or {}",
                        self.provider_name(),
                        self.key_var().unwrap_or("OPENAI_API_KEY")
                    )
                } else {
                    format!("{} API not available at {}", self.provider_name(), self.endpoint)
                }
            }
        }
    }
}

// === LlmConfig (combined) implementations ===

impl LlmConfig {
    /// Create from app config (file) and device config (env).
    pub fn new(app: LlmAppConfig, device: LlmDeviceConfig) -> Self {
        Self { app, device }
    }

    /// Create with default app config and device config from env.
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Check if the config equals the default (for skip_serializing_if).
    pub fn is_default(&self) -> bool {
        self.app.is_default()
    }

    // Convenience accessors that delegate to sub-configs

    pub fn enabled(&self) -> bool {
        self.app.enabled
    }

    pub fn provider(&self) -> LlmProvider {
        self.device.provider
    }

    pub fn endpoint(&self) -> &str {
        &self.device.endpoint
    }

    pub fn model(&self) -> &str {
        &self.device.model
    }

    pub fn api_key(&self) -> Option<&str> {
        self.device.api_key.as_deref()
    }

    pub fn max_tokens(&self) -> u32 {
        self.app.max_tokens
    }

    pub fn temperature(&self) -> f32 {
        self.app.temperature
    }

    pub fn timeout_secs(&self) -> u64 {
        self.app.timeout_secs
    }

    pub fn requires_api_key(&self) -> bool {
        self.device.requires_api_key()
    }

    pub fn provider_name(&self) -> &'static str {
        self.device.provider_name()
    }

    pub fn availability_hint(&self) -> String {
        self.device.availability_hint()
    }

    // Setters for CLI override use cases

    pub fn set_endpoint(&mut self, endpoint: String) {
        self.device.endpoint = endpoint.trim_end_matches('/').to_string();
    }

    pub fn set_model(&mut self, model: String) {
        self.device.model = model;
    }
}
