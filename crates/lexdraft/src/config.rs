//! Configuration management for lexdraft using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agents::AgentOptions;
use crate::llm::LlmConfig;

/// Errors raised while building configuration or the completion client.
///
/// All of these are startup failures: the process should report them and
/// exit rather than run with a degraded client.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{provider} API key not configured. {hint}")]
    MissingApiKey { provider: String, hint: String },

    #[error("Failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse {format} config {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct Config {
    /// LLM generation settings. Connection settings come from the environment.
    #[serde(default, skip_serializing_if = "LlmConfig::is_default")]
    #[prefer(default)]
    pub llm: LlmConfig,
    /// Chunking and dispatch settings for the task agents.
    #[serde(default, skip_serializing_if = "AgentOptions::is_default")]
    #[prefer(default)]
    pub agents: AgentOptions,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    #[prefer(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers lexdraft config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("lexdraft").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring config file: {}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            // No config file found, use defaults with env overrides
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ConfigError::Read {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;

        let mut config = Self::parse(path, &contents)?;
        config.source_path = Some(path.to_path_buf());
        // Note: LlmConfig device settings are auto-populated from env via Default
        Ok(config)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_error = |format: &'static str, message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        };

        match ext {
            "toml" => toml::from_str(contents).map_err(|e| parse_error("TOML", e.to_string())),
            "yaml" | "yml" => {
                serde_yaml::from_str(contents).map_err(|e| parse_error("YAML", e.to_string()))
            }
            _ => serde_json::from_str(contents).map_err(|e| parse_error("JSON", e.to_string())),
        }
    }
}
