//! Shared helper functions for CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::io::AsyncReadExt;

use lexdraft::{Config, LegalAssistant, LlmClient};

/// Expand `~` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(path_str) => PathBuf::from(shellexpand::tilde(path_str).as_ref()),
        None => path.to_path_buf(),
    }
}

/// Read the input document from a file, or from stdin when the path is
/// omitted or `-`.
pub async fn read_document(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            let path = expand_path(p);
            tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))
        }
        _ => {
            let mut document = String::new();
            tokio::io::stdin()
                .read_to_string(&mut document)
                .await
                .context("Failed to read document from stdin")?;
            Ok(document)
        }
    }
}

/// Load configuration from an explicit path or by discovery.
pub async fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(p) => Config::load_from_path(&expand_path(p)).await?,
        None => Config::load().await,
    };
    match config.source_path {
        Some(ref source) => tracing::info!("Loaded config from {}", source.display()),
        None => tracing::debug!("No config file found, using defaults"),
    }
    Ok(config)
}

/// Build the completion client and assistant once for this process.
///
/// A provider without its credential is a startup failure, reported once
/// by the caller.
pub fn build_assistant(config: &Config) -> anyhow::Result<LegalAssistant> {
    let client = LlmClient::new(config.llm.clone())?;

    Ok(LegalAssistant::with_options(
        Arc::new(client),
        config.agents.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexdraft::llm::{LlmAppConfig, LlmConfig, LlmDeviceConfig, LlmProvider};

    #[tokio::test]
    async fn reads_document_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presuda.txt");
        std::fs::write(&path, "Presuda u ime naroda").unwrap();

        let document = read_document(Some(&path)).await.unwrap();
        assert_eq!(document, "Presuda u ime naroda");
    }

    #[tokio::test]
    async fn missing_document_names_the_path() {
        let err = read_document(Some(Path::new("/nonexistent/ugovor.txt")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/ugovor.txt"));
    }

    #[test]
    fn expands_home() {
        if std::env::var("HOME").is_ok() {
            let expanded = expand_path(Path::new("~/ugovor.txt"));
            assert!(!expanded.starts_with("~"));
            assert!(expanded.ends_with("ugovor.txt"));
        }

        let plain = expand_path(Path::new("/tmp/ugovor.txt"));
        assert_eq!(plain, PathBuf::from("/tmp/ugovor.txt"));
    }

    #[tokio::test]
    async fn explicit_config_path_must_exist() {
        assert!(load_config(Some(Path::new("/nonexistent/lexdraft.toml")))
            .await
            .is_err());
    }

    #[test]
    fn missing_key_is_returned_not_printed() {
        let config = Config {
            llm: LlmConfig::new(
                LlmAppConfig::default(),
                LlmDeviceConfig {
                    provider: LlmProvider::OpenAI,
                    endpoint: "https://api.groq.com/openai/v1".to_string(),
                    model: "llama-3.3-70b-versatile".to_string(),
                    api_key: None,
                },
            ),
            ..Config::default()
        };

        let err = build_assistant(&config).err().unwrap();
        let message = err.to_string();
        assert!(message.starts_with("Groq API key not configured."));
        assert!(message.contains("GROQ_API_KEY"));
    }
}
