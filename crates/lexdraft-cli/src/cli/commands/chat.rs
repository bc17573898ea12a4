//! Document chat command.

use std::path::Path;

use console::style;

use lexdraft::prompts::CHAT_APOLOGY;
use lexdraft::Config;

use crate::cli::helpers::{build_assistant, read_document};

/// Ask one question about a whole document.
pub async fn cmd_chat(
    config: &Config,
    file: Option<&Path>,
    question: Option<&str>,
) -> anyhow::Result<()> {
    let assistant = build_assistant(config)?;
    let document = read_document(file).await?;

    match assistant.try_chat(&document, question).await {
        Ok(answer) => {
            println!("{}", answer);
            Ok(())
        }
        Err(e) => {
            println!("{}", CHAT_APOLOGY);
            eprintln!("{} {}", style("✗").red(), e);
            Err(anyhow::anyhow!("Chat request failed"))
        }
    }
}
