//! LLM-related commands.

use console::style;

use lexdraft::{Config, LlmClient};

/// Show the LLM configuration and list available models.
pub async fn cmd_llm(config: &Config) -> anyhow::Result<()> {
    println!("\n{}", style("LLM Configuration").bold());
    println!("{}", "-".repeat(40));
    println!(
        "{:<20} {}",
        "Enabled:",
        if config.llm.enabled() { "Yes" } else { "No" }
    );
    println!("{:<20} {}", "Provider:", config.llm.provider_name());
    println!("{:<20} {}", "Endpoint:", config.llm.endpoint());
    println!(
        "{:<20} {}",
        "API Key:",
        if config.llm.api_key().is_some() {
            "Set"
        } else {
            "Not set"
        }
    );
    println!("{:<20} {}", "Current Model:", config.llm.model());
    println!("{:<20} {}", "Max Tokens:", config.llm.max_tokens());
    println!("{:<20} {:.2}", "Temperature:", config.llm.temperature());
    println!("{:<20} {}s", "Timeout:", config.llm.timeout_secs());
    println!(
        "{:<20} {}",
        "Max Chunk Chars:", config.agents.max_chunk_chars
    );
    println!("{:<20} {}", "Concurrency:", config.agents.concurrency);
    if let Some(ref path) = config.source_path {
        println!("{:<20} {}", "Config File:", path.display());
    }

    // Missing credentials are reported here rather than treated as fatal
    let llm_client = match LlmClient::new(config.llm.clone()) {
        Ok(client) => client,
        Err(e) => {
            println!("\n{} {}", style("!").yellow(), e);
            return Ok(());
        }
    };

    if !llm_client.is_available().await {
        println!(
            "\n{} {}",
            style("!").yellow(),
            config.llm.availability_hint()
        );
        return Ok(());
    }

    println!("\n{}", style("Available Models").bold());
    println!("{}", "-".repeat(40));

    match llm_client.list_models().await {
        Ok(models) => {
            if models.is_empty() {
                println!("  No models available");
            } else {
                for model in models {
                    let marker = if model == config.llm.model() {
                        style("*").green().to_string()
                    } else {
                        " ".to_string()
                    };
                    println!("{} {}", marker, model);
                }
            }
        }
        Err(e) => {
            println!("{} Failed to list models: {}", style("✗").red(), e);
        }
    }

    Ok(())
}
