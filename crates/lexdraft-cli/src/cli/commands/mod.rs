//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod chat;
mod llm;
mod serve;
mod task;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lexdraft::Task;

use super::helpers::load_config;

#[derive(Parser)]
#[command(name = "lexdraft")]
#[command(about = "Legal document summaries, reviews and drafts over hosted LLMs")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Model to use (overrides LEXDRAFT_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Completion API base URL (overrides LEXDRAFT_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Run a task over a document and print the result
    Run {
        /// Task to run
        #[arg(value_enum)]
        task: Task,
        /// Document to process (reads stdin when omitted or "-")
        file: Option<PathBuf>,
        /// Maximum characters per chunk
        #[arg(long)]
        max_chunk_chars: Option<usize>,
        /// Chunks submitted to the model at once
        #[arg(long)]
        concurrency: Option<usize>,
        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Ask a question about a whole document
    Chat {
        /// Document to ask about (reads stdin when omitted or "-")
        file: Option<PathBuf>,
        /// Question to ask
        #[arg(short, long)]
        question: Option<String>,
    },

    /// List available tasks
    Tasks,

    /// Show LLM configuration and available models
    Llm,

    /// Start the HTTP API server
    Serve {
        /// Address to bind (port, host, or host:port)
        #[arg(default_value = "127.0.0.1:3030")]
        bind: String,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).await?;

    // CLI connection overrides win over environment
    if let Some(model) = cli.model {
        config.llm.set_model(model);
    }
    if let Some(endpoint) = cli.endpoint {
        config.llm.set_endpoint(endpoint);
    }

    match cli.command {
        Commands::Run {
            task: task_kind,
            file,
            max_chunk_chars,
            concurrency,
            output,
        } => {
            if let Some(max) = max_chunk_chars {
                config.agents.max_chunk_chars = max;
            }
            if let Some(n) = concurrency {
                config.agents.concurrency = n;
            }
            task::cmd_run(&config, task_kind, file.as_deref(), output.as_deref()).await
        }
        Commands::Chat { file, question } => {
            chat::cmd_chat(&config, file.as_deref(), question.as_deref()).await
        }
        Commands::Tasks => task::cmd_tasks(),
        Commands::Llm => llm::cmd_llm(&config).await,
        Commands::Serve { bind } => serve::cmd_serve(&config, &bind).await,
    }
}
