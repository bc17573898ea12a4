//! Chunked task commands.

use std::path::Path;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use lexdraft::{Config, Task, TaskEvent};

use crate::cli::helpers::{build_assistant, expand_path, read_document};

/// List available tasks.
pub fn cmd_tasks() -> anyhow::Result<()> {
    println!("\n{}", style("Tasks").bold());
    println!("{}", "-".repeat(40));
    for task in Task::all() {
        println!("  {:<20} {}", style(task.name()).cyan(), task.description());
    }
    Ok(())
}

/// Run a chunked task over a document.
pub async fn cmd_run(
    config: &Config,
    task: Task,
    file: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let assistant = build_assistant(config)?;
    let document = read_document(file).await?;

    if document.trim().is_empty() {
        eprintln!("{} Document is empty", style("!").yellow());
    }

    // Create event channel for progress tracking
    let (event_tx, mut event_rx) = mpsc::channel::<TaskEvent>(100);

    // Spawn event handler for UI
    let event_handler = tokio::spawn(async move {
        let mut progress: Option<ProgressBar> = None;
        while let Some(event) = event_rx.recv().await {
            match event {
                TaskEvent::Started { task, total_chunks } => {
                    let pb = ProgressBar::new(total_chunks as u64);
                    pb.set_style(
                        ProgressStyle::default_bar()
                            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
                            .unwrap_or_else(|_| ProgressStyle::default_bar())
                            .progress_chars("█▓░"),
                    );
                    pb.set_message(format!("Running {}...", task.agent_label()));
                    progress = Some(pb);
                }
                TaskEvent::ChunkCompleted { .. } => {
                    if let Some(ref pb) = progress {
                        pb.inc(1);
                    }
                }
                TaskEvent::Failed { index, error } => {
                    if let Some(pb) = progress.take() {
                        pb.finish_and_clear();
                    }
                    eprintln!(
                        "{} Chunk {} failed: {}",
                        style("✗").red(),
                        index + 1,
                        error
                    );
                }
                TaskEvent::Completed { total_chunks } => {
                    if let Some(pb) = progress.take() {
                        pb.finish_and_clear();
                    }
                    eprintln!(
                        "{} Processed {} chunk(s)",
                        style("✓").green(),
                        total_chunks
                    );
                }
            }
        }
    });

    let result = assistant
        .try_run_with_events(task, &document, Some(event_tx))
        .await;

    // Wait for event handler to finish
    let _ = event_handler.await;

    let text = match result {
        Ok(text) => text,
        // already reported by the Failed event
        Err(_) => return Err(anyhow::anyhow!("{} failed", task)),
    };

    match output {
        Some(path) => {
            let path = expand_path(path);
            tokio::fs::write(&path, &text).await?;
            eprintln!("{} Wrote {}", style("✓").green(), path.display());
        }
        None => println!("{}", text),
    }

    Ok(())
}
