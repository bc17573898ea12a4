//! Task agents: chunk a document, run one completion per chunk, join.
//!
//! Every agent fails soft at its public boundary. The `try_*` methods return
//! a typed error so callers can tell a failure apart from model output that
//! happens to look like an error message; the plain methods turn that error
//! into the string a user sees.

mod types;

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

pub use types::{AgentOptions, ChatError, TaskError, TaskEvent};

use crate::chunker::chunk_document;
use crate::llm::CompletionClient;
use crate::prompts::{render_chat, Task, CHAT_APOLOGY, CHAT_SYSTEM_INSTRUCTION, SYSTEM_INSTRUCTION};

/// Runs the legal document tasks against a completion client.
///
/// The client is constructed once by the process entry point and shared;
/// nothing here holds mutable state between calls.
#[derive(Clone)]
pub struct LegalAssistant {
    client: Arc<dyn CompletionClient>,
    options: AgentOptions,
}

impl LegalAssistant {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self::with_options(client, AgentOptions::default())
    }

    pub fn with_options(client: Arc<dyn CompletionClient>, options: AgentOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &AgentOptions {
        &self.options
    }

    /// Number of chunks a document will be split into.
    pub fn chunk_count(&self, document: &str) -> usize {
        chunk_document(document, self.options.max_chunk_chars).len()
    }

    /// Run a chunked task and return the space-joined chunk outputs.
    pub async fn try_run(&self, task: Task, document: &str) -> Result<String, TaskError> {
        self.try_run_with_events(task, document, None).await
    }

    /// Run a chunked task, reporting progress on `events`.
    ///
    /// Chunks are submitted `options.concurrency` at a time and their outputs
    /// are assembled in document order. The first failing chunk aborts the
    /// task; outputs of chunks that already succeeded are discarded.
    pub async fn try_run_with_events(
        &self,
        task: Task,
        document: &str,
        events: Option<mpsc::Sender<TaskEvent>>,
    ) -> Result<String, TaskError> {
        let chunks = chunk_document(document, self.options.max_chunk_chars);
        let total_chunks = chunks.len();
        info!("Running {} over {} chunk(s)", task.agent_label(), total_chunks);

        emit(
            &events,
            TaskEvent::Started {
                task,
                total_chunks,
            },
        )
        .await;

        // Owned prompts keep the stream free of borrows so the future stays Send.
        let prompts: Vec<(String, usize)> = chunks
            .iter()
            .map(|chunk| (task.render(chunk), chunk.chars().count()))
            .collect();

        let client = Arc::clone(&self.client);
        let mut responses = stream::iter(prompts.into_iter().enumerate())
            .map(move |(index, (prompt, chunk_chars))| {
                let client = Arc::clone(&client);
                async move {
                    debug!(
                        "{}: chunk {}/{} ({} chars)",
                        task.agent_label(),
                        index + 1,
                        total_chunks,
                        chunk_chars
                    );
                    (index, client.complete(SYSTEM_INSTRUCTION, &prompt).await)
                }
            })
            .buffered(self.options.concurrency.max(1));

        let mut outputs = Vec::with_capacity(total_chunks);
        while let Some((index, result)) = responses.next().await {
            match result {
                Ok(text) => {
                    outputs.push(text);
                    emit(&events, TaskEvent::ChunkCompleted { index }).await;
                }
                Err(source) => {
                    let err = TaskError {
                        task,
                        chunk_index: index,
                        source,
                    };
                    error!("Error in {}: {}", task.agent_label(), err.source);
                    emit(
                        &events,
                        TaskEvent::Failed {
                            index,
                            error: err.to_string(),
                        },
                    )
                    .await;
                    return Err(err);
                }
            }
        }

        emit(&events, TaskEvent::Completed { total_chunks }).await;
        Ok(outputs.join(" "))
    }

    /// Run a chunked task; failures come back as the task's error string.
    pub async fn run(&self, task: Task, document: &str) -> String {
        match self.try_run(task, document).await {
            Ok(output) => output,
            Err(e) => e.to_string(),
        }
    }

    /// Answer a question about the whole document in a single request.
    ///
    /// The document is not chunked. A missing question is sent as empty.
    pub async fn try_chat(&self, document: &str, question: Option<&str>) -> Result<String, ChatError> {
        let prompt = render_chat(document, question.unwrap_or_default());
        info!(
            "Running chat helper over {} chars",
            document.chars().count()
        );

        self.client
            .complete(CHAT_SYSTEM_INSTRUCTION, &prompt)
            .await
            .map_err(|source| {
                let err = ChatError { source };
                error!("{}", err);
                err
            })
    }

    /// Answer a question; failures come back as a fixed apology.
    pub async fn chat(&self, document: &str, question: Option<&str>) -> String {
        self.try_chat(document, question)
            .await
            .unwrap_or_else(|_| CHAT_APOLOGY.to_string())
    }

    pub async fn summary(&self, document: &str) -> String {
        self.run(Task::Summary, document).await
    }

    pub async fn appeal(&self, document: &str) -> String {
        self.run(Task::Appeal, document).await
    }

    pub async fn review(&self, document: &str) -> String {
        self.run(Task::Review, document).await
    }

    pub async fn lawsuit(&self, document: &str) -> String {
        self.run(Task::Lawsuit, document).await
    }

    pub async fn lawsuit_response(&self, document: &str) -> String {
        self.run(Task::LawsuitResponse, document).await
    }

    pub async fn contract_analysis(&self, document: &str) -> String {
        self.run(Task::ContractAnalysis, document).await
    }
}

async fn emit(events: &Option<mpsc::Sender<TaskEvent>>, event: TaskEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CompletionError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Returns the same text for every call and records the requests.
    struct FixedClient {
        reply: String,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FixedClient {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionClient for FixedClient {
        async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
            self.calls
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            Ok(self.reply.clone())
        }
    }

    /// Succeeds with "ok" until call number `fail_at` (0-based), which fails.
    struct FailAtClient {
        fail_at: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionClient for FailAtClient {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, CompletionError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n == self.fail_at {
                Err(CompletionError::Api("boom".to_string()))
            } else {
                Ok("ok".to_string())
            }
        }
    }

    /// Echoes the `<cNN>` marker found in the prompt after a delay that makes
    /// later chunks finish first. Tracks how many calls overlap.
    struct MarkerClient {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MarkerClient {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for MarkerClient {
        async fn complete(&self, _system: &str, user: &str) -> Result<String, CompletionError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let start = user.find("<c").expect("marker in prompt");
            let marker = &user[start + 1..start + 4];
            let n: u64 = marker[1..].parse().unwrap();
            tokio::time::sleep(Duration::from_millis((8 - n) * 5)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(marker.to_string())
        }
    }

    fn marker_document() -> String {
        (0..8).map(|i| format!("<c{:02}>", i)).collect()
    }

    fn options(max_chunk_chars: usize, concurrency: usize) -> AgentOptions {
        AgentOptions {
            max_chunk_chars,
            concurrency,
        }
    }

    #[tokio::test]
    async fn joins_one_output_per_chunk() {
        let client = FixedClient::new("X");
        let assistant = LegalAssistant::new(client.clone());
        let document = "d".repeat(12000);

        assert_eq!(assistant.summary(&document).await, "X X X");
        assert_eq!(client.calls().len(), 3);
        assert_eq!(assistant.chunk_count(&document), 3);
    }

    #[tokio::test]
    async fn every_task_sends_system_instruction_and_rendered_chunk() {
        let client = FixedClient::new("X");
        let assistant = LegalAssistant::new(client.clone());
        let document = "Presuda Apelacionog suda u Beogradu, Gž 123/2024.";

        for task in Task::all() {
            assert_eq!(assistant.run(*task, document).await, "X");
        }

        let calls = client.calls();
        assert_eq!(calls.len(), Task::all().len());
        for ((system, user), task) in calls.iter().zip(Task::all()) {
            assert_eq!(system, SYSTEM_INSTRUCTION);
            assert_eq!(user, &task.render(document));
            assert!(user.contains(document));
            assert!(!user.contains("{document}"));
        }
    }

    #[tokio::test]
    async fn named_helpers_dispatch_to_their_templates() {
        let client = FixedClient::new("X");
        let assistant = LegalAssistant::new(client.clone());

        assistant.appeal("a").await;
        assistant.review("a").await;
        assistant.lawsuit("a").await;
        assistant.lawsuit_response("a").await;
        assistant.contract_analysis("a").await;

        let users: Vec<String> = client.calls().into_iter().map(|(_, u)| u).collect();
        assert!(users[0].contains("NOTICE OF APPEAL"));
        assert!(users[1].contains("maximum 750 words"));
        assert!(users[2].contains("CAUSES OF ACTION"));
        assert!(users[3].contains("ANSWER TO COMPLAINT"));
        assert!(users[4].contains("Zakon o obligacionim odnosima"));
    }

    #[tokio::test]
    async fn empty_document_makes_no_calls() {
        let client = FixedClient::new("X");
        let assistant = LegalAssistant::new(client.clone());

        assert_eq!(assistant.try_run(Task::Review, "").await.unwrap(), "");
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn failure_discards_partial_output_and_stops() {
        let client = Arc::new(FailAtClient {
            fail_at: 1,
            calls: AtomicUsize::new(0),
        });
        let assistant = LegalAssistant::new(client.clone());
        let document = "d".repeat(12000);

        let err = assistant
            .try_run(Task::Summary, &document)
            .await
            .unwrap_err();
        assert_eq!(err.task, Task::Summary);
        assert_eq!(err.chunk_index, 1);
        assert_eq!(err.source, CompletionError::Api("boom".to_string()));
        // third chunk is never submitted
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);

        let client = Arc::new(FailAtClient {
            fail_at: 1,
            calls: AtomicUsize::new(0),
        });
        let output = LegalAssistant::new(client).summary(&document).await;
        assert_eq!(output, "Error generating summary: API error: boom");
        assert!(!output.contains("ok"));
    }

    #[tokio::test]
    async fn every_task_has_its_own_error_prefix() {
        for task in Task::all() {
            let client = Arc::new(FailAtClient {
                fail_at: 0,
                calls: AtomicUsize::new(0),
            });
            let output = LegalAssistant::new(client).run(*task, "doc").await;
            assert!(
                output.starts_with(task.failure_prefix()),
                "{}: {}",
                task,
                output
            );
        }
    }

    #[tokio::test]
    async fn sequential_by_default() {
        let client = MarkerClient::new();
        let assistant = LegalAssistant::with_options(client.clone(), options(5, 1));

        let output = assistant
            .try_run(Task::Summary, &marker_document())
            .await
            .unwrap();
        assert_eq!(output, "c00 c01 c02 c03 c04 c05 c06 c07");
        assert_eq!(client.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bounded_parallel_preserves_order() {
        let client = MarkerClient::new();
        let assistant = LegalAssistant::with_options(client.clone(), options(5, 4));

        let output = assistant
            .try_run(Task::Appeal, &marker_document())
            .await
            .unwrap();
        assert_eq!(output, "c00 c01 c02 c03 c04 c05 c06 c07");
        let peak = client.max_in_flight.load(Ordering::SeqCst);
        assert!(peak > 1 && peak <= 4, "peak concurrency {}", peak);
    }

    #[tokio::test]
    async fn events_track_progress() {
        let client = FixedClient::new("X");
        let assistant = LegalAssistant::with_options(client, options(4, 1));
        let (tx, mut rx) = mpsc::channel(16);

        assistant
            .try_run_with_events(Task::Review, "abcdefghij", Some(tx))
            .await
            .unwrap();

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                TaskEvent::Started {
                    task: Task::Review,
                    total_chunks: 3
                },
                TaskEvent::ChunkCompleted { index: 0 },
                TaskEvent::ChunkCompleted { index: 1 },
                TaskEvent::ChunkCompleted { index: 2 },
                TaskEvent::Completed { total_chunks: 3 },
            ]
        );
    }

    #[tokio::test]
    async fn failure_event_carries_error_string() {
        let client = Arc::new(FailAtClient {
            fail_at: 0,
            calls: AtomicUsize::new(0),
        });
        let assistant = LegalAssistant::new(client);
        let (tx, mut rx) = mpsc::channel(16);

        let _ = assistant
            .try_run_with_events(Task::ContractAnalysis, "ugovor", Some(tx))
            .await;

        let mut last = None;
        while let Some(event) = rx.recv().await {
            last = Some(event);
        }
        assert_eq!(
            last,
            Some(TaskEvent::Failed {
                index: 0,
                error: "Error analyzing contract: API error: boom".to_string()
            })
        );
    }

    #[tokio::test]
    async fn chat_sends_whole_document_once() {
        let client = FixedClient::new("Odgovor");
        let assistant = LegalAssistant::new(client.clone());
        let document = "č".repeat(12000);

        let answer = assistant
            .chat(&document, Some("Koji je rok za žalbu?"))
            .await;
        assert_eq!(answer, "Odgovor");

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        let (system, user) = &calls[0];
        assert_eq!(system, CHAT_SYSTEM_INSTRUCTION);
        assert!(user.contains("User Question: Koji je rok za žalbu?"));
        assert!(user.contains(&document));
    }

    #[tokio::test]
    async fn chat_without_question_sends_empty_question() {
        let client = FixedClient::new("X");
        let assistant = LegalAssistant::new(client.clone());

        assistant.chat("doc", None).await;
        assert!(client.calls()[0].1.contains("User Question: \n"));
    }

    #[tokio::test]
    async fn chat_failure_returns_apology() {
        let client = Arc::new(FailAtClient {
            fail_at: 0,
            calls: AtomicUsize::new(0),
        });
        let assistant = LegalAssistant::new(client);

        assert_eq!(assistant.chat("doc", Some("q")).await, CHAT_APOLOGY);

        let client = Arc::new(FailAtClient {
            fail_at: 0,
            calls: AtomicUsize::new(0),
        });
        let err = LegalAssistant::new(client)
            .try_chat("doc", Some("q"))
            .await
            .unwrap_err();
        assert_eq!(err.source, CompletionError::Api("boom".to_string()));
    }

    #[tokio::test]
    async fn model_text_that_looks_like_an_error_is_still_success() {
        let client = FixedClient::new("Error generating summary: not really");
        let assistant = LegalAssistant::new(client);

        assert!(assistant.try_run(Task::Summary, "doc").await.is_ok());
    }

    fn assert_send<T: Send>(_: T) {}

    #[test]
    fn task_futures_are_send() {
        let assistant = LegalAssistant::new(FixedClient::new("X"));
        let (tx, _rx) = mpsc::channel(1);

        assert_send(assistant.try_run(Task::Summary, "doc"));
        assert_send(assistant.try_run_with_events(Task::Review, "doc", Some(tx)));
        assert_send(assistant.try_chat("doc", Some("q")));
    }

    #[tokio::test]
    async fn parallel_failure_reports_chunk_and_drops_output() {
        let client = Arc::new(FailAtClient {
            fail_at: 2,
            calls: AtomicUsize::new(0),
        });
        let assistant = LegalAssistant::with_options(client.clone(), options(5, 4));

        let err = assistant
            .try_run(Task::Lawsuit, &marker_document())
            .await
            .unwrap_err();
        assert_eq!(err.chunk_index, 2);
        assert_eq!(err.source, CompletionError::Api("boom".to_string()));
        assert_eq!(
            err.to_string(),
            "Error generating lawsuit: API error: boom"
        );
        // submission stops at the failure; the tail of the document is never sent
        assert!(client.calls.load(Ordering::SeqCst) < 8);

        let client = Arc::new(FailAtClient {
            fail_at: 2,
            calls: AtomicUsize::new(0),
        });
        let output = LegalAssistant::with_options(client, options(5, 4))
            .lawsuit(&marker_document())
            .await;
        assert_eq!(output, "Error generating lawsuit: API error: boom");
        assert!(!output.contains("ok"));
    }
}
