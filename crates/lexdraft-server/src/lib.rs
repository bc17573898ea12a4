//! HTTP API for the legal document tasks.
//!
//! Exposes each chunked task and the chat helper as JSON endpoints over a
//! single shared [`LegalAssistant`].

mod handlers;
mod routes;

pub use routes::create_router;

use std::sync::Arc;

use lexdraft::{Config, LegalAssistant, LlmClient};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<LegalAssistant>,
}

impl AppState {
    /// Build the completion client once from configuration.
    ///
    /// Fails when the provider needs a credential that is not configured.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = LlmClient::new(config.llm.clone())?;
        let assistant = LegalAssistant::with_options(Arc::new(client), config.agents.clone());

        Ok(Self::from_assistant(assistant))
    }

    pub fn from_assistant(assistant: LegalAssistant) -> Self {
        Self {
            assistant: Arc::new(assistant),
        }
    }
}

/// Start the web server.
pub async fn serve(config: &Config, bind: &str) -> anyhow::Result<()> {
    let state = AppState::new(config)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("Starting server at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use lexdraft::prompts::CHAT_APOLOGY;
    use lexdraft::{AgentOptions, CompletionClient, CompletionError, DEFAULT_MAX_CHUNK_CHARS};
    use tower::ServiceExt;

    struct EchoClient;

    #[async_trait]
    impl CompletionClient for EchoClient {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, CompletionError> {
            Ok("nalaz".to_string())
        }
    }

    struct DownClient;

    #[async_trait]
    impl CompletionClient for DownClient {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, CompletionError> {
            Err(CompletionError::Connection("refused".to_string()))
        }
    }

    fn setup_test_app(client: Arc<dyn CompletionClient>) -> axum::Router {
        setup_test_app_with_options(
            client,
            AgentOptions {
                max_chunk_chars: 10,
                concurrency: 1,
            },
        )
    }

    fn setup_test_app_with_options(
        client: Arc<dyn CompletionClient>,
        options: AgentOptions,
    ) -> axum::Router {
        create_router(AppState::from_assistant(LegalAssistant::with_options(
            client, options,
        )))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = setup_test_app(Arc::new(EchoClient));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_tasks() {
        let app = setup_test_app(Arc::new(EchoClient));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/tasks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["error"], false);
        let tasks = json["data"].as_array().unwrap();
        assert_eq!(tasks.len(), 6);
        assert_eq!(tasks[0]["name"], "summary");
        assert_eq!(tasks[5]["name"], "contract-analysis");
    }

    #[tokio::test]
    async fn test_run_task() {
        let app = setup_test_app(Arc::new(EchoClient));

        let response = app
            .oneshot(post_json(
                "/api/tasks/lawsuit-response",
                serde_json::json!({ "document": "Tužba radi naknade štete" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["error"], false);
        assert_eq!(json["data"]["task"], "lawsuit-response");
        assert_eq!(json["data"]["chunks"], 3);
        assert_eq!(json["data"]["output"], "nalaz nalaz nalaz");
    }

    #[tokio::test]
    async fn test_run_unknown_task() {
        let app = setup_test_app(Arc::new(EchoClient));

        let response = app
            .oneshot(post_json(
                "/api/tasks/verdict",
                serde_json::json!({ "document": "x" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["error"], true);
        assert_eq!(json["data"]["message"], "Unknown task: verdict");
    }

    #[tokio::test]
    async fn test_run_task_failure() {
        let app = setup_test_app(Arc::new(DownClient));

        let response = app
            .oneshot(post_json(
                "/api/tasks/summary",
                serde_json::json!({ "document": "Rešenje" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = json_body(response).await;
        assert_eq!(json["error"], true);
        assert_eq!(
            json["data"]["message"],
            "Error generating summary: Connection error: refused"
        );
    }

    #[tokio::test]
    async fn test_chat() {
        let app = setup_test_app(Arc::new(EchoClient));

        let response = app
            .oneshot(post_json(
                "/api/chat",
                serde_json::json!({ "document": "Ugovor o zakupu", "question": "Ko je zakupac?" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["answer"], "nalaz");
    }

    #[tokio::test]
    async fn test_chat_failure() {
        let app = setup_test_app(Arc::new(DownClient));

        let response = app
            .oneshot(post_json(
                "/api/chat",
                serde_json::json!({ "document": "Ugovor o zakupu" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = json_body(response).await;
        assert_eq!(json["data"]["message"], CHAT_APOLOGY);
    }

    #[tokio::test]
    async fn test_openapi_spec() {
        let app = setup_test_app(Arc::new(EchoClient));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert!(json["paths"]["/api/tasks/{task}"].is_object());
        assert!(json["paths"]["/api/chat"].is_object());
    }

    #[tokio::test]
    async fn test_run_task_large_document() {
        let app = setup_test_app_with_options(Arc::new(EchoClient), AgentOptions::default());
        let document = "Ugovor o kupoprodaji. ".repeat(150_000);
        assert!(document.len() > 3 * 1024 * 1024);

        let response = app
            .oneshot(post_json(
                "/api/tasks/summary",
                serde_json::json!({ "document": document }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        let chunks = json["data"]["chunks"].as_u64().unwrap();
        assert_eq!(chunks, document.chars().count().div_ceil(DEFAULT_MAX_CHUNK_CHARS) as u64);
    }
}
