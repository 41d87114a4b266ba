//! HTTP server entry point and Axum router setup.
//!
//! Loads settings from the environment, wires the menu tool into the agent,
//! and serves the chat page and the chat API.

mod dto;
mod error;
mod handlers;
mod services;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use menubot_config::Settings;
use menubot_engine::{Agent, AgentExecutor};
use menubot_llm::UnifiedLlmClient;
use menubot_tools::ToolRegistry;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared server state accessible from all handlers.
pub struct ServerState {
    pub agent: Arc<dyn Agent>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let settings = Settings::from_env()?;
    let state = Arc::new(init_server_state(&settings));

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("Server is listening on {}", settings.bind_addr);
    axum::serve(listener, app(state)).await?;

    Ok(())
}

/// Builds the agent from settings: LLM client plus the menu tool.
fn init_server_state(settings: &Settings) -> ServerState {
    let client = UnifiedLlmClient::new(&settings.model);
    info!(
        "Model: {} via {}",
        client.model(),
        if client.is_gemini() { "Gemini API" } else { "OpenAI-compatible API" }
    );

    let tools = ToolRegistry::with_defaults();
    info!("Registered {} tools", tools.list().len());

    let agent = AgentExecutor::new(Arc::new(client), Arc::new(tools))
        .with_max_iterations(settings.max_iterations);
    info!("Agent tool iteration budget: {}", settings.max_iterations);

    ServerState {
        agent: Arc::new(agent),
    }
}

/// Routes: the chat page, the chat API and a health check.
fn app(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/", get(handlers::index::index))
        .route("/api/chat", post(handlers::chat::chat))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use menubot_core::AgentError;
    use menubot_engine::{AgentResult, AgentStep};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::services::chat::{APOLOGY, NO_ANSWER};
    use crate::services::gate::REFUSAL;

    enum Script {
        Reply(AgentResult),
        Fail(&'static str),
    }

    struct StubAgent {
        script: Script,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Agent for StubAgent {
        async fn invoke(&self, _input: &str) -> Result<AgentResult, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.script {
                Script::Reply(result) => Ok(result.clone()),
                Script::Fail(msg) => Err(AgentError::LlmError(msg.to_string())),
            }
        }
    }

    fn stub(script: Script) -> Arc<StubAgent> {
        Arc::new(StubAgent {
            script,
            calls: AtomicUsize::new(0),
        })
    }

    async fn post_chat(agent: Arc<StubAgent>, body: Value) -> (StatusCode, Value) {
        let app = app(Arc::new(ServerState { agent }));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unrelated_input_is_refused_without_the_agent() {
        let agent = stub(Script::Reply(AgentResult::answered("should not be used")));
        let (status, body) = post_chat(agent.clone(), json!({ "input": "What's the weather?" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "output": REFUSAL }));
        assert_eq!(agent.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_input_is_treated_as_unrelated() {
        let agent = stub(Script::Reply(AgentResult::answered("unused")));
        let (status, body) = post_chat(agent.clone(), json!({})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["output"], REFUSAL);
        assert_eq!(agent.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn agent_answer_is_returned() {
        let agent = stub(Script::Reply(AgentResult::answered("Dinner has Pasta Alfredo.")));
        let (status, body) = post_chat(agent.clone(), json!({ "input": "Italian dinner?" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "output": "Dinner has Pasta Alfredo." }));
        assert_eq!(agent.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn tool_observation_is_the_fallback() {
        let agent = stub(Script::Reply(AgentResult {
            output: None,
            intermediate_steps: vec![AgentStep {
                tool: "get_menu".into(),
                arguments: json!({ "category": "breakfast", "diet": "vegan" }),
                observation: "Here are the items for breakfast [vegan]:\n- Poha\n- Fruit Salad".into(),
            }],
        }));
        let (status, body) = post_chat(agent, json!({ "input": "vegan breakfast" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["output"], "Here are the items for breakfast [vegan]:\n- Poha\n- Fruit Salad");
    }

    #[tokio::test]
    async fn no_answer_is_a_server_error() {
        let agent = stub(Script::Reply(AgentResult::default()));
        let (status, body) = post_chat(agent, json!({ "input": "menu please" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "output": NO_ANSWER }));
    }

    #[tokio::test]
    async fn agent_failure_hides_the_cause() {
        let agent = stub(Script::Fail("401 invalid key AIza-secret"));
        let (status, body) = post_chat(agent, json!({ "input": "lunch menu" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "output": APOLOGY }));
        assert!(!body.to_string().contains("AIza-secret"));
    }

    #[tokio::test]
    async fn index_serves_the_chat_page() {
        let agent = stub(Script::Reply(AgentResult::default()));
        let response = app(Arc::new(ServerState { agent }))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("content-type").unwrap(), "text/html");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("/api/chat"));
    }

    #[tokio::test]
    async fn health_is_ok() {
        let agent = stub(Script::Reply(AgentResult::default()));
        let response = app(Arc::new(ServerState { agent }))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }
}
