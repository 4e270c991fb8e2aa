//! Test utilities for spendlens-core
//!
//! This module provides a mock OpenAI-compatible completion server that can be
//! used for development and integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::oneshot;

/// How the mock server answers chat completion requests
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 200 with a single choice containing this text
    Text(String),
    /// 429 with an OpenAI-style rate limit error body
    RateLimited,
    /// 500 with an OpenAI-style error body carrying this message
    ServerError(String),
    /// 200 with an empty `choices` array
    NoChoices,
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    prompts: Arc<Mutex<Vec<String>>>,
}

/// Mock OpenAI-compatible server for testing and development
pub struct MockCompletionServer {
    addr: SocketAddr,
    prompts: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockCompletionServer {
    /// Start the mock server on an available port
    pub async fn start(reply: MockReply) -> Self {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            reply,
            prompts: prompts.clone(),
        };

        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            prompts,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Prompts received so far, in arrival order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockCompletionServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatRequestMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatRequestMessage {
    content: String,
}

/// Model listing endpoint (health check)
async fn handle_models() -> Json<serde_json::Value> {
    Json(json!({
        "object": "list",
        "data": [{ "id": "llama3.2", "object": "model", "owned_by": "library" }]
    }))
}

/// Chat completions endpoint
async fn handle_chat(State(state): State<MockState>, Json(request): Json<ChatRequest>) -> Response {
    if let Some(message) = request.messages.last() {
        state.prompts.lock().unwrap().push(message.content.clone());
    }

    match state.reply {
        MockReply::Text(text) => Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "model": request.model,
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": text },
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        MockReply::RateLimited => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": {
                    "message": "Rate limit reached for requests",
                    "type": "rate_limit_error"
                }
            })),
        )
            .into_response(),
        MockReply::ServerError(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "message": message, "type": "api_error" } })),
        )
            .into_response(),
        MockReply::NoChoices => Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "model": request.model,
            "choices": []
        }))
        .into_response(),
    }
}
