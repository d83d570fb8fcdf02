//! Test utilities for insightflow-core
//!
//! This module provides a mock Hugging Face Inference server so the real HTTP
//! backend can be exercised end to end without network access.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// How the mock server answers inference requests
#[derive(Debug, Clone)]
pub enum MockMode {
    /// `[{"generated_text": text}]`
    List(String),
    /// `{"generated_text": text}`
    Object(String),
    /// Respond with this status and an error body
    Status(u16),
    /// Respond 200 with this arbitrary JSON body
    Raw(Value),
    /// Sleep before answering with the list shape
    Slow(Duration),
}

struct MockState {
    mode: MockMode,
    expected_token: String,
    hits: AtomicUsize,
}

/// Mock Hugging Face Inference server for testing
pub struct MockHuggingFaceServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockHuggingFaceServer {
    /// Token the mock accepts as a bearer credential
    pub const TOKEN: &'static str = "hf_mock_token";

    /// Start the mock server on an available port
    pub async fn start(mode: MockMode) -> Self {
        let state = Arc::new(MockState {
            mode,
            expected_token: Self::TOKEN.to_string(),
            hits: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/models/*model", post(handle_inference))
            .with_state(state.clone());

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
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of inference requests received
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockHuggingFaceServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_inference(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token == state.expected_token)
        .unwrap_or(false);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid credentials in Authorization header"})),
        )
            .into_response();
    }

    if body.get("inputs").and_then(Value::as_str).is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "missing inputs"})),
        )
            .into_response();
    }

    match &state.mode {
        MockMode::List(text) => Json(json!([{ "generated_text": text }])).into_response(),
        MockMode::Object(text) => Json(json!({ "generated_text": text })).into_response(),
        MockMode::Status(code) => {
            let status = StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(json!({"error": "Model is currently loading"}))).into_response()
        }
        MockMode::Raw(value) => Json(value.clone()).into_response(),
        MockMode::Slow(delay) => {
            tokio::time::sleep(*delay).await;
            Json(json!([{ "generated_text": "late answer" }])).into_response()
        }
    }
}
