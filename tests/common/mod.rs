//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, State},
    http::{StatusCode, Uri},
    routing::post,
    Router,
};
use contact_relay::config::RelayConfig;
use contact_relay::relay::{MessageRelay, RelayError};
use futures_util::future::BoxFuture;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Valid config with rate limiting off.
pub fn test_config() -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.relay.bot_token = "123:test".into();
    config.relay.chat_id = "-1001".into();
    config.rate_limit.enabled = false;
    config
}

/// Relay double that records every text it is asked to send.
#[derive(Default)]
pub struct RecordingRelay {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingRelay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl MessageRelay for RecordingRelay {
    fn send<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), RelayError>> {
        Box::pin(async move {
            self.sent.lock().unwrap().push(text.to_string());
            if self.fail {
                Err(RelayError::Transport("connection refused".into()))
            } else {
                Ok(())
            }
        })
    }
}

/// Relay whose sends never complete.
pub struct StalledRelay;

impl MessageRelay for StalledRelay {
    fn send<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<(), RelayError>> {
        Box::pin(futures_util::future::pending())
    }
}

/// A request captured by the mock bot API.
#[derive(Debug)]
pub struct CapturedCall {
    pub path: String,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    reply: Value,
    calls: mpsc::UnboundedSender<CapturedCall>,
}

async fn mock_send_message(
    State(state): State<MockState>,
    uri: Uri,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let _ = state.calls.send(CapturedCall {
        path: uri.path().to_string(),
        body,
    });
    (state.status, Json(state.reply))
}

/// Start a mock bot API on an ephemeral port answering every call with
/// `status` and `reply`.
pub async fn start_mock_bot_api(
    status: StatusCode,
    reply: Value,
) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedCall>) {
    let (calls, rx) = mpsc::unbounded_channel();
    let app = Router::new()
        .route("/{*path}", post(mock_send_message))
        .with_state(MockState {
            status,
            reply,
            calls,
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, rx)
}
