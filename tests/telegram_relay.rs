//! Telegram relay against a mock bot API.

use axum::http::StatusCode;
use contact_relay::config::MessengerConfig;
use contact_relay::relay::{MessageRelay, RelayError, TelegramRelay};
use serde_json::json;
use std::net::SocketAddr;

mod common;

fn relay_for(addr: SocketAddr) -> TelegramRelay {
    TelegramRelay::from_config(&MessengerConfig {
        api_base: format!("http://{addr}"),
        bot_token: "123:secret".into(),
        chat_id: "-1002".into(),
        timeout_secs: 5,
        ..MessengerConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_posts_send_message() {
    let (addr, mut calls) = common::start_mock_bot_api(StatusCode::OK, json!({"ok": true})).await;

    relay_for(addr).send("<b>Привет</b>").await.unwrap();

    let call = calls.recv().await.unwrap();
    assert_eq!(call.path, "/bot123:secret/sendMessage");
    assert_eq!(
        call.body,
        json!({"chat_id": "-1002", "text": "<b>Привет</b>", "parse_mode": "HTML"})
    );
}

#[tokio::test]
async fn test_non_success_status_is_error() {
    let (addr, _calls) = common::start_mock_bot_api(
        StatusCode::BAD_REQUEST,
        json!({"ok": false, "description": "Bad Request: chat not found"}),
    )
    .await;

    let err = relay_for(addr).send("x").await.unwrap_err();
    assert!(matches!(err, RelayError::Status(400)));
}

#[tokio::test]
async fn test_ok_false_is_rejection() {
    let (addr, _calls) = common::start_mock_bot_api(
        StatusCode::OK,
        json!({"ok": false, "description": "Forbidden: bot was kicked"}),
    )
    .await;

    match relay_for(addr).send("x").await.unwrap_err() {
        RelayError::Rejected { description } => assert_eq!(description, "Forbidden: bot was kicked"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_unreachable_api_is_transport_error_without_token() {
    // Bind then drop to get a port nobody listens on.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let err = relay_for(addr).send("x").await.unwrap_err();
    assert!(matches!(err, RelayError::Transport(_)));
    assert!(!err.to_string().contains("123:secret"));
}
