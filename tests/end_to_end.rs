//! Full server over TCP, relaying to a mock bot API.

use std::time::Duration;

use axum::http::StatusCode;
use contact_relay::http::{HttpServer, SubmissionResponse};
use contact_relay::lifecycle::Shutdown;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

mod common;

#[tokio::test]
async fn test_submission_reaches_bot_api() {
    let (api_addr, mut calls) =
        common::start_mock_bot_api(StatusCode::OK, json!({"ok": true, "result": {}})).await;

    let mut config = common::test_config();
    config.relay.api_base = format!("http://{api_addr}");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let (_updates_tx, updates) = mpsc::unbounded_channel();
    let server_task = tokio::spawn(server.run(listener, updates, shutdown.subscribe()));

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client
        .post(format!("http://{addr}/sendmessage"))
        .form(&[
            ("Имя", "Мария"),
            ("Телефон", "+7 912 345-67-89"),
            ("Сообщение", "Перезвоните, пожалуйста."),
        ])
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 200);
    let body: SubmissionResponse = res.json().await.unwrap();
    assert!(body.success);

    let call = calls.recv().await.unwrap();
    assert_eq!(call.path, "/bot123:test/sendMessage");
    assert_eq!(call.body["chat_id"], "-1001");
    assert_eq!(call.body["parse_mode"], "HTML");
    assert_eq!(
        call.body["text"],
        "<b>Сообщение с сайта БИТ:</b>\n\
         <b>Имя</b>: <i>Мария</i>\n\
         <b>Телефон</b>: <i>+79123456789</i>\n\
         <b>Сообщение</b>: <i>Перезвоните, пожалуйста.</i>"
    );

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), server_task)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_reload_switches_chat() {
    let (api_addr, mut calls) = common::start_mock_bot_api(StatusCode::OK, json!({"ok": true})).await;

    let mut config = common::test_config();
    config.relay.api_base = format!("http://{api_addr}");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config.clone()).unwrap();

    let shutdown = Shutdown::new();
    let (updates_tx, updates) = mpsc::unbounded_channel();
    tokio::spawn(server.run(listener, updates, shutdown.subscribe()));

    let mut reloaded = config;
    reloaded.relay.chat_id = "-2002".into();
    updates_tx.send(reloaded).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client
        .post(format!("http://{addr}/sendmessage"))
        .form(&[("name", "Олег"), ("phone", "89123456789"), ("instrument", "Скрипка")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let call = calls.recv().await.unwrap();
    assert_eq!(call.body["chat_id"], "-2002");

    shutdown.trigger();
}
