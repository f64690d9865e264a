//! Tests for the stdio transport's line handling.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};

use crate::backend::testing::StubBackend;
use crate::config::Config;
use crate::mcp::{DispatchRouter, build_router};

use super::stdio::handle_line;

fn test_router(stub: StubBackend) -> DispatchRouter {
    let config = Config {
        api_url: "http://localhost:0".to_string(),
        api_token: "token".to_string(),
        default_project: "proj-1".to_string(),
        host: IpAddr::from([127, 0, 0, 1]),
        port: 0,
        log_filter: None,
        log_requests: false,
        request_timeout: Duration::from_secs(1),
    };
    build_router(Arc::new(stub), &config)
}

#[tokio::test]
async fn a_request_line_produces_exactly_one_response_line() {
    let router = test_router(StubBackend::new());

    let line = handle_line(&router, r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#)
        .await
        .unwrap();

    assert!(!line.contains('\n'));
    let response: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"], json!({}));
}

#[tokio::test]
async fn a_notification_line_produces_no_response() {
    let router = test_router(StubBackend::new());

    let reply = handle_line(
        &router,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
    )
    .await;

    assert!(reply.is_none());
}

#[tokio::test]
async fn an_unparseable_line_produces_a_parse_error() {
    let router = test_router(StubBackend::new());

    let line = handle_line(&router, "{broken").await.unwrap();

    let response: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(response["error"]["code"], -32700);
}

#[tokio::test]
async fn tool_calls_work_over_stdio() {
    let stub = StubBackend::new().reply(
        "GET",
        "/api/tasks",
        json!({"data": [{"id": "t-1", "status": "in_progress"}], "total": 1}),
    );
    let router = test_router(stub);

    let line = handle_line(
        &router,
        r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"list_tasks","arguments":{}}}"#,
    )
    .await
    .unwrap();

    let response: Value = serde_json::from_str(&line).unwrap();
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    let envelope: Value = serde_json::from_str(text).unwrap();
    assert_eq!(envelope["count"], 1);
}

#[tokio::test]
async fn streamed_reads_are_buffered_into_text_content() {
    let stub = StubBackend::new().stream_reply("/api/documents/d-1/export", b"exported".to_vec());
    let router = test_router(stub);

    let line = handle_line(
        &router,
        r#"{"jsonrpc":"2.0","id":9,"method":"resources/read","params":{"uri":"taskport://documents/d-1/export"}}"#,
    )
    .await
    .unwrap();

    let response: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(response["result"]["contents"][0]["text"], "exported");
}
