//! Integration tests for the reqwest-backed client against a stub server.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use futures_util::StreamExt;
use serde_json::{Value, json};

use super::{Backend, BackendError, HttpBackend};

async fn spawn_stub(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

fn client_for(addr: SocketAddr) -> HttpBackend {
    HttpBackend::new(
        format!("http://{addr}"),
        "secret-token",
        Duration::from_secs(2),
    )
    .expect("build client")
}

#[tokio::test]
async fn successful_response_unwraps_to_json_body() {
    let addr = spawn_stub(Router::new().route(
        "/api/workspaces",
        get(|| async { Json(json!({"data": [{"id": "ws-1"}], "total": 1})) }),
    ))
    .await;

    let body = client_for(addr).get("/api/workspaces", &[]).await.unwrap();

    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["id"], "ws-1");
}

#[tokio::test]
async fn bearer_token_and_content_type_are_attached() {
    let addr = spawn_stub(Router::new().route(
        "/api/echo",
        get(|req: Request| async move {
            let auth = req
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let content_type = req
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Json(json!({"authorization": auth, "content_type": content_type}))
        }),
    ))
    .await;

    let body = client_for(addr).get("/api/echo", &[]).await.unwrap();

    assert_eq!(body["authorization"], "Bearer secret-token");
    assert_eq!(body["content_type"], "application/json");
}

#[tokio::test]
async fn query_parameters_are_forwarded() {
    let addr = spawn_stub(Router::new().route(
        "/api/tasks",
        get(|req: Request| async move {
            let query = req.uri().query().unwrap_or_default().to_string();
            Json(json!({"query": query}))
        }),
    ))
    .await;

    let body = client_for(addr)
        .get(
            "/api/tasks",
            &[
                ("status".to_string(), "in_progress".to_string()),
                ("project_id".to_string(), "proj-1".to_string()),
            ],
        )
        .await
        .unwrap();

    assert_eq!(body["query"], "status=in_progress&project_id=proj-1");
}

#[tokio::test]
async fn non_2xx_with_message_field_uses_it_verbatim() {
    let addr = spawn_stub(Router::new().route(
        "/api/tasks",
        post(|| async { (StatusCode::BAD_REQUEST, Json(json!({"message": "X"}))) }),
    ))
    .await;

    let err = client_for(addr)
        .post("/api/tasks", &json!({"title": "t"}))
        .await
        .unwrap_err();

    match err {
        BackendError::Api {
            status,
            message,
            body,
        } => {
            assert_eq!(status, 400);
            assert_eq!(message, "X");
            assert!(body.unwrap().contains("\"message\""));
        }
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn non_2xx_without_message_falls_back_to_status_text() {
    let addr = spawn_stub(Router::new().route(
        "/api/tasks/{id}",
        get(|| async { (StatusCode::NOT_FOUND, "gone") }),
    ))
    .await;

    let err = client_for(addr).get("/api/tasks/42", &[]).await.unwrap_err();

    match err {
        BackendError::Api {
            status, message, ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not Found");
        }
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn unreachable_backend_yields_no_response() {
    // Nothing listens on port 1.
    let client = HttpBackend::new(
        "http://127.0.0.1:1",
        "secret-token",
        Duration::from_secs(2),
    )
    .unwrap();

    let err = client.get("/api/tasks", &[]).await.unwrap_err();

    assert!(matches!(err, BackendError::NoResponse { .. }));
    assert!(err.to_string().contains("No response received"));
}

#[tokio::test]
async fn slow_backend_times_out_as_no_response() {
    let addr = spawn_stub(Router::new().route(
        "/api/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(json!({}))
        }),
    ))
    .await;

    let client = HttpBackend::new(
        format!("http://{addr}"),
        "secret-token",
        Duration::from_millis(50),
    )
    .unwrap();

    let err = client.get("/api/slow", &[]).await.unwrap_err();

    assert!(matches!(err, BackendError::NoResponse { .. }));
}

#[tokio::test]
async fn delete_with_empty_body_yields_null() {
    let addr = spawn_stub(Router::new().route(
        "/api/tasks/{id}",
        delete(|| async { StatusCode::NO_CONTENT }),
    ))
    .await;

    let body = client_for(addr).delete("/api/tasks/42").await.unwrap();

    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn get_stream_relays_raw_bytes() {
    let addr = spawn_stub(Router::new().route(
        "/api/documents/doc-1/export",
        get(|| async { "# Exported\ncontent" }),
    ))
    .await;

    let mut stream = client_for(addr)
        .get_stream("/api/documents/doc-1/export")
        .await
        .unwrap();

    let mut collected = Vec::new();
    while let Some(chunk) = stream.next().await {
        collected.extend(chunk.unwrap());
    }

    assert_eq!(collected, b"# Exported\ncontent");
}
