//! Tests for task command output.

use std::sync::Arc;

use serde_json::json;

use crate::backend::testing::StubBackend;
use crate::cli::error::CliError;

use super::task;

fn stub_with_tasks() -> Arc<StubBackend> {
    Arc::new(StubBackend::new().reply(
        "GET",
        "/api/tasks",
        json!({
            "data": [
                {"id": "t-1", "title": "Write the report", "status": "in_progress", "priority": "high"},
                {"id": "t-2", "title": "Review the PR", "status": "todo"},
            ],
            "total": 2,
        }),
    ))
}

#[tokio::test]
async fn table_output_lists_every_task() {
    let stub = stub_with_tasks();

    let output = task::list(stub.as_ref(), "proj-1", None, None, "table")
        .await
        .unwrap();

    assert!(output.contains("t-1"));
    assert!(output.contains("Write the report"));
    assert!(output.contains("t-2"));
}

#[tokio::test]
async fn json_output_round_trips() {
    let stub = stub_with_tasks();

    let output = task::list(stub.as_ref(), "proj-1", None, None, "json")
        .await
        .unwrap();

    let parsed: Vec<task::Task> = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].id, "t-1");
}

#[tokio::test]
async fn unknown_format_is_rejected() {
    let stub = stub_with_tasks();

    let err = task::list(stub.as_ref(), "proj-1", None, None, "yaml")
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::InvalidFormat { .. }));
}

#[tokio::test]
async fn list_scopes_to_the_default_project() {
    let stub = stub_with_tasks();

    task::list(stub.as_ref(), "proj-1", None, None, "json")
        .await
        .unwrap();

    let call = &stub.calls_for("GET", "/api/tasks")[0];
    assert!(call.query.contains(&("project_id".to_string(), "proj-1".to_string())));
}

#[tokio::test]
async fn complete_patches_status_done() {
    let stub = Arc::new(StubBackend::new().reply(
        "PATCH",
        "/api/tasks/t-1",
        json!({"id": "t-1", "status": "done"}),
    ));

    let output = task::complete(stub.as_ref(), "t-1").await.unwrap();

    assert_eq!(output, "Task t-1 completed");
    let call = &stub.calls_for("PATCH", "/api/tasks/t-1")[0];
    assert_eq!(call.body.as_ref().unwrap()["status"], "done");
}
