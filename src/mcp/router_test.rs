//! Tests for the dispatch router: registries, routing rules, and the
//! tool-call/resource-read error asymmetry.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, json};

use crate::backend::testing::StubBackend;
use crate::backend::{Backend, MockBackend};
use crate::config::Config;
use crate::mcp::resources::{ResourceError, projects};
use crate::mcp::router::{ReadReply, RouterError};
use crate::mcp::{Args, DispatchRouter, build_router};

fn test_config() -> Config {
    Config {
        api_url: "http://localhost:0".to_string(),
        api_token: "token".to_string(),
        default_project: "proj-1".to_string(),
        host: IpAddr::from([127, 0, 0, 1]),
        port: 0,
        log_filter: None,
        log_requests: false,
        request_timeout: Duration::from_secs(1),
    }
}

fn router_over(backend: Arc<dyn Backend>) -> DispatchRouter {
    build_router(backend, &test_config())
}

fn args(value: serde_json::Value) -> Args {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("args must be an object"),
    }
}

#[tokio::test]
async fn unknown_tool_is_a_routing_error() {
    let router = router_over(Arc::new(StubBackend::new()));

    let err = router.call_tool("no_such_tool", None).await.unwrap_err();

    match err {
        RouterError::UnknownTool { name } => assert_eq!(name, "no_such_tool"),
        other => panic!("expected UnknownTool, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_required_field_never_reaches_the_backend() {
    // MockBackend has no expectations: any call would panic the test.
    let router = router_over(Arc::new(MockBackend::new()));

    let envelope = router
        .call_tool("get_task", Some(Map::new()))
        .await
        .unwrap();

    assert_eq!(envelope["success"], false);
    assert_eq!(envelope["error"], "task_id is required");
}

#[tokio::test]
async fn every_registered_tool_rejects_missing_required_fields_without_backend_calls() {
    let router = router_over(Arc::new(MockBackend::new()));

    for tool in router.list_tools() {
        let required = tool.input_schema["required"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        if required.is_empty() {
            continue;
        }

        let envelope = router.call_tool(tool.name, Some(Map::new())).await.unwrap();

        assert_eq!(
            envelope["success"], false,
            "{} accepted empty arguments",
            tool.name
        );
        let first_required = required[0].as_str().unwrap();
        assert_eq!(
            envelope["error"],
            format!("{first_required} is required"),
            "{} reported an unexpected validation error",
            tool.name
        );
    }
}

#[tokio::test]
async fn enum_violation_is_rejected_before_the_backend() {
    let router = router_over(Arc::new(MockBackend::new()));

    let envelope = router
        .call_tool("list_tasks", Some(args(json!({"status": "bogus"}))))
        .await
        .unwrap();

    assert_eq!(envelope["success"], false);
    assert_eq!(
        envelope["error"],
        "status must be one of: todo, in_progress, review, done, blocked, all"
    );
}

#[tokio::test]
async fn tool_handler_errors_become_failure_envelopes() {
    let stub = Arc::new(StubBackend::new().fail("POST", "/api/tasks", 500, "boom"));
    let router = router_over(stub);

    let envelope = router
        .call_tool("create_task", Some(args(json!({"title": "New"}))))
        .await
        .unwrap();

    assert_eq!(envelope["success"], false);
    assert_eq!(envelope["error"], "boom");
}

#[tokio::test]
async fn omitted_arguments_default_to_an_empty_map() {
    let stub = Arc::new(StubBackend::new().reply(
        "GET",
        "/api/tasks",
        json!({"data": [], "total": 0}),
    ));
    let router = router_over(Arc::clone(&stub) as _);

    let envelope = router.call_tool("list_tasks", None).await.unwrap();

    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["filter_applied"]["status"], "in_progress");
}

#[tokio::test]
async fn bare_collection_uri_lists() {
    let stub = Arc::new(StubBackend::new().reply(
        "GET",
        "/api/tasks",
        json!({"data": [{"id": "t-1"}], "total": 1}),
    ));
    let router = router_over(Arc::clone(&stub) as _);

    match router.read_resource("taskport://tasks").await.unwrap() {
        ReadReply::Json { content, .. } => {
            assert_eq!(content.as_array().unwrap().len(), 1);
        }
        _ => panic!("expected json reply"),
    }
}

#[tokio::test]
async fn trailing_id_reads_a_single_item() {
    let stub = Arc::new(StubBackend::new().reply(
        "GET",
        "/api/tasks/t-1",
        json!({"id": "t-1", "title": "First"}),
    ));
    let router = router_over(Arc::clone(&stub) as _);

    match router.read_resource("taskport://tasks/t-1").await.unwrap() {
        ReadReply::Json { content, .. } => assert_eq!(content["id"], "t-1"),
        _ => panic!("expected json reply"),
    }
}

#[tokio::test]
async fn default_literal_resolves_to_the_configured_project() {
    let stub = Arc::new(StubBackend::new().reply(
        "GET",
        "/api/projects/proj-1",
        json!({"id": "proj-1", "name": "Main"}),
    ));
    let router = router_over(Arc::clone(&stub) as _);

    match router
        .read_resource("taskport://projects/default")
        .await
        .unwrap()
    {
        ReadReply::Json { content, .. } => assert_eq!(content["id"], "proj-1"),
        _ => panic!("expected json reply"),
    }
}

#[tokio::test]
async fn unmatched_prefix_is_resource_not_found() {
    let router = router_over(Arc::new(StubBackend::new()));

    let err = router
        .read_resource("taskport://widgets/w-1")
        .await
        .unwrap_err();

    assert!(matches!(err, RouterError::ResourceNotFound { .. }));
}

#[tokio::test]
async fn malformed_uri_is_resource_not_found_not_a_panic() {
    let router = router_over(Arc::new(StubBackend::new()));

    for uri in ["", "tasks", "http://tasks", "taskport://"] {
        let err = router.read_resource(uri).await.unwrap_err();
        assert!(matches!(err, RouterError::ResourceNotFound { .. }), "uri: {uri}");
    }
}

#[tokio::test]
async fn absorbed_read_failures_surface_as_null_content() {
    let stub = Arc::new(StubBackend::new().fail("GET", "/api/tasks/t-404", 404, "Not Found"));
    let router = router_over(Arc::clone(&stub) as _);

    match router.read_resource("taskport://tasks/t-404").await.unwrap() {
        ReadReply::Json { content, .. } => assert!(content.is_null()),
        _ => panic!("expected json reply"),
    }
}

#[tokio::test]
async fn project_writes_propagate_the_unsupported_error() {
    let router = router_over(Arc::new(MockBackend::new()));

    let err = router
        .update_resource("taskport://projects/proj-1", Map::new())
        .await
        .unwrap_err();

    match err {
        RouterError::Resource(ResourceError::Unsupported { message }) => {
            assert_eq!(message, projects::UPDATE_NOT_SUPPORTED);
        }
        other => panic!("expected Unsupported, got {other:?}"),
    }
}

#[tokio::test]
async fn create_validation_failures_propagate_as_errors() {
    let router = router_over(Arc::new(MockBackend::new()));

    let err = router
        .create_resource("taskport://tasks", Map::new())
        .await
        .unwrap_err();

    match err {
        RouterError::Resource(ResourceError::Validation { message }) => {
            assert_eq!(message, "title is required");
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn update_without_an_id_is_resource_not_found() {
    let router = router_over(Arc::new(StubBackend::new()));

    let err = router
        .update_resource("taskport://tasks", Map::new())
        .await
        .unwrap_err();

    assert!(matches!(err, RouterError::ResourceNotFound { .. }));
}

#[tokio::test]
async fn registries_cover_the_full_resource_and_tool_sets() {
    let router = router_over(Arc::new(StubBackend::new()));

    let resources = router.list_resources();
    let collections: Vec<&str> = resources
        .iter()
        .map(|r| r.uri.strip_prefix("taskport://").unwrap())
        .collect();
    for expected in [
        "tasks",
        "projects",
        "documents",
        "workspaces",
        "phases",
        "errors",
        "prompts",
    ] {
        assert!(collections.contains(&expected), "missing resource {expected}");
    }

    let tools = router.list_tools();
    let names: Vec<&str> = tools.iter().map(|t| t.name).collect();
    for expected in [
        "list_tasks",
        "get_task",
        "create_task",
        "update_task",
        "delete_task",
        "list_projects",
        "get_project",
        "list_documents",
        "get_document",
        "create_document",
        "update_document",
        "list_workspaces",
        "get_workspace",
        "list_phases",
        "list_errors",
        "report_error",
        "resolve_error",
        "list_prompts",
        "get_prompt",
        "create_prompt",
    ] {
        assert!(names.contains(&expected), "missing tool {expected}");
    }
}

#[tokio::test]
async fn tool_schemas_advertise_required_fields() {
    let router = router_over(Arc::new(StubBackend::new()));

    let tools = router.list_tools();
    let create_task = tools.iter().find(|t| t.name == "create_task").unwrap();

    assert_eq!(create_task.input_schema["type"], "object");
    assert_eq!(create_task.input_schema["required"], json!(["title"]));
    assert_eq!(
        create_task.input_schema["properties"]["priority"]["default"],
        "medium"
    );
}
