//! Tests for document tools.

use std::sync::Arc;

use serde_json::json;

use crate::backend::testing::StubBackend;
use crate::mcp::Args;
use crate::mcp::resources::DocumentResource;

use super::documents::document_tools;
use super::{ToolError, ToolHandler};

fn args(value: serde_json::Value) -> Args {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("args must be an object"),
    }
}

fn find<'a>(tools: &'a [Arc<dyn ToolHandler>], name: &str) -> &'a Arc<dyn ToolHandler> {
    tools
        .iter()
        .find(|t| t.name() == name)
        .unwrap_or_else(|| panic!("tool {name} not registered"))
}

fn tools_over(stub: &Arc<StubBackend>) -> Vec<Arc<dyn ToolHandler>> {
    let resource = Arc::new(DocumentResource::new(
        Arc::clone(stub) as _,
        "proj-1".to_string(),
    ));
    document_tools(resource)
}

#[tokio::test]
async fn create_document_defaults_doc_type_to_note() {
    let stub = Arc::new(StubBackend::new().reply(
        "POST",
        "/api/documents",
        json!({"id": "d-1", "title": "Spec"}),
    ));
    let tools = tools_over(&stub);

    let envelope = find(&tools, "create_document")
        .call(args(json!({"title": "Spec", "content": "..."})))
        .await
        .unwrap();

    assert_eq!(envelope["message"], "Document created: Spec");

    let body = stub.calls_for("POST", "/api/documents")[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(body["doc_type"], "note");
    assert_eq!(body["project_id"], "proj-1");
}

#[tokio::test]
async fn update_document_backend_failure_propagates_as_error() {
    let stub = Arc::new(StubBackend::new().fail("PATCH", "/api/documents/d-1", 500, "boom"));
    let tools = tools_over(&stub);

    let err = find(&tools, "update_document")
        .call(args(json!({"document_id": "d-1", "title": "Renamed"})))
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::Resource(_)));
    assert_eq!(err.to_string(), "boom");
}

#[tokio::test]
async fn get_document_not_found_is_a_failure_envelope() {
    let stub = Arc::new(StubBackend::new().fail("GET", "/api/documents/d-404", 404, "Not Found"));
    let tools = tools_over(&stub);

    let envelope = find(&tools, "get_document")
        .call(args(json!({"document_id": "d-404"})))
        .await
        .unwrap();

    assert_eq!(envelope["success"], false);
    assert_eq!(envelope["error"], "Document d-404 not found");
}
