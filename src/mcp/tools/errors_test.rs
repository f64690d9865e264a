//! Tests for error-report tools.

use std::sync::Arc;

use serde_json::json;

use crate::backend::testing::StubBackend;
use crate::mcp::Args;
use crate::mcp::resources::ErrorResource;

use super::ToolHandler;
use super::errors::error_tools;

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
    let resource = Arc::new(ErrorResource::new(Arc::clone(stub) as _));
    error_tools(resource)
}

#[tokio::test]
async fn report_error_defaults_severity_to_medium() {
    let stub = Arc::new(StubBackend::new().reply(
        "POST",
        "/api/errors",
        json!({"id": "e-1", "message": "boom"}),
    ));
    let tools = tools_over(&stub);

    let envelope = find(&tools, "report_error")
        .call(args(json!({"message": "boom"})))
        .await
        .unwrap();

    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["message"], "Error report created");

    let body = stub.calls_for("POST", "/api/errors")[0].body.clone().unwrap();
    assert_eq!(body["severity"], "medium");
}

#[tokio::test]
async fn resolve_error_reports_the_resolved_id() {
    let stub = Arc::new(StubBackend::new().reply(
        "PATCH",
        "/api/errors/e-1/status",
        json!({"id": "e-1", "status": "resolved"}),
    ));
    let tools = tools_over(&stub);

    let envelope = find(&tools, "resolve_error")
        .call(args(json!({"error_id": "e-1"})))
        .await
        .unwrap();

    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["message"], "Error e-1 marked as resolved");
    assert_eq!(envelope["error_report"]["status"], "resolved");
}
