//! Error-report tools.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::mcp::Args;
use crate::mcp::resources::{ErrorResource, ResourceHandler};

use super::{FieldSpec, InputSchema, ToolError, ToolHandler, string_arg};

const SEVERITIES: &[&str] = &["low", "medium", "high", "critical"];

static LIST_ERRORS_SCHEMA: InputSchema = InputSchema {
    fields: &[
        FieldSpec::optional("status", "string", "Filter by report status.")
            .with_enum(&["open", "triaged", "resolved"]),
        FieldSpec::optional("severity", "string", "Filter by severity.").with_enum(SEVERITIES),
    ],
};

static REPORT_ERROR_SCHEMA: InputSchema = InputSchema {
    fields: &[
        FieldSpec::required("message", "string", "Error message"),
        FieldSpec::optional("severity", "string", "Severity. Defaults to 'medium'.")
            .with_enum(SEVERITIES)
            .with_default("medium"),
        FieldSpec::optional("stack_trace", "string", "Stack trace, if available."),
        FieldSpec::optional("context", "string", "What was happening when it occurred."),
    ],
};

static RESOLVE_ERROR_SCHEMA: InputSchema = InputSchema {
    fields: &[FieldSpec::required("error_id", "string", "Error report ID")],
};

pub fn error_tools(resource: Arc<ErrorResource>) -> Vec<Arc<dyn ToolHandler>> {
    vec![
        Arc::new(ListErrors {
            resource: Arc::clone(&resource),
        }),
        Arc::new(ReportError {
            resource: Arc::clone(&resource),
        }),
        Arc::new(ResolveError { resource }),
    ]
}

struct ListErrors {
    resource: Arc<ErrorResource>,
}

#[async_trait]
impl ToolHandler for ListErrors {
    fn name(&self) -> &'static str {
        "list_errors"
    }

    fn description(&self) -> &'static str {
        "List runtime error reports captured by the backend."
    }

    fn schema(&self) -> &'static InputSchema {
        &LIST_ERRORS_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let reports = self.resource.list(&args).await;
        let count = reports.len();

        Ok(json!({
            "success": true,
            "errors": reports,
            "count": count,
            "message": format!("Found {count} error reports"),
        }))
    }
}

struct ReportError {
    resource: Arc<ErrorResource>,
}

#[async_trait]
impl ToolHandler for ReportError {
    fn name(&self) -> &'static str {
        "report_error"
    }

    fn description(&self) -> &'static str {
        "File a new error report. Severity defaults to 'medium'."
    }

    fn schema(&self) -> &'static InputSchema {
        &REPORT_ERROR_SCHEMA
    }

    async fn call(&self, mut args: Args) -> Result<Value, ToolError> {
        args.entry("severity").or_insert(json!("medium"));

        let report = self.resource.create(args).await?;

        Ok(json!({
            "success": true,
            "error_report": report,
            "message": "Error report created",
        }))
    }
}

struct ResolveError {
    resource: Arc<ErrorResource>,
}

#[async_trait]
impl ToolHandler for ResolveError {
    fn name(&self) -> &'static str {
        "resolve_error"
    }

    fn description(&self) -> &'static str {
        "Mark an error report as resolved via the backend's status-change endpoint."
    }

    fn schema(&self) -> &'static InputSchema {
        &RESOLVE_ERROR_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let error_id = string_arg(&args, "error_id");

        let report = self.resource.resolve(&error_id).await?;

        Ok(json!({
            "success": true,
            "error_report": report,
            "message": format!("Error {error_id} marked as resolved"),
        }))
    }
}
