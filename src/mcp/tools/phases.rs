//! Phase tools.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::mcp::Args;
use crate::mcp::resources::{PhaseResource, ResourceHandler};

use super::{FieldSpec, InputSchema, ToolError, ToolHandler, string_arg};

static LIST_PHASES_SCHEMA: InputSchema = InputSchema {
    fields: &[FieldSpec::required(
        "project_id",
        "string",
        "Project whose phases to list",
    )],
};

pub fn phase_tools(resource: Arc<PhaseResource>) -> Vec<Arc<dyn ToolHandler>> {
    vec![Arc::new(ListPhases { resource })]
}

struct ListPhases {
    resource: Arc<PhaseResource>,
}

#[async_trait]
impl ToolHandler for ListPhases {
    fn name(&self) -> &'static str {
        "list_phases"
    }

    fn description(&self) -> &'static str {
        "List the phases of a project, in backend order."
    }

    fn schema(&self) -> &'static InputSchema {
        &LIST_PHASES_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let project_id = string_arg(&args, "project_id");

        let phases = self.resource.list(&args).await;
        let count = phases.len();

        Ok(json!({
            "success": true,
            "phases": phases,
            "count": count,
            "message": format!("Found {count} phases for project {project_id}"),
        }))
    }
}
