//! Workspace tools.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::mcp::Args;
use crate::mcp::envelope;
use crate::mcp::resources::{ReadOutcome, ResourceHandler, WorkspaceResource};

use super::{FieldSpec, InputSchema, ToolError, ToolHandler, string_arg};

static LIST_WORKSPACES_SCHEMA: InputSchema = InputSchema { fields: &[] };

static GET_WORKSPACE_SCHEMA: InputSchema = InputSchema {
    fields: &[FieldSpec::required("workspace_id", "string", "Workspace ID")],
};

pub fn workspace_tools(resource: Arc<WorkspaceResource>) -> Vec<Arc<dyn ToolHandler>> {
    vec![
        Arc::new(ListWorkspaces {
            resource: Arc::clone(&resource),
        }),
        Arc::new(GetWorkspace { resource }),
    ]
}

struct ListWorkspaces {
    resource: Arc<WorkspaceResource>,
}

#[async_trait]
impl ToolHandler for ListWorkspaces {
    fn name(&self) -> &'static str {
        "list_workspaces"
    }

    fn description(&self) -> &'static str {
        "List workspaces visible to the configured token."
    }

    fn schema(&self) -> &'static InputSchema {
        &LIST_WORKSPACES_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let workspaces = self.resource.list(&args).await;
        let count = workspaces.len();

        Ok(json!({
            "success": true,
            "workspaces": workspaces,
            "count": count,
            "message": format!("Found {count} workspaces"),
        }))
    }
}

struct GetWorkspace {
    resource: Arc<WorkspaceResource>,
}

#[async_trait]
impl ToolHandler for GetWorkspace {
    fn name(&self) -> &'static str {
        "get_workspace"
    }

    fn description(&self) -> &'static str {
        "Get a workspace by ID."
    }

    fn schema(&self) -> &'static InputSchema {
        &GET_WORKSPACE_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let workspace_id = string_arg(&args, "workspace_id");

        match self.resource.read(&workspace_id, None).await {
            ReadOutcome::Entity(workspace) => Ok(json!({
                "success": true,
                "workspace": workspace,
                "message": format!("Retrieved workspace {workspace_id}"),
            })),
            _ => Ok(envelope::failure(format!(
                "Workspace {workspace_id} not found"
            ))),
        }
    }
}
