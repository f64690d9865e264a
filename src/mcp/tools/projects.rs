//! Project tools. Projects are read-only, so only list/get exist here.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::mcp::Args;
use crate::mcp::envelope;
use crate::mcp::resources::{ProjectResource, ReadOutcome, ResourceHandler};

use super::{FieldSpec, InputSchema, ToolError, ToolHandler, string_arg};

static LIST_PROJECTS_SCHEMA: InputSchema = InputSchema {
    fields: &[FieldSpec::optional(
        "workspace_id",
        "string",
        "Filter projects by workspace.",
    )],
};

static GET_PROJECT_SCHEMA: InputSchema = InputSchema {
    fields: &[FieldSpec::optional(
        "project_id",
        "string",
        "Project ID. Defaults to the configured project; the literal 'default' also resolves to it.",
    )],
};

pub fn project_tools(
    resource: Arc<ProjectResource>,
    default_project: String,
) -> Vec<Arc<dyn ToolHandler>> {
    vec![
        Arc::new(ListProjects {
            resource: Arc::clone(&resource),
        }),
        Arc::new(GetProject {
            resource,
            default_project,
        }),
    ]
}

struct ListProjects {
    resource: Arc<ProjectResource>,
}

#[async_trait]
impl ToolHandler for ListProjects {
    fn name(&self) -> &'static str {
        "list_projects"
    }

    fn description(&self) -> &'static str {
        "List all projects visible to the configured token."
    }

    fn schema(&self) -> &'static InputSchema {
        &LIST_PROJECTS_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let projects = self.resource.list(&args).await;
        let count = projects.len();

        Ok(json!({
            "success": true,
            "projects": projects,
            "count": count,
            "message": format!("Found {count} projects"),
        }))
    }
}

struct GetProject {
    resource: Arc<ProjectResource>,
    default_project: String,
}

#[async_trait]
impl ToolHandler for GetProject {
    fn name(&self) -> &'static str {
        "get_project"
    }

    fn description(&self) -> &'static str {
        "Get a project by ID. Without project_id, returns the configured default project."
    }

    fn schema(&self) -> &'static InputSchema {
        &GET_PROJECT_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let mut project_id = string_arg(&args, "project_id");
        if project_id.is_empty() || project_id == "default" {
            project_id = self.default_project.clone();
        }

        match self.resource.read(&project_id, None).await {
            ReadOutcome::Entity(project) => Ok(json!({
                "success": true,
                "project": project,
                "message": format!("Retrieved project {project_id}"),
            })),
            _ => Ok(envelope::failure(format!("Project {project_id} not found"))),
        }
    }
}
