//! Project commands (read-only, like the adapter itself).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::{Table, Tabled};

use crate::backend::Backend;
use crate::cli::error::{CliError, CliResult};
use crate::cli::output::{apply_table_style, format_opt, truncate_with_ellipsis};

#[derive(Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
}

#[derive(Tabled)]
struct ProjectDisplay {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Workspace")]
    workspace: String,
}

impl From<&Project> for ProjectDisplay {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            name: truncate_with_ellipsis(&project.name, 40),
            workspace: format_opt(project.workspace_id.as_deref()),
        }
    }
}

pub async fn list(backend: &dyn Backend, format: &str) -> CliResult<String> {
    let response = backend.get("/api/projects", &[]).await?;
    let projects: Vec<Project> = serde_json::from_value(
        response.get("data").cloned().unwrap_or(Value::Array(vec![])),
    )?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&projects)?),
        "table" => {
            if projects.is_empty() {
                return Ok("No projects found".to_string());
            }
            let rows: Vec<ProjectDisplay> = projects.iter().map(ProjectDisplay::from).collect();
            let mut table = Table::new(rows);
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
        other => Err(CliError::InvalidFormat {
            format: other.to_string(),
        }),
    }
}

/// Get a project; falls back to the configured default project.
pub async fn get(backend: &dyn Backend, default_project: &str, id: Option<&str>) -> CliResult<String> {
    let id = match id {
        Some("default") | None => default_project,
        Some(id) => id,
    };
    let project = backend.get(&format!("/api/projects/{id}"), &[]).await?;
    Ok(serde_json::to_string_pretty(&project)?)
}
