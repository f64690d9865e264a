//! Task commands: thin wrappers over the backend's task endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tabled::{Table, Tabled};

use crate::backend::Backend;
use crate::cli::error::{CliError, CliResult};
use crate::cli::output::{apply_table_style, format_opt, truncate_with_ellipsis};

#[derive(Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

#[derive(Tabled)]
struct TaskDisplay {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
}

impl From<&Task> for TaskDisplay {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: truncate_with_ellipsis(&task.title, 50),
            status: task.status.clone(),
            priority: format_opt(task.priority.as_deref()),
        }
    }
}

/// List tasks, scoped to a project (default project when omitted).
pub async fn list(
    backend: &dyn Backend,
    default_project: &str,
    status: Option<&str>,
    project_id: Option<&str>,
    format: &str,
) -> CliResult<String> {
    let mut query: Vec<(String, String)> = vec![(
        "project_id".to_string(),
        project_id.unwrap_or(default_project).to_string(),
    )];
    if let Some(status) = status {
        if status != "all" {
            query.push(("status".to_string(), status.to_string()));
        }
    }

    let response = backend.get("/api/tasks", &query).await?;
    let tasks: Vec<Task> = serde_json::from_value(
        response.get("data").cloned().unwrap_or(Value::Array(vec![])),
    )?;

    render_list(&tasks, format)
}

/// Get a single task by id.
pub async fn get(backend: &dyn Backend, id: &str) -> CliResult<String> {
    let task = backend.get(&format!("/api/tasks/{id}"), &[]).await?;
    Ok(serde_json::to_string_pretty(&task)?)
}

/// Create a task; prints the created entity as JSON.
pub async fn create(
    backend: &dyn Backend,
    default_project: &str,
    title: &str,
    description: Option<&str>,
    priority: Option<&str>,
    project_id: Option<&str>,
) -> CliResult<String> {
    let mut body = json!({
        "title": title,
        "status": "todo",
        "priority": priority.unwrap_or("medium"),
        "project_id": project_id.unwrap_or(default_project),
    });
    if let Some(description) = description {
        body["description"] = json!(description);
    }

    let created = backend.post("/api/tasks", &body).await?;
    Ok(serde_json::to_string_pretty(&created)?)
}

/// Mark a task done.
pub async fn complete(backend: &dyn Backend, id: &str) -> CliResult<String> {
    backend
        .patch(&format!("/api/tasks/{id}"), &json!({"status": "done"}))
        .await?;
    Ok(format!("Task {id} completed"))
}

fn render_list(tasks: &[Task], format: &str) -> CliResult<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(tasks)?),
        "table" => {
            if tasks.is_empty() {
                return Ok("No tasks found".to_string());
            }
            let rows: Vec<TaskDisplay> = tasks.iter().map(TaskDisplay::from).collect();
            let mut table = Table::new(rows);
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
        other => Err(CliError::InvalidFormat {
            format: other.to_string(),
        }),
    }
}
