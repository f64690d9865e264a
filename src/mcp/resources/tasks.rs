//! Task resource handler.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::warn;

use crate::backend::Backend;
use crate::mcp::Args;

use super::{
    ReadOutcome, ResourceDescriptor, ResourceError, ResourceHandler, allow_list, data_array,
    passthrough_query, require_fields, scalar,
};

/// Fields forwarded on update; everything else is dropped.
const UPDATE_FIELDS: &[&str] = &[
    "title",
    "description",
    "status",
    "priority",
    "assignee_id",
    "phase_id",
    "due_date",
];

pub struct TaskResource {
    backend: Arc<dyn Backend>,
    default_project: String,
}

impl TaskResource {
    pub fn new(backend: Arc<dyn Backend>, default_project: String) -> Self {
        Self {
            backend,
            default_project,
        }
    }
}

#[async_trait]
impl ResourceHandler for TaskResource {
    fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            collection: "tasks",
            name: "Tasks",
            description: "Tasks in the default project, filtered to in_progress unless asked otherwise",
        }
    }

    async fn list(&self, params: &Args) -> Vec<Value> {
        let mut query: Vec<(String, String)> = Vec::new();

        // Tasks default to the in_progress filter; the sentinel "all"
        // suppresses the status filter entirely instead of being forwarded.
        match params.get("status") {
            None => query.push(("status".to_string(), "in_progress".to_string())),
            Some(v) if v.as_str() == Some("all") => {}
            Some(v) => {
                if let Some(s) = scalar(v) {
                    query.push(("status".to_string(), s));
                }
            }
        }

        if !params.contains_key("project_id") {
            query.push(("project_id".to_string(), self.default_project.clone()));
        }

        passthrough_query(params, &["status"], &mut query);

        match self.backend.get("/api/tasks", &query).await {
            Ok(response) => data_array(response),
            Err(e) => {
                warn!(error = %e, "task list failed");
                Vec::new()
            }
        }
    }

    async fn read(&self, id: &str, sub: Option<&str>) -> ReadOutcome {
        let path = match sub {
            None => format!("/api/tasks/{id}"),
            Some("subtasks") => format!("/api/tasks/{id}/subtasks"),
            Some(other) => {
                warn!(task_id = id, sub = other, "unknown task sub-resource");
                return ReadOutcome::Missing;
            }
        };

        match self.backend.get(&path, &[]).await {
            Ok(entity) if sub == Some("subtasks") => {
                ReadOutcome::Entity(Value::Array(data_array(entity)))
            }
            Ok(entity) => ReadOutcome::Entity(entity),
            Err(e) => {
                warn!(task_id = id, error = %e, "task read failed");
                ReadOutcome::Missing
            }
        }
    }

    async fn create(&self, mut data: Args) -> Result<Value, ResourceError> {
        require_fields(&data, &["title"])?;
        super::inject_default_project(&mut data, &self.default_project);

        let created = self
            .backend
            .post("/api/tasks", &Value::Object(data))
            .await?;
        Ok(created)
    }

    async fn update(&self, id: &str, data: Args) -> Result<Option<Value>, ResourceError> {
        let body = allow_list(&data, UPDATE_FIELDS);

        match self.backend.patch(&format!("/api/tasks/{id}"), &body).await {
            Ok(updated) => Ok(Some(updated)),
            Err(e) => {
                // Task updates absorb backend failures into null.
                warn!(task_id = id, error = %e, "task update failed");
                Ok(None)
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<(), ResourceError> {
        self.backend.delete(&format!("/api/tasks/{id}")).await?;
        Ok(())
    }
}

impl TaskResource {
    /// Effective status filter for a given argument bag, as reported back to
    /// callers in `filter_applied`.
    pub fn applied_status(params: &Args) -> String {
        match params.get("status") {
            None => "in_progress".to_string(),
            Some(v) => scalar(v).unwrap_or_else(|| "all".to_string()),
        }
    }

    /// Effective project scope for a given argument bag.
    pub fn applied_project(&self, params: &Args) -> Value {
        match params.get("project_id") {
            Some(v) => v.clone(),
            None => json!(self.default_project),
        }
    }
}
