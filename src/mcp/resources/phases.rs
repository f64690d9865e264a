//! Phase resource handler.
//!
//! Phases are nested under projects on the backend; listing without an
//! explicit `project_id` falls back to the default project scope.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::backend::Backend;
use crate::mcp::Args;

use super::{
    ReadOutcome, ResourceDescriptor, ResourceError, ResourceHandler, allow_list, data_array,
    require_fields, scalar,
};

const UPDATE_FIELDS: &[&str] = &["name", "description", "status", "order"];

pub struct PhaseResource {
    backend: Arc<dyn Backend>,
    default_project: String,
}

impl PhaseResource {
    pub fn new(backend: Arc<dyn Backend>, default_project: String) -> Self {
        Self {
            backend,
            default_project,
        }
    }
}

#[async_trait]
impl ResourceHandler for PhaseResource {
    fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            collection: "phases",
            name: "Phases",
            description: "Project phases, ordered as the backend returns them",
        }
    }

    async fn list(&self, params: &Args) -> Vec<Value> {
        let project_id = params
            .get("project_id")
            .and_then(scalar)
            .unwrap_or_else(|| self.default_project.clone());

        match self
            .backend
            .get(&format!("/api/projects/{project_id}/phases"), &[])
            .await
        {
            Ok(response) => data_array(response),
            Err(e) => {
                warn!(project_id, error = %e, "phase list failed");
                Vec::new()
            }
        }
    }

    async fn read(&self, id: &str, sub: Option<&str>) -> ReadOutcome {
        if sub.is_some() {
            warn!(phase_id = id, "unknown phase sub-resource");
            return ReadOutcome::Missing;
        }

        match self.backend.get(&format!("/api/phases/{id}"), &[]).await {
            Ok(entity) => ReadOutcome::Entity(entity),
            Err(e) => {
                warn!(phase_id = id, error = %e, "phase read failed");
                ReadOutcome::Missing
            }
        }
    }

    async fn create(&self, data: Args) -> Result<Value, ResourceError> {
        require_fields(&data, &["project_id", "name"])?;

        let created = self
            .backend
            .post("/api/phases", &Value::Object(data))
            .await?;
        Ok(created)
    }

    async fn update(&self, id: &str, data: Args) -> Result<Option<Value>, ResourceError> {
        let body = allow_list(&data, UPDATE_FIELDS);
        let updated = self
            .backend
            .patch(&format!("/api/phases/{id}"), &body)
            .await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<(), ResourceError> {
        self.backend.delete(&format!("/api/phases/{id}")).await?;
        Ok(())
    }
}
