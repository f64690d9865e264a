//! Workspace resource handler.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::backend::Backend;
use crate::mcp::Args;

use super::{
    ReadOutcome, ResourceDescriptor, ResourceError, ResourceHandler, allow_list, data_array,
    passthrough_query, require_fields,
};

const UPDATE_FIELDS: &[&str] = &["name", "description"];

pub struct WorkspaceResource {
    backend: Arc<dyn Backend>,
}

impl WorkspaceResource {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ResourceHandler for WorkspaceResource {
    fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            collection: "workspaces",
            name: "Workspaces",
            description: "Workspaces visible to the configured token",
        }
    }

    async fn list(&self, params: &Args) -> Vec<Value> {
        let mut query: Vec<(String, String)> = Vec::new();
        passthrough_query(params, &[], &mut query);

        match self.backend.get("/api/workspaces", &query).await {
            Ok(response) => data_array(response),
            Err(e) => {
                warn!(error = %e, "workspace list failed");
                Vec::new()
            }
        }
    }

    async fn read(&self, id: &str, sub: Option<&str>) -> ReadOutcome {
        let path = match sub {
            None => format!("/api/workspaces/{id}"),
            Some("members") => format!("/api/workspaces/{id}/members"),
            Some(other) => {
                warn!(workspace_id = id, sub = other, "unknown workspace sub-resource");
                return ReadOutcome::Missing;
            }
        };

        match self.backend.get(&path, &[]).await {
            Ok(entity) if sub == Some("members") => {
                ReadOutcome::Entity(Value::Array(data_array(entity)))
            }
            Ok(entity) => ReadOutcome::Entity(entity),
            Err(e) => {
                warn!(workspace_id = id, error = %e, "workspace read failed");
                ReadOutcome::Missing
            }
        }
    }

    async fn create(&self, data: Args) -> Result<Value, ResourceError> {
        require_fields(&data, &["name"])?;

        let created = self
            .backend
            .post("/api/workspaces", &Value::Object(data))
            .await?;
        Ok(created)
    }

    async fn update(&self, id: &str, data: Args) -> Result<Option<Value>, ResourceError> {
        let body = allow_list(&data, UPDATE_FIELDS);
        let updated = self
            .backend
            .patch(&format!("/api/workspaces/{id}"), &body)
            .await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<(), ResourceError> {
        self.backend
            .delete(&format!("/api/workspaces/{id}"))
            .await?;
        Ok(())
    }
}
