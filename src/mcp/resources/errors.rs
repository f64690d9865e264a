//! Error-report resource handler.
//!
//! The backend exposes no general update-by-id endpoint for error reports,
//! only a status-change endpoint. `update` therefore merges the patch into
//! the fetched report and returns the merged object WITHOUT persisting it;
//! callers that want a durable state change go through [`ErrorResource::resolve`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::warn;

use crate::backend::Backend;
use crate::mcp::Args;

use super::{
    ReadOutcome, ResourceDescriptor, ResourceError, ResourceHandler, data_array,
    passthrough_query, require_fields,
};

/// Fields merged on update; everything else is dropped.
const UPDATE_FIELDS: &[&str] = &["status", "resolution", "notes"];

pub struct ErrorResource {
    backend: Arc<dyn Backend>,
}

impl ErrorResource {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Mark a report resolved through the backend's status-change endpoint.
    pub async fn resolve(&self, id: &str) -> Result<Value, ResourceError> {
        let resolved = self
            .backend
            .patch(
                &format!("/api/errors/{id}/status"),
                &json!({"status": "resolved"}),
            )
            .await?;
        Ok(resolved)
    }
}

#[async_trait]
impl ResourceHandler for ErrorResource {
    fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            collection: "errors",
            name: "Error reports",
            description: "Runtime error reports captured by the backend",
        }
    }

    async fn list(&self, params: &Args) -> Vec<Value> {
        let mut query: Vec<(String, String)> = Vec::new();
        passthrough_query(params, &[], &mut query);

        match self.backend.get("/api/errors", &query).await {
            Ok(response) => data_array(response),
            Err(e) => {
                warn!(error = %e, "error-report list failed");
                Vec::new()
            }
        }
    }

    async fn read(&self, id: &str, sub: Option<&str>) -> ReadOutcome {
        if sub.is_some() {
            warn!(report_id = id, "unknown error-report sub-resource");
            return ReadOutcome::Missing;
        }

        match self.backend.get(&format!("/api/errors/{id}"), &[]).await {
            Ok(entity) => ReadOutcome::Entity(entity),
            Err(e) => {
                warn!(report_id = id, error = %e, "error-report read failed");
                ReadOutcome::Missing
            }
        }
    }

    async fn create(&self, data: Args) -> Result<Value, ResourceError> {
        require_fields(&data, &["message"])?;

        let created = self
            .backend
            .post("/api/errors", &Value::Object(data))
            .await?;
        Ok(created)
    }

    async fn update(&self, id: &str, data: Args) -> Result<Option<Value>, ResourceError> {
        // Fetch-and-merge only: the merged object is returned to the caller
        // but never written back (no update-by-id endpoint exists).
        let current = self.backend.get(&format!("/api/errors/{id}"), &[]).await?;

        let mut merged = match current {
            Value::Object(map) => map,
            other => {
                return Err(ResourceError::Backend(
                    crate::backend::BackendError::InvalidResponse {
                        message: format!("expected an error report object, got {other}"),
                    },
                ));
            }
        };
        for field in UPDATE_FIELDS {
            if let Some(value) = data.get(*field) {
                merged.insert((*field).to_string(), value.clone());
            }
        }

        Ok(Some(Value::Object(merged)))
    }

    async fn delete(&self, id: &str) -> Result<(), ResourceError> {
        self.backend.delete(&format!("/api/errors/{id}")).await?;
        Ok(())
    }
}
