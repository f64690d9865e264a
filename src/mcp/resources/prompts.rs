//! Prompt resource handler.

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

const UPDATE_FIELDS: &[&str] = &["title", "content", "category", "tags"];

pub struct PromptResource {
    backend: Arc<dyn Backend>,
}

impl PromptResource {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ResourceHandler for PromptResource {
    fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            collection: "prompts",
            name: "Prompts",
            description: "Reusable prompt templates stored in the backend",
        }
    }

    async fn list(&self, params: &Args) -> Vec<Value> {
        let mut query: Vec<(String, String)> = Vec::new();
        passthrough_query(params, &[], &mut query);

        match self.backend.get("/api/prompts", &query).await {
            Ok(response) => data_array(response),
            Err(e) => {
                warn!(error = %e, "prompt list failed");
                Vec::new()
            }
        }
    }

    async fn read(&self, id: &str, sub: Option<&str>) -> ReadOutcome {
        if sub.is_some() {
            warn!(prompt_id = id, "unknown prompt sub-resource");
            return ReadOutcome::Missing;
        }

        match self.backend.get(&format!("/api/prompts/{id}"), &[]).await {
            Ok(entity) => ReadOutcome::Entity(entity),
            Err(e) => {
                warn!(prompt_id = id, error = %e, "prompt read failed");
                ReadOutcome::Missing
            }
        }
    }

    async fn create(&self, data: Args) -> Result<Value, ResourceError> {
        require_fields(&data, &["title", "content"])?;

        let created = self
            .backend
            .post("/api/prompts", &Value::Object(data))
            .await?;
        Ok(created)
    }

    async fn update(&self, id: &str, data: Args) -> Result<Option<Value>, ResourceError> {
        let body = allow_list(&data, UPDATE_FIELDS);
        let updated = self
            .backend
            .patch(&format!("/api/prompts/{id}"), &body)
            .await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<(), ResourceError> {
        self.backend.delete(&format!("/api/prompts/{id}")).await?;
        Ok(())
    }
}
