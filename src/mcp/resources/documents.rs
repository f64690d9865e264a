//! Document resource handler.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::backend::Backend;
use crate::mcp::Args;

use super::{
    ReadOutcome, ResourceDescriptor, ResourceError, ResourceHandler, allow_list, data_array,
    inject_default_project, passthrough_query, require_fields,
};

const UPDATE_FIELDS: &[&str] = &["title", "content", "doc_type", "tags"];

pub struct DocumentResource {
    backend: Arc<dyn Backend>,
    default_project: String,
}

impl DocumentResource {
    pub fn new(backend: Arc<dyn Backend>, default_project: String) -> Self {
        Self {
            backend,
            default_project,
        }
    }
}

#[async_trait]
impl ResourceHandler for DocumentResource {
    fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            collection: "documents",
            name: "Documents",
            description: "Project documents; exports stream the raw body",
        }
    }

    async fn list(&self, params: &Args) -> Vec<Value> {
        let mut query: Vec<(String, String)> = Vec::new();

        if !params.contains_key("project_id") {
            query.push(("project_id".to_string(), self.default_project.clone()));
        }
        passthrough_query(params, &[], &mut query);

        match self.backend.get("/api/documents", &query).await {
            Ok(response) => data_array(response),
            Err(e) => {
                warn!(error = %e, "document list failed");
                Vec::new()
            }
        }
    }

    async fn read(&self, id: &str, sub: Option<&str>) -> ReadOutcome {
        match sub {
            None => match self.backend.get(&format!("/api/documents/{id}"), &[]).await {
                Ok(entity) => ReadOutcome::Entity(entity),
                Err(e) => {
                    warn!(document_id = id, error = %e, "document read failed");
                    ReadOutcome::Missing
                }
            },
            Some("export") => {
                match self
                    .backend
                    .get_stream(&format!("/api/documents/{id}/export"))
                    .await
                {
                    Ok(stream) => ReadOutcome::Stream(stream),
                    Err(e) => {
                        warn!(document_id = id, error = %e, "document export failed");
                        ReadOutcome::Missing
                    }
                }
            }
            Some(other) => {
                warn!(document_id = id, sub = other, "unknown document sub-resource");
                ReadOutcome::Missing
            }
        }
    }

    async fn create(&self, mut data: Args) -> Result<Value, ResourceError> {
        require_fields(&data, &["title", "content"])?;
        inject_default_project(&mut data, &self.default_project);

        let created = self
            .backend
            .post("/api/documents", &Value::Object(data))
            .await?;
        Ok(created)
    }

    async fn update(&self, id: &str, data: Args) -> Result<Option<Value>, ResourceError> {
        let body = allow_list(&data, UPDATE_FIELDS);
        let updated = self
            .backend
            .patch(&format!("/api/documents/{id}"), &body)
            .await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<(), ResourceError> {
        self.backend.delete(&format!("/api/documents/{id}")).await?;
        Ok(())
    }
}
