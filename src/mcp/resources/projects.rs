//! Project resource handler.
//!
//! Projects are read-only through this adapter: they can only be mutated in
//! the primary Taskdeck application. The refusal messages below are part of
//! the user-facing contract.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::backend::Backend;
use crate::mcp::Args;

use super::{
    ReadOutcome, ResourceDescriptor, ResourceError, ResourceHandler, data_array,
    passthrough_query,
};

pub const CREATE_NOT_SUPPORTED: &str =
    "Creating projects is not supported: projects are managed in the primary Taskdeck application";
pub const UPDATE_NOT_SUPPORTED: &str =
    "Updating projects is not supported: projects are managed in the primary Taskdeck application";
pub const DELETE_NOT_SUPPORTED: &str =
    "Deleting projects is not supported: projects are managed in the primary Taskdeck application";

pub struct ProjectResource {
    backend: Arc<dyn Backend>,
}

impl ProjectResource {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ResourceHandler for ProjectResource {
    fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            collection: "projects",
            name: "Projects",
            description: "Projects visible to the configured token (read-only)",
        }
    }

    async fn list(&self, params: &Args) -> Vec<Value> {
        let mut query: Vec<(String, String)> = Vec::new();
        passthrough_query(params, &[], &mut query);

        match self.backend.get("/api/projects", &query).await {
            Ok(response) => data_array(response),
            Err(e) => {
                warn!(error = %e, "project list failed");
                Vec::new()
            }
        }
    }

    async fn read(&self, id: &str, sub: Option<&str>) -> ReadOutcome {
        let path = match sub {
            None => format!("/api/projects/{id}"),
            Some("stats") => format!("/api/projects/{id}/stats"),
            Some(other) => {
                warn!(project_id = id, sub = other, "unknown project sub-resource");
                return ReadOutcome::Missing;
            }
        };

        match self.backend.get(&path, &[]).await {
            Ok(entity) => ReadOutcome::Entity(entity),
            Err(e) => {
                warn!(project_id = id, error = %e, "project read failed");
                ReadOutcome::Missing
            }
        }
    }

    async fn create(&self, _data: Args) -> Result<Value, ResourceError> {
        Err(ResourceError::Unsupported {
            message: CREATE_NOT_SUPPORTED.to_string(),
        })
    }

    async fn update(&self, _id: &str, _data: Args) -> Result<Option<Value>, ResourceError> {
        Err(ResourceError::Unsupported {
            message: UPDATE_NOT_SUPPORTED.to_string(),
        })
    }

    async fn delete(&self, _id: &str) -> Result<(), ResourceError> {
        Err(ResourceError::Unsupported {
            message: DELETE_NOT_SUPPORTED.to_string(),
        })
    }
}
