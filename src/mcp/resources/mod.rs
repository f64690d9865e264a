//! Resource handlers, one per backend entity.
//!
//! Every handler implements the same contract over the shared [`Backend`],
//! but the failure policy differs per entity and per verb:
//!
//! | Entity     | list()     | read()       | create()         | update()                    |
//! |------------|------------|--------------|------------------|-----------------------------|
//! | tasks      | returns [] | returns null | throws           | returns null                |
//! | documents  | returns [] | returns null | throws           | throws                      |
//! | workspaces | returns [] | returns null | throws           | throws                      |
//! | projects   | returns [] | returns null | always throws    | always throws               |
//! | errors     | returns [] | returns null | throws           | returns merged, unpersisted |
//! | prompts    | returns [] | returns null | throws           | throws                      |
//!
//! ("throws" here means an `Err` that propagates; "returns null/[]" means the
//! failure is logged and absorbed.) These are product decisions, not
//! accidents; do not unify them.

pub mod documents;
pub mod errors;
pub mod phases;
pub mod projects;
pub mod prompts;
pub mod tasks;
pub mod workspaces;


pub use documents::DocumentResource;
pub use errors::ErrorResource;
pub use phases::PhaseResource;
pub use projects::ProjectResource;
pub use prompts::PromptResource;
pub use tasks::TaskResource;
pub use workspaces::WorkspaceResource;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::backend::{BackendError, ByteStream};

use super::Args;

#[derive(Error, Debug)]
pub enum ResourceError {
    /// Caller-supplied data failed local validation; no backend call was made.
    #[error("{message}")]
    Validation { message: String },

    /// The operation is not available through this adapter.
    #[error("{message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ResourceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Static identity of a resource collection.
#[derive(Debug, Clone, Copy)]
pub struct ResourceDescriptor {
    pub collection: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Outcome of a single-item read.
pub enum ReadOutcome {
    Entity(Value),
    /// Raw passthrough body (e.g. a document export).
    Stream(ByteStream),
    /// Not found, or an absorbed backend failure.
    Missing,
}

#[async_trait]
pub trait ResourceHandler: Send + Sync {
    fn descriptor(&self) -> ResourceDescriptor;

    /// List entities. Merges caller filters with entity defaults; absorbs
    /// backend failures into an empty list.
    async fn list(&self, params: &Args) -> Vec<Value>;

    /// Read one entity (or a sub-resource of it). Absorbs failures into
    /// [`ReadOutcome::Missing`].
    async fn read(&self, id: &str, sub: Option<&str>) -> ReadOutcome;

    /// Create an entity. Validates required fields locally before any
    /// backend call; failures propagate.
    async fn create(&self, data: Args) -> Result<Value, ResourceError>;

    /// Update an entity, forwarding only the per-entity field allow-list.
    /// `Ok(None)` is the absorbed-failure outcome for entities whose update
    /// policy returns null.
    async fn update(&self, id: &str, data: Args) -> Result<Option<Value>, ResourceError>;

    /// Delete an entity; failures propagate.
    async fn delete(&self, id: &str) -> Result<(), ResourceError>;
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Pull the `data` array out of a paginated list response.
pub(crate) fn data_array(response: Value) -> Vec<Value> {
    match response {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

/// Render a scalar JSON value as a query-string value.
pub(crate) fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Forward every scalar param except the ones already handled.
pub(crate) fn passthrough_query(
    params: &Args,
    skip: &[&str],
    query: &mut Vec<(String, String)>,
) {
    for (key, value) in params {
        if skip.contains(&key.as_str()) {
            continue;
        }
        if let Some(s) = scalar(value) {
            query.push((key.clone(), s));
        }
    }
}

/// Local required-field check, run before any backend call.
pub(crate) fn require_fields(data: &Args, fields: &[&str]) -> Result<(), ResourceError> {
    for field in fields {
        match data.get(*field) {
            Some(Value::Null) | None => {
                return Err(ResourceError::validation(format!("{field} is required")));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Project `data` down to the allow-listed fields. Unknown fields are
/// silently dropped, not rejected.
pub(crate) fn allow_list(data: &Args, allowed: &[&str]) -> Value {
    let mut body = Map::new();
    for field in allowed {
        if let Some(value) = data.get(*field) {
            body.insert((*field).to_string(), value.clone());
        }
    }
    Value::Object(body)
}

/// Inject the default project scope when the caller omitted `project_id`.
///
/// Only an absent key triggers the default; any present value, including an
/// empty string, counts as caller-provided and wins.
pub(crate) fn inject_default_project(data: &mut Args, default_project: &str) {
    if !data.contains_key("project_id") {
        data.insert("project_id".to_string(), json!(default_project));
    }
}
