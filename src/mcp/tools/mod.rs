//! Tool handlers: schema-described callable actions.
//!
//! Each tool declares a name, a description, and an input schema. The
//! dispatch router validates required fields and enum constraints against the
//! schema before the handler body runs, so handlers receive arguments that
//! already passed the declared shape.

mod documents;
mod errors;
mod phases;
mod projects;
mod prompts;
mod tasks;
mod workspaces;

#[cfg(test)]
mod documents_test;
#[cfg(test)]
mod errors_test;

pub use documents::document_tools;
pub use errors::error_tools;
pub use phases::phase_tools;
pub use projects::project_tools;
pub use prompts::prompt_tools;
pub use tasks::task_tools;
pub use workspaces::workspace_tools;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::backend::BackendError;

use super::Args;
use super::resources::ResourceError;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// A named, schema-described callable action.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn schema(&self) -> &'static InputSchema;

    /// Run the tool with schema-validated arguments. Errors are converted to
    /// failure envelopes by the router; handlers may also return a failure
    /// envelope directly for domain conditions like "not found".
    async fn call(&self, args: Args) -> Result<Value, ToolError>;
}

// =============================================================================
// Input schemas
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub allowed: Option<&'static [&'static str]>,
    pub default: Option<&'static str>,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: true,
            allowed: None,
            default: None,
        }
    }

    pub const fn optional(name: &'static str, kind: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
            allowed: None,
            default: None,
        }
    }

    pub const fn with_enum(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = Some(allowed);
        self
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InputSchema {
    pub fields: &'static [FieldSpec],
}

impl InputSchema {
    /// JSON-schema-shaped description advertised through `tools/list`.
    pub fn to_json(&self) -> Value {
        let mut properties = Map::new();
        let mut required: Vec<&str> = Vec::new();

        for field in self.fields {
            let mut spec = Map::new();
            spec.insert("type".to_string(), json!(field.kind));
            spec.insert("description".to_string(), json!(field.description));
            if let Some(allowed) = field.allowed {
                spec.insert("enum".to_string(), json!(allowed));
            }
            if let Some(default) = field.default {
                spec.insert("default".to_string(), json!(default));
            }
            properties.insert(field.name.to_string(), Value::Object(spec));
            if field.required {
                required.push(field.name);
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Check required-field presence and enum constraints. Runs before the
    /// handler body, so a failure here never reaches the backend.
    pub fn validate(&self, args: &Args) -> Result<(), String> {
        for field in self.fields {
            if field.required {
                match args.get(field.name) {
                    None | Some(Value::Null) => {
                        return Err(format!("{} is required", field.name));
                    }
                    _ => {}
                }
            }
            if let (Some(allowed), Some(value)) = (field.allowed, args.get(field.name)) {
                if let Some(s) = value.as_str() {
                    if !allowed.contains(&s) {
                        return Err(format!(
                            "{} must be one of: {}",
                            field.name,
                            allowed.join(", ")
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Extract a string argument that schema validation already proved present.
/// Numeric ids are rendered as strings rather than rejected.
pub(crate) fn string_arg(args: &Args, name: &str) -> String {
    match args.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
