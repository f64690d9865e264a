//! Dispatch router: tool and resource registries plus routing rules.
//!
//! Tools and resources live in separate namespaces, both keyed by exact
//! match (name for tools, collection prefix for resources). Registries are
//! populated once at startup and never mutated afterwards.
//!
//! Error handling is deliberately asymmetric:
//! - `call_tool` converts every handler failure into a `{success:false}`
//!   envelope, so tool calls are total from the caller's perspective.
//! - resource routing propagates handler failures to the transport; only the
//!   per-entity absorb rules (null / empty list) apply inside the handlers.
//! Unknown tool names and unmatched collection prefixes are routing errors
//! in both namespaces.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::backend::ByteStream;

use super::envelope;
use super::resources::{ReadOutcome, ResourceError, ResourceHandler};
use super::tools::ToolHandler;
use super::uri::{ResourceUri, collection_uri};
use super::Args;

#[derive(Error, Debug)]
pub enum RouterError {
    /// The caller named a tool that is not registered. A caller/programming
    /// mistake, surfaced as a protocol-level error.
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    /// The URI did not match any registered collection prefix.
    #[error("Resource not found: {uri}")]
    ResourceNotFound { uri: String },

    /// A resource handler failed during a write or a streamed read.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Tool entry as advertised through `tools/list`.
#[derive(Debug, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Resource entry as advertised through `resources/list`.
#[derive(Debug, Serialize)]
pub struct ResourceInfo {
    pub uri: String,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
}

/// Outcome of a resource read: JSON content or a raw byte stream.
pub enum ReadReply {
    Json { uri: String, content: Value },
    Stream { uri: String, stream: ByteStream },
}

impl std::fmt::Debug for ReadReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadReply::Json { uri, content } => f
                .debug_struct("Json")
                .field("uri", uri)
                .field("content", content)
                .finish(),
            ReadReply::Stream { uri, .. } => f
                .debug_struct("Stream")
                .field("uri", uri)
                .field("stream", &"<ByteStream>")
                .finish(),
        }
    }
}

pub struct DispatchRouter {
    tools: BTreeMap<&'static str, Arc<dyn ToolHandler>>,
    resources: BTreeMap<&'static str, Arc<dyn ResourceHandler>>,
    default_project: String,
}

impl DispatchRouter {
    pub fn new(default_project: impl Into<String>) -> Self {
        Self {
            tools: BTreeMap::new(),
            resources: BTreeMap::new(),
            default_project: default_project.into(),
        }
    }

    /// Register a tool. Names are unique within the registry.
    pub fn register_tool(&mut self, tool: Arc<dyn ToolHandler>) {
        let name = tool.name();
        debug!(tool = name, "registering tool");
        let previous = self.tools.insert(name, tool);
        debug_assert!(previous.is_none(), "duplicate tool name: {name}");
    }

    /// Register a resource handler under its collection prefix.
    pub fn register_resource(&mut self, resource: Arc<dyn ResourceHandler>) {
        let collection = resource.descriptor().collection;
        debug!(collection, "registering resource");
        let previous = self.resources.insert(collection, resource);
        debug_assert!(previous.is_none(), "duplicate resource collection: {collection}");
    }

    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .values()
            .map(|tool| ToolInfo {
                name: tool.name(),
                description: tool.description(),
                input_schema: tool.schema().to_json(),
            })
            .collect()
    }

    pub fn list_resources(&self) -> Vec<ResourceInfo> {
        self.resources
            .values()
            .map(|resource| {
                let descriptor = resource.descriptor();
                ResourceInfo {
                    uri: collection_uri(descriptor.collection),
                    name: descriptor.name,
                    description: descriptor.description,
                    mime_type: "application/json",
                }
            })
            .collect()
    }

    /// Call a tool by exact name.
    ///
    /// Schema validation runs before the handler body, so missing required
    /// fields never reach the backend. Handler failures come back as failure
    /// envelopes, not errors.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<Args>,
    ) -> Result<Value, RouterError> {
        let tool = self.tools.get(name).ok_or_else(|| RouterError::UnknownTool {
            name: name.to_string(),
        })?;

        let args = arguments.unwrap_or_default();

        if let Err(message) = tool.schema().validate(&args) {
            return Ok(envelope::failure(message));
        }

        match tool.call(args).await {
            Ok(result) => Ok(result),
            Err(e) => Ok(envelope::failure(e.to_string())),
        }
    }

    /// Read a resource: the bare collection lists, a trailing id reads one
    /// item. The id literal `default` on the projects collection resolves to
    /// the configured default project.
    #[instrument(skip(self))]
    pub async fn read_resource(&self, uri: &str) -> Result<ReadReply, RouterError> {
        let (handler, parsed) = self.resolve(uri)?;

        match parsed.id {
            None => {
                let items = handler.list(&Args::new()).await;
                Ok(ReadReply::Json {
                    uri: uri.to_string(),
                    content: Value::Array(items),
                })
            }
            Some(id) => {
                let id = if parsed.collection == "projects" && id == "default" {
                    self.default_project.as_str()
                } else {
                    id
                };

                match handler.read(id, parsed.sub).await {
                    ReadOutcome::Entity(content) => Ok(ReadReply::Json {
                        uri: uri.to_string(),
                        content,
                    }),
                    ReadOutcome::Missing => Ok(ReadReply::Json {
                        uri: uri.to_string(),
                        content: Value::Null,
                    }),
                    ReadOutcome::Stream(stream) => Ok(ReadReply::Stream {
                        uri: uri.to_string(),
                        stream,
                    }),
                }
            }
        }
    }

    /// Create an entity in the collection the URI names.
    #[instrument(skip(self, data))]
    pub async fn create_resource(&self, uri: &str, data: Args) -> Result<Value, RouterError> {
        let (handler, _) = self.resolve(uri)?;
        Ok(handler.create(data).await?)
    }

    /// Update the entity the URI addresses. `null` is the absorbed-failure
    /// outcome for entities whose update policy returns null.
    #[instrument(skip(self, data))]
    pub async fn update_resource(&self, uri: &str, data: Args) -> Result<Value, RouterError> {
        let (handler, parsed) = self.resolve(uri)?;
        let id = parsed.id.ok_or_else(|| RouterError::ResourceNotFound {
            uri: uri.to_string(),
        })?;

        match handler.update(id, data).await? {
            Some(updated) => Ok(updated),
            None => Ok(Value::Null),
        }
    }

    /// Delete the entity the URI addresses.
    #[instrument(skip(self))]
    pub async fn delete_resource(&self, uri: &str) -> Result<Value, RouterError> {
        let (handler, parsed) = self.resolve(uri)?;
        let id = parsed.id.ok_or_else(|| RouterError::ResourceNotFound {
            uri: uri.to_string(),
        })?;

        handler.delete(id).await?;
        Ok(serde_json::json!({"deleted": true, "uri": uri}))
    }

    fn resolve<'a>(
        &self,
        uri: &'a str,
    ) -> Result<(&Arc<dyn ResourceHandler>, ResourceUri<'a>), RouterError> {
        let parsed = ResourceUri::parse(uri).ok_or_else(|| RouterError::ResourceNotFound {
            uri: uri.to_string(),
        })?;
        let handler =
            self.resources
                .get(parsed.collection)
                .ok_or_else(|| RouterError::ResourceNotFound {
                    uri: uri.to_string(),
                })?;
        Ok((handler, parsed))
    }
}
