//! Protocol surface: message types, dispatch router, and handlers.
//!
//! # Architecture
//!
//! - **protocol**: JSON-RPC message types and method names
//! - **uri**: `taskport://` resource URI parsing
//! - **router**: the dispatch core (tool/resource registries and routing)
//! - **resources**: one handler per backend entity
//! - **tools**: schema-described callable actions
//! - **dispatch**: protocol method -> router plumbing shared by transports
//!
//! Registries are built once at startup via [`build_router`] and never
//! mutated afterwards, so concurrent reads need no locking.

pub mod dispatch;
pub mod envelope;
pub mod protocol;
pub mod resources;
pub mod router;
pub mod tools;
pub mod uri;

#[cfg(test)]
mod router_test;

use std::sync::Arc;

use serde_json::Value;

use crate::backend::Backend;
use crate::config::Config;

pub use dispatch::{DispatchReply, dispatch};
pub use router::{DispatchRouter, RouterError};

/// Untyped argument bag as it arrives at the transport boundary.
pub type Args = serde_json::Map<String, Value>;

/// Build the dispatch router with every resource and tool wired up.
///
/// This is the single composition point: handlers receive their backend and
/// defaults here instead of reaching for process-global state.
pub fn build_router(backend: Arc<dyn Backend>, config: &Config) -> DispatchRouter {
    use resources::{
        DocumentResource, ErrorResource, PhaseResource, ProjectResource, PromptResource,
        ResourceHandler, TaskResource, WorkspaceResource,
    };

    let default_project = config.default_project.clone();

    let tasks = Arc::new(TaskResource::new(
        Arc::clone(&backend),
        default_project.clone(),
    ));
    let projects = Arc::new(ProjectResource::new(Arc::clone(&backend)));
    let documents = Arc::new(DocumentResource::new(
        Arc::clone(&backend),
        default_project.clone(),
    ));
    let workspaces = Arc::new(WorkspaceResource::new(Arc::clone(&backend)));
    let phases = Arc::new(PhaseResource::new(
        Arc::clone(&backend),
        default_project.clone(),
    ));
    let errors = Arc::new(ErrorResource::new(Arc::clone(&backend)));
    let prompts = Arc::new(PromptResource::new(Arc::clone(&backend)));

    let mut router = DispatchRouter::new(default_project.clone());

    router.register_resource(Arc::clone(&tasks) as Arc<dyn ResourceHandler>);
    router.register_resource(Arc::clone(&projects) as Arc<dyn ResourceHandler>);
    router.register_resource(Arc::clone(&documents) as Arc<dyn ResourceHandler>);
    router.register_resource(Arc::clone(&workspaces) as Arc<dyn ResourceHandler>);
    router.register_resource(Arc::clone(&phases) as Arc<dyn ResourceHandler>);
    router.register_resource(Arc::clone(&errors) as Arc<dyn ResourceHandler>);
    router.register_resource(Arc::clone(&prompts) as Arc<dyn ResourceHandler>);

    for tool in tools::task_tools(Arc::clone(&tasks)) {
        router.register_tool(tool);
    }
    for tool in tools::project_tools(Arc::clone(&projects), default_project) {
        router.register_tool(tool);
    }
    for tool in tools::document_tools(Arc::clone(&documents)) {
        router.register_tool(tool);
    }
    for tool in tools::workspace_tools(Arc::clone(&workspaces)) {
        router.register_tool(tool);
    }
    for tool in tools::phase_tools(Arc::clone(&phases)) {
        router.register_tool(tool);
    }
    for tool in tools::error_tools(Arc::clone(&errors)) {
        router.register_tool(tool);
    }
    for tool in tools::prompt_tools(Arc::clone(&prompts)) {
        router.register_tool(tool);
    }

    router
}
