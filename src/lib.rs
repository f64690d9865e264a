//! taskport - MCP adapter server for the Taskdeck project-management API.
//!
//! The crate translates Model Context Protocol messages (tool calls and
//! resource reads) into authenticated REST calls against a Taskdeck backend
//! and reshapes the responses into the protocol's envelopes.
//!
//! # Architecture
//!
//! - **backend**: the single outbound HTTP client (`Backend` trait + reqwest
//!   implementation)
//! - **mcp**: protocol types, the dispatch router, and the per-entity
//!   resource/tool handlers
//! - **transport**: process-boundary bindings (HTTP listener, stdio)
//! - **cli**: thin command-line surface over the backend client

pub mod backend;
pub mod cli;
pub mod config;
pub mod mcp;
pub mod transport;
