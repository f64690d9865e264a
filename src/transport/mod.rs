//! Process-boundary transports.
//!
//! Two bindings carry the protocol: an HTTP listener (POST-only message
//! endpoint with CORS and streaming passthrough) and a newline-delimited
//! stdio channel. Both decode [`JsonRpcRequest`]s and feed them to the
//! shared dispatcher.
//!
//! [`JsonRpcRequest`]: crate::mcp::protocol::JsonRpcRequest

pub mod http;
pub mod stdio;

#[cfg(test)]
mod stdio_test;

pub use http::HttpTransport;

use std::net::SocketAddr;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum TransportError {
    #[error("Address already in use: {addr}")]
    #[diagnostic(
        code(taskport::transport::addr_in_use),
        help("Another process is listening on {addr}. Pick a different TASKPORT_PORT.")
    )]
    AddrInUse { addr: SocketAddr },

    #[error("Failed to bind {addr}")]
    #[diagnostic(code(taskport::transport::bind_failed))]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server is already running")]
    #[diagnostic(code(taskport::transport::already_running))]
    AlreadyRunning,

    #[error("Transport I/O failed")]
    #[diagnostic(code(taskport::transport::io))]
    Io {
        #[from]
        source: std::io::Error,
    },
}
