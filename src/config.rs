//! Runtime configuration.
//!
//! Everything the adapter needs is supplied through environment variables;
//! CLI flags may override the listen address. The bearer token and the
//! default project id are required, the rest falls back to defaults.

use std::net::IpAddr;
use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

/// Default backend base URL when `TASKPORT_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Default listen port for the HTTP transport.
pub const DEFAULT_PORT: u16 = 3333;

/// Default per-request timeout for backend calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {name}")]
    #[diagnostic(
        code(taskport::config::missing_var),
        help("Set {name} before starting the adapter.")
    )]
    Missing { name: &'static str },

    #[error("Invalid value for {name}: {value}")]
    #[diagnostic(code(taskport::config::invalid_var))]
    Invalid { name: &'static str, value: String },
}

/// Adapter configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Taskdeck backend.
    pub api_url: String,
    /// Bearer token attached to every backend request.
    pub api_token: String,
    /// Project id substituted when a caller omits a project reference.
    pub default_project: String,
    /// Host address for the HTTP transport.
    pub host: IpAddr,
    /// Listen port for the HTTP transport.
    pub port: u16,
    /// Optional tracing filter directive (`TASKPORT_LOG`).
    pub log_filter: Option<String>,
    /// Emit one log line per completed HTTP request.
    pub log_requests: bool,
    /// Per-request timeout for backend calls.
    pub request_timeout: Duration,
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an injected lookup function.
    ///
    /// Tests use this instead of mutating process-global environment state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_token = require(&lookup, "TASKPORT_API_TOKEN")?;
        let default_project = require(&lookup, "TASKPORT_DEFAULT_PROJECT")?;

        let api_url = lookup("TASKPORT_API_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        // A trailing slash would double up when joined with endpoint paths.
        let api_url = api_url.trim_end_matches('/').to_string();

        let port = match lookup("TASKPORT_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "TASKPORT_PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let host = match lookup("TASKPORT_HOST") {
            Some(raw) => raw.parse::<IpAddr>().map_err(|_| ConfigError::Invalid {
                name: "TASKPORT_HOST",
                value: raw,
            })?,
            None => IpAddr::from([127, 0, 0, 1]),
        };

        let log_requests = lookup("TASKPORT_LOG_REQUESTS")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            api_url,
            api_token,
            default_project,
            host,
            port,
            log_filter: lookup("TASKPORT_LOG").filter(|v| !v.is_empty()),
            log_requests,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    match lookup(name) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing { name }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
