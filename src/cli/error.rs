use miette::Diagnostic;
use thiserror::Error;

use crate::backend::BackendError;
use crate::config::ConfigError;
use crate::transport::TransportError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Transport(#[from] TransportError),

    #[error("Invalid response from API server: {message}")]
    #[diagnostic(
        code(taskport::cli::invalid_response),
        help("The server returned data in an unexpected format. This might indicate a version mismatch.")
    )]
    InvalidResponse { message: String },

    #[error("Invalid output format: {format}")]
    #[diagnostic(code(taskport::cli::invalid_format), help("Use 'table' or 'json'."))]
    InvalidFormat { format: String },
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::InvalidResponse {
            message: e.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
