//! Backend error taxonomy.
//!
//! The backend's own `message` field is preserved verbatim when present so
//! callers can relay it unchanged; transport failures where no response was
//! received are kept distinct from HTTP-level failures.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum BackendError {
    /// Non-2xx HTTP response. `message` is the backend's `message` field when
    /// the body parses as JSON, otherwise the HTTP status text. The raw body
    /// is retained for upstream inspection.
    #[error("{message}")]
    #[diagnostic(code(taskport::backend::api_error))]
    Api {
        status: u16,
        message: String,
        body: Option<String>,
    },

    /// The request went out but no response came back (connect or timeout).
    #[error("No response received from backend: {detail}")]
    #[diagnostic(
        code(taskport::backend::no_response),
        help("Is the backend reachable? Check TASKPORT_API_URL.")
    )]
    NoResponse { detail: String },

    /// A 2xx response whose body could not be decoded as JSON.
    #[error("Invalid response from backend: {message}")]
    #[diagnostic(code(taskport::backend::invalid_response))]
    InvalidResponse { message: String },

    /// Request construction or other client-side failure, unchanged.
    #[error("Backend request failed: {source}")]
    #[diagnostic(code(taskport::backend::request_failed))]
    Request {
        #[source]
        source: reqwest::Error,
    },
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            BackendError::NoResponse {
                detail: e.to_string(),
            }
        } else if e.is_decode() {
            BackendError::InvalidResponse {
                message: e.to_string(),
            }
        } else {
            BackendError::Request { source: e }
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;
