//! Backend client for the Taskdeck REST API.
//!
//! This module is the single point of outbound HTTP communication. The
//! [`Backend`] trait abstracts the transport so handlers can be exercised
//! against test doubles; [`HttpBackend`] is the production implementation.

mod client;
mod error;

#[cfg(test)]
mod client_test;
#[cfg(test)]
mod error_test;
#[cfg(test)]
pub mod testing;

pub use client::HttpBackend;
pub use error::{BackendError, BackendResult};

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use serde_json::Value;

/// Raw byte stream for passthrough responses (e.g. document exports).
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, BackendError>> + Send>>;

/// Outbound HTTP seam.
///
/// Successful responses are unwrapped to their parsed JSON body; non-2xx
/// responses and transport failures surface as [`BackendError`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    /// GET with optional query parameters.
    async fn get(&self, path: &str, query: &[(String, String)]) -> BackendResult<Value>;

    /// POST a JSON body.
    async fn post(&self, path: &str, body: &Value) -> BackendResult<Value>;

    /// PATCH a JSON body.
    async fn patch(&self, path: &str, body: &Value) -> BackendResult<Value>;

    /// DELETE; returns whatever JSON the backend answers with.
    async fn delete(&self, path: &str) -> BackendResult<Value>;

    /// GET a raw byte stream without JSON decoding.
    async fn get_stream(&self, path: &str) -> BackendResult<ByteStream>;
}
