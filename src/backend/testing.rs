//! In-crate test double for the [`Backend`] trait.
//!
//! `StubBackend` returns canned replies keyed by method + path and records
//! every call so tests can assert on what was (or was not) sent.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use futures_util::stream;
use serde_json::Value;

use super::{Backend, BackendError, BackendResult, ByteStream};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

#[derive(Clone)]
enum CannedReply {
    Ok(Value),
    ApiError { status: u16, message: String },
    NoResponse,
}

#[derive(Default)]
pub struct StubBackend {
    calls: Mutex<Vec<RecordedCall>>,
    replies: Mutex<HashMap<String, CannedReply>>,
    stream_replies: Mutex<HashMap<String, Vec<u8>>>,
}

fn key(method: &str, path: &str) -> String {
    format!("{method} {path}")
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure a successful JSON reply for `method path`.
    pub fn reply(self, method: &str, path: &str, body: Value) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(key(method, path), CannedReply::Ok(body));
        self
    }

    /// Configure a non-2xx failure for `method path`.
    pub fn fail(self, method: &str, path: &str, status: u16, message: &str) -> Self {
        self.replies.lock().unwrap().insert(
            key(method, path),
            CannedReply::ApiError {
                status,
                message: message.to_string(),
            },
        );
        self
    }

    /// Configure a network-level failure for `method path`.
    pub fn no_response(self, method: &str, path: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(key(method, path), CannedReply::NoResponse);
        self
    }

    /// Configure a raw byte stream reply for `GET path`.
    pub fn stream_reply(self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.stream_replies
            .lock()
            .unwrap()
            .insert(path.to_string(), bytes.into());
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls matching a method + path.
    pub fn calls_for(&self, method: &str, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }

    fn respond(
        &self,
        method: &'static str,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> BackendResult<Value> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            query,
            body,
        });

        match self.replies.lock().unwrap().get(&key(method, path)) {
            Some(CannedReply::Ok(v)) => Ok(v.clone()),
            Some(CannedReply::ApiError { status, message }) => Err(BackendError::Api {
                status: *status,
                message: message.clone(),
                body: None,
            }),
            Some(CannedReply::NoResponse) => Err(BackendError::NoResponse {
                detail: "connection refused".to_string(),
            }),
            None => Err(BackendError::Api {
                status: 404,
                message: format!("no stub configured for {method} {path}"),
                body: None,
            }),
        }
    }
}

#[async_trait]
impl Backend for StubBackend {
    async fn get(&self, path: &str, query: &[(String, String)]) -> BackendResult<Value> {
        self.respond("GET", path, query.to_vec(), None)
    }

    async fn post(&self, path: &str, body: &Value) -> BackendResult<Value> {
        self.respond("POST", path, Vec::new(), Some(body.clone()))
    }

    async fn patch(&self, path: &str, body: &Value) -> BackendResult<Value> {
        self.respond("PATCH", path, Vec::new(), Some(body.clone()))
    }

    async fn delete(&self, path: &str) -> BackendResult<Value> {
        self.respond("DELETE", path, Vec::new(), None)
    }

    async fn get_stream(&self, path: &str) -> BackendResult<ByteStream> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: "GET",
            path: path.to_string(),
            query: Vec::new(),
            body: None,
        });

        match self.stream_replies.lock().unwrap().get(path) {
            Some(bytes) => {
                let chunks: Vec<BackendResult<Vec<u8>>> = vec![Ok(bytes.clone())];
                Ok(Box::pin(stream::iter(chunks)))
            }
            None => Err(BackendError::Api {
                status: 404,
                message: format!("no stream stub configured for GET {path}"),
                body: None,
            }),
        }
    }
}
