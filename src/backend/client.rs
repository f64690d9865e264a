//! reqwest-backed implementation of the [`Backend`] trait.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder, Response, header};
use serde_json::Value;

use crate::config::Config;

use super::{Backend, BackendError, BackendResult, ByteStream};

/// HTTP client for the Taskdeck REST API.
///
/// Constructed once at startup; every request carries the bearer token and a
/// JSON content type. Connection pooling and keep-alive are whatever reqwest
/// does by default.
pub struct HttpBackend {
    base_url: String,
    token: String,
    client: Client,
}

impl HttpBackend {
    /// Create a client with an explicit base URL, token and request timeout.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> BackendResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        })
    }

    /// Create a client from the adapter configuration.
    pub fn from_config(config: &Config) -> BackendResult<Self> {
        Self::new(&config.api_url, &config.api_token, config.request_timeout)
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> BackendResult<Response> {
        let response = request
            .bearer_auth(&self.token)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("HTTP error")
                        .to_string()
                });
            Err(BackendError::Api {
                status: status.as_u16(),
                message,
                body: (!body.is_empty()).then_some(body),
            })
        }
    }

    async fn json(response: Response) -> BackendResult<Value> {
        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse {
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get(&self, path: &str, query: &[(String, String)]) -> BackendResult<Value> {
        let mut request = self.client.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        Self::json(self.send(request).await?).await
    }

    async fn post(&self, path: &str, body: &Value) -> BackendResult<Value> {
        let request = self.client.post(self.url(path)).json(body);
        Self::json(self.send(request).await?).await
    }

    async fn patch(&self, path: &str, body: &Value) -> BackendResult<Value> {
        let request = self.client.patch(self.url(path)).json(body);
        Self::json(self.send(request).await?).await
    }

    async fn delete(&self, path: &str) -> BackendResult<Value> {
        let response = self.send(self.client.delete(self.url(path))).await?;
        // Delete endpoints answer 204 with an empty body.
        let text = response.text().await.unwrap_or_else(|_| String::new());
        if text.is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_str(&text).map_err(|e| BackendError::InvalidResponse {
                message: e.to_string(),
            })
        }
    }

    async fn get_stream(&self, path: &str) -> BackendResult<ByteStream> {
        let response = self.send(self.client.get(self.url(path))).await?;
        let stream = response.bytes_stream().map(|chunk| match chunk {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(e) => Err(BackendError::from(e)),
        });
        Ok(Box::pin(stream))
    }
}
