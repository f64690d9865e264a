//! HTTP transport.
//!
//! Lifecycle state machine: `Stopped -> Starting -> Running -> Stopping ->
//! Stopped`. `start()` binds the listener and spawns the serve loop;
//! `stop()` cancels it, drains open connections for a grace period, then
//! forces closure so it always resolves.
//!
//! Only POST is accepted on the message endpoint. CORS is wildcard with
//! `OPTIONS` preflight short-circuited to 204 before any handler runs.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use dashmap::DashMap;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::mcp::protocol::JsonRpcRequest;
use crate::mcp::{DispatchReply, DispatchRouter, dispatch};

use super::TransportError;

/// Drain window before open connections are forcibly closed.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Path the protocol messages are POSTed to.
pub const MESSAGE_PATH: &str = "/mcp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Stopped,
    Starting,
    Running,
    Stopping,
}

#[derive(Clone)]
struct AppState {
    dispatch: Arc<DispatchRouter>,
    connections: Arc<DashMap<u64, Instant>>,
    next_connection_id: Arc<AtomicU64>,
    log_requests: bool,
}

pub struct HttpTransport {
    dispatch: Arc<DispatchRouter>,
    host: IpAddr,
    port: u16,
    log_requests: bool,
    grace: Duration,
    lifecycle: Mutex<Lifecycle>,
    shutdown: Mutex<Option<CancellationToken>>,
    serve_handle: Mutex<Option<JoinHandle<()>>>,
    local_addr: Mutex<Option<SocketAddr>>,
    connections: Arc<DashMap<u64, Instant>>,
}

impl HttpTransport {
    pub fn new(dispatch: Arc<DispatchRouter>, config: &Config) -> Self {
        Self {
            dispatch,
            host: config.host,
            port: config.port,
            log_requests: config.log_requests,
            grace: SHUTDOWN_GRACE,
            lifecycle: Mutex::new(Lifecycle::Stopped),
            shutdown: Mutex::new(None),
            serve_handle: Mutex::new(None),
            local_addr: Mutex::new(None),
            connections: Arc::new(DashMap::new()),
        }
    }

    /// Shorten the drain window. Tests use this to exercise forced closure
    /// without waiting the full grace period.
    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Address the listener is bound to, once running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock().unwrap()
    }

    pub fn is_running(&self) -> bool {
        *self.lifecycle.lock().unwrap() == Lifecycle::Running
    }

    /// Number of requests currently in flight.
    pub fn active_connections(&self) -> usize {
        self.connections.len()
    }

    /// Bind the listener and spawn the serve loop.
    ///
    /// Fails with [`TransportError::AlreadyRunning`] unless stopped, and with
    /// [`TransportError::AddrInUse`] when the port is taken.
    pub async fn start(&self) -> Result<SocketAddr, TransportError> {
        {
            let mut lifecycle = self.lifecycle.lock().unwrap();
            if *lifecycle != Lifecycle::Stopped {
                return Err(TransportError::AlreadyRunning);
            }
            *lifecycle = Lifecycle::Starting;
        }

        let addr = SocketAddr::new(self.host, self.port);
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                *self.lifecycle.lock().unwrap() = Lifecycle::Stopped;
                return Err(if e.kind() == std::io::ErrorKind::AddrInUse {
                    TransportError::AddrInUse { addr }
                } else {
                    TransportError::Bind { addr, source: e }
                });
            }
        };
        let local_addr = listener
            .local_addr()
            .map_err(|e| TransportError::Bind { addr, source: e })?;

        let state = AppState {
            dispatch: Arc::clone(&self.dispatch),
            connections: Arc::clone(&self.connections),
            next_connection_id: Arc::new(AtomicU64::new(0)),
            log_requests: self.log_requests,
        };
        let app = build_app(state);

        let token = CancellationToken::new();
        let shutdown_signal = token.clone().cancelled_owned();
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal)
                .await
            {
                error!(error = %e, "http transport serve loop failed");
            }
        });

        *self.shutdown.lock().unwrap() = Some(token);
        *self.serve_handle.lock().unwrap() = Some(handle);
        *self.local_addr.lock().unwrap() = Some(local_addr);
        *self.lifecycle.lock().unwrap() = Lifecycle::Running;

        info!(addr = %local_addr, "http transport listening");
        Ok(local_addr)
    }

    /// Graceful stop with forced closure after the grace period.
    ///
    /// Always resolves: a connection that never closes voluntarily is cut
    /// off when the drain window ends. Stopping a stopped transport is a
    /// no-op.
    pub async fn stop(&self) -> Result<(), TransportError> {
        {
            let mut lifecycle = self.lifecycle.lock().unwrap();
            if *lifecycle == Lifecycle::Stopped {
                return Ok(());
            }
            *lifecycle = Lifecycle::Stopping;
        }

        if let Some(token) = self.shutdown.lock().unwrap().take() {
            token.cancel();
        }

        let handle = self.serve_handle.lock().unwrap().take();
        if let Some(mut handle) = handle {
            if timeout(self.grace, &mut handle).await.is_err() {
                warn!(
                    open_connections = self.connections.len(),
                    "graceful drain timed out; forcing socket closure"
                );
                handle.abort();
                let _ = handle.await;
            }
        }

        self.connections.clear();
        *self.local_addr.lock().unwrap() = None;
        *self.lifecycle.lock().unwrap() = Lifecycle::Stopped;

        info!("http transport stopped");
        Ok(())
    }
}

/// Router as served, without binding a listener. Router-level tests drive
/// this directly with `tower::ServiceExt::oneshot`.
#[cfg(test)]
pub(crate) fn test_app(dispatch: Arc<DispatchRouter>) -> Router {
    build_app(AppState {
        dispatch,
        connections: Arc::new(DashMap::new()),
        next_connection_id: Arc::new(AtomicU64::new(0)),
        log_requests: false,
    })
}

fn build_app(state: AppState) -> Router {
    Router::new()
        .route(MESSAGE_PATH, post(handle_message))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state, track_connections))
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
}

/// Wildcard CORS. Preflight is answered with 204 before any handler logic.
async fn cors(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return with_cors_headers(StatusCode::NO_CONTENT.into_response());
    }
    with_cors_headers(next.run(request).await)
}

fn with_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    response
}

/// Track the request in the live-connection set and optionally log it.
async fn track_connections(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let id = state.next_connection_id.fetch_add(1, Ordering::Relaxed);
    state.connections.insert(id, Instant::now());

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    if state.log_requests {
        info!(
            %method,
            path,
            status = response.status().as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
    }

    state.connections.remove(&id);
    response
}

async fn handle_message(State(state): State<AppState>, body: Bytes) -> Response {
    // The body is buffered fully before parsing; a parse failure is a
    // server-side fault with a JSON error body, not a protocol response.
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error",
                    "detail": e.to_string(),
                })),
            )
                .into_response();
        }
    };

    match dispatch(state.dispatch.as_ref(), request).await {
        DispatchReply::Message(response) => Json(response).into_response(),
        DispatchReply::None => StatusCode::ACCEPTED.into_response(),
        DispatchReply::Stream { stream, .. } => {
            match Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "application/octet-stream")
                .body(Body::from_stream(stream))
            {
                Ok(response) => response,
                Err(e) => {
                    error!(error = %e, "failed to build streaming response");
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            }
        }
    }
}
