//! Server commands: run the HTTP or stdio transport until shutdown.

use std::net::IpAddr;
use std::sync::Arc;

use tracing::info;

use crate::backend::HttpBackend;
use crate::cli::error::CliResult;
use crate::config::Config;
use crate::mcp::build_router;
use crate::transport::{HttpTransport, stdio};

/// Run the HTTP transport until SIGINT/SIGTERM, then drain and exit.
pub async fn run_http(mut config: Config, port: Option<u16>, host: Option<IpAddr>) -> CliResult<()> {
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(host) = host {
        config.host = host;
    }

    let backend = HttpBackend::from_config(&config)?;
    let router = build_router(Arc::new(backend), &config);
    let transport = HttpTransport::new(Arc::new(router), &config);

    let addr = transport.start().await?;
    info!(addr = %addr, backend = %config.api_url, "taskport serving");

    shutdown_signal().await;
    info!("shutdown signal received, draining connections");

    transport.stop().await?;
    Ok(())
}

/// Run the stdio transport until stdin closes.
pub async fn run_stdio(config: Config) -> CliResult<()> {
    let backend = HttpBackend::from_config(&config)?;
    let router = build_router(Arc::new(backend), &config);

    stdio::run(Arc::new(router)).await?;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
