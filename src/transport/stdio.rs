//! Stdio transport: newline-delimited JSON-RPC over stdin/stdout.

use std::sync::Arc;

use futures_util::StreamExt;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use crate::mcp::protocol::{JsonRpcError, JsonRpcResponse};
use crate::mcp::{DispatchReply, DispatchRouter, dispatch};

use super::TransportError;

/// Serve the protocol over stdin/stdout until stdin closes.
pub async fn run(router: Arc<DispatchRouter>) -> Result<(), TransportError> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut stdout = tokio::io::stdout();

    info!("stdio transport ready");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(response) = handle_line(&router, &line).await {
            stdout.write_all(response.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    info!("stdin closed, stdio transport exiting");
    Ok(())
}

/// Process one input line; `None` means nothing goes back (notification).
pub async fn handle_line(router: &DispatchRouter, line: &str) -> Option<String> {
    let request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            let response = JsonRpcResponse::error(
                Value::Null,
                JsonRpcError::new(JsonRpcError::PARSE_ERROR, e.to_string()),
            );
            return serde_json::to_string(&response).ok();
        }
    };

    let response = match dispatch(router, request).await {
        DispatchReply::Message(response) => response,
        DispatchReply::None => return None,
        DispatchReply::Stream {
            id,
            uri,
            mut stream,
        } => {
            // No chunked transfer on stdio: buffer the stream into one
            // text content block.
            let mut collected = Vec::new();
            let mut failure = None;
            while let Some(chunk) = stream.next().await {
                match chunk {
                    Ok(bytes) => collected.extend(bytes),
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                }
            }

            match failure {
                Some(e) => JsonRpcResponse::error(
                    id,
                    JsonRpcError::new(JsonRpcError::INTERNAL_ERROR, e.to_string()),
                ),
                None => JsonRpcResponse::success(
                    id,
                    json!({
                        "contents": [{
                            "uri": uri,
                            "mimeType": "application/octet-stream",
                            "text": String::from_utf8_lossy(&collected),
                        }],
                    }),
                ),
            }
        }
    };

    serde_json::to_string(&response).ok()
}
