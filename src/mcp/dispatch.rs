//! Protocol-method dispatch shared by every transport.
//!
//! Transports decode a [`JsonRpcRequest`], hand it here, and encode whatever
//! comes back. Streamed resource reads are surfaced separately so the HTTP
//! transport can relay them as a chunked body instead of a JSON message.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::backend::ByteStream;

use super::envelope;
use super::protocol::{
    CallToolParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION,
    ReadResourceParams, WriteResourceParams, methods,
};
use super::router::{DispatchRouter, ReadReply, RouterError};

/// What the transport should do with a dispatched request.
pub enum DispatchReply {
    /// Serialize and return a JSON-RPC message.
    Message(JsonRpcResponse),
    /// Relay raw bytes (chunked transfer on HTTP; buffered on stdio).
    Stream {
        id: Value,
        uri: String,
        stream: ByteStream,
    },
    /// Notification: nothing goes back.
    None,
}

pub async fn dispatch(router: &DispatchRouter, request: JsonRpcRequest) -> DispatchReply {
    if request.is_notification() {
        debug!(method = %request.method, "notification received");
        return DispatchReply::None;
    }

    let id = request.id.clone().unwrap_or(Value::Null);

    let result: Result<Value, JsonRpcError> = match request.method.as_str() {
        methods::INITIALIZE => Ok(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {}, "resources": {}},
            "serverInfo": {
                "name": "taskport",
                "version": env!("CARGO_PKG_VERSION"),
            },
        })),

        methods::PING => Ok(json!({})),

        methods::TOOLS_LIST => Ok(json!({"tools": router.list_tools()})),

        methods::TOOLS_CALL => match parse_params::<CallToolParams>(request.params) {
            Err(e) => Err(e),
            Ok(params) => match router.call_tool(&params.name, params.arguments).await {
                Ok(result_envelope) => Ok(envelope::to_tool_result(&result_envelope)),
                Err(e) => Err(router_error(e)),
            },
        },

        methods::RESOURCES_LIST => Ok(json!({"resources": router.list_resources()})),

        methods::RESOURCES_READ => match parse_params::<ReadResourceParams>(request.params) {
            Err(e) => Err(e),
            Ok(params) => match router.read_resource(&params.uri).await {
                Ok(ReadReply::Json { uri, content }) => Ok(json!({
                    "contents": [{
                        "uri": uri,
                        "mimeType": "application/json",
                        "text": content.to_string(),
                    }],
                })),
                Ok(ReadReply::Stream { uri, stream }) => {
                    return DispatchReply::Stream { id, uri, stream };
                }
                Err(e) => Err(router_error(e)),
            },
        },

        methods::RESOURCES_CREATE => match parse_params::<WriteResourceParams>(request.params) {
            Err(e) => Err(e),
            Ok(params) => router
                .create_resource(&params.uri, params.data)
                .await
                .map_err(router_error),
        },

        methods::RESOURCES_UPDATE => match parse_params::<WriteResourceParams>(request.params) {
            Err(e) => Err(e),
            Ok(params) => router
                .update_resource(&params.uri, params.data)
                .await
                .map_err(router_error),
        },

        methods::RESOURCES_DELETE => match parse_params::<ReadResourceParams>(request.params) {
            Err(e) => Err(e),
            Ok(params) => router
                .delete_resource(&params.uri)
                .await
                .map_err(router_error),
        },

        other => Err(JsonRpcError::new(
            JsonRpcError::METHOD_NOT_FOUND,
            format!("Method not found: {other}"),
        )),
    };

    DispatchReply::Message(match result {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(error) => JsonRpcResponse::error(id, error),
    })
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, JsonRpcError> {
    serde_json::from_value(params.unwrap_or(Value::Null)).map_err(|e| {
        JsonRpcError::new(
            JsonRpcError::INVALID_PARAMS,
            format!("Invalid params: {e}"),
        )
    })
}

fn router_error(e: RouterError) -> JsonRpcError {
    match &e {
        RouterError::UnknownTool { .. } => {
            JsonRpcError::new(JsonRpcError::INVALID_PARAMS, e.to_string())
        }
        RouterError::ResourceNotFound { .. } => {
            JsonRpcError::new(JsonRpcError::RESOURCE_NOT_FOUND, e.to_string())
        }
        RouterError::Resource(_) => {
            JsonRpcError::new(JsonRpcError::INTERNAL_ERROR, e.to_string())
        }
    }
}
