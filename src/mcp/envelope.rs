//! Result envelope helpers.
//!
//! Every tool call resolves to a JSON envelope: `{"success": true, <entity or
//! list>, "message": ...}` on success, `{"success": false, "error": ...}` on
//! failure. Tool failures are domain results, not protocol errors, so the
//! envelope is returned as a normal response.

use serde_json::{Value, json};

/// Failure envelope with a human-readable error message.
pub fn failure(error: impl Into<String>) -> Value {
    json!({
        "success": false,
        "error": error.into(),
    })
}

/// Render an envelope as the text content of a tool-call result.
pub fn to_tool_result(envelope: &Value) -> Value {
    let text = serde_json::to_string_pretty(envelope)
        .unwrap_or_else(|_| r#"{"success":false,"error":"unserializable result"}"#.to_string());
    json!({
        "content": [{"type": "text", "text": text}],
    })
}
