// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! JSON-RPC 2.0 wire codec.
//!
//! Encodes outgoing requests and decodes/classifies incoming messages,
//! independent of the transport carrying the bytes. Framing (newlines for
//! stdio, SSE events for HTTP) is the transport's job; this module only deals
//! in complete JSON values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::McpError;

/// JSON-RPC protocol version sent and expected on every message.
pub const JSONRPC_VERSION: &str = "2.0";

/// Method name for tool discovery.
pub const TOOLS_LIST: &str = "tools/list";

/// Method name for tool invocation.
pub const TOOLS_CALL: &str = "tools/call";

/// An outgoing JSON-RPC request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Always "2.0".
    pub jsonrpc: String,

    /// Request id; correlates the eventual reply.
    pub id: u64,

    /// Method name (e.g. "tools/list").
    pub method: String,

    /// Method parameters.
    pub params: Value,
}

impl JsonRpcRequest {
    /// Build a request envelope for the given method and params.
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }

    /// Serialize to a single-line JSON string (no trailing newline).
    pub fn encode(&self) -> Result<String, McpError> {
        serde_json::to_string(self).map_err(McpError::Json)
    }
}

/// Error object carried in a JSON-RPC error reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcErrorObject {
    /// JSON-RPC error code.
    pub code: i64,

    /// Human-readable error message.
    pub message: String,

    /// Optional extra data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A decoded incoming message, classified by shape.
#[derive(Debug)]
pub enum Incoming {
    /// A reply correlated to a request by id.
    Reply {
        /// The id of the request this answers.
        id: u64,
        /// `Ok(result)` for success replies, `Err` for error replies.
        outcome: Result<Value, RpcErrorObject>,
    },

    /// Anything else: notifications, requests from the server, or replies
    /// without a usable integer id. Dropped by this client.
    Unsolicited(Value),
}

/// Decode one complete JSON value from text.
///
/// Fails with [`McpError::MalformedMessage`] on invalid JSON. No attempt is
/// made at partial/streaming repair; a message is either complete or not yet
/// ready.
pub fn decode_message(raw: &str) -> Result<Value, McpError> {
    serde_json::from_str(raw).map_err(|e| McpError::MalformedMessage(e.to_string()))
}

/// Classify a decoded message as a correlated reply or an unsolicited value.
pub fn classify(message: Value) -> Incoming {
    let id = message.get("id").and_then(Value::as_u64);

    let Some(id) = id else {
        return Incoming::Unsolicited(message);
    };

    if let Some(error) = message.get("error") {
        let error = serde_json::from_value::<RpcErrorObject>(error.clone()).unwrap_or_else(|_| {
            RpcErrorObject {
                code: -32603,
                message: "malformed error object".to_string(),
                data: None,
            }
        });
        return Incoming::Reply {
            id,
            outcome: Err(error),
        };
    }

    if let Some(result) = message.get("result") {
        return Incoming::Reply {
            id,
            outcome: Ok(result.clone()),
        };
    }

    Incoming::Unsolicited(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_request() {
        let request = JsonRpcRequest::new(7, TOOLS_LIST, json!({}));
        let encoded = request.encode().unwrap();
        let value: Value = serde_json::from_str(&encoded).unwrap();

        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 7);
        assert_eq!(value["method"], "tools/list");
        assert_eq!(value["params"], json!({}));
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = decode_message("not json").unwrap_err();
        assert!(matches!(err, McpError::MalformedMessage(_)));
    }

    #[test]
    fn test_classify_success_reply() {
        let message = json!({"jsonrpc": "2.0", "id": 3, "result": {"tools": []}});
        match classify(message) {
            Incoming::Reply { id, outcome } => {
                assert_eq!(id, 3);
                assert_eq!(outcome.unwrap(), json!({"tools": []}));
            }
            other => panic!("expected reply, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_error_reply() {
        let message = json!({
            "jsonrpc": "2.0",
            "id": 4,
            "error": {"code": -32601, "message": "Method not found"}
        });
        match classify(message) {
            Incoming::Reply { id, outcome } => {
                assert_eq!(id, 4);
                let error = outcome.unwrap_err();
                assert_eq!(error.code, -32601);
                assert_eq!(error.message, "Method not found");
            }
            other => panic!("expected reply, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_notification_is_unsolicited() {
        let message = json!({"jsonrpc": "2.0", "method": "notifications/progress"});
        assert!(matches!(classify(message), Incoming::Unsolicited(_)));
    }

    #[test]
    fn test_classify_reply_without_result_or_error() {
        let message = json!({"jsonrpc": "2.0", "id": 1});
        assert!(matches!(classify(message), Incoming::Unsolicited(_)));
    }
}
