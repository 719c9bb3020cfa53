// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! MCP error types.

use thiserror::Error;

use super::protocol::RpcErrorObject;

/// Errors that can occur during MCP operations.
#[derive(Debug, Error)]
pub enum McpError {
    /// Server configuration is missing a required field or names an unknown
    /// transport kind. Fatal, never retried.
    #[error("Invalid server config: {0}")]
    InvalidConfig(String),

    /// Connection failed (spawn failure, unreachable URL, closed stream).
    #[error("Failed to connect to MCP server '{server}': {message}")]
    ConnectionFailed { server: String, message: String },

    /// Transport is not connected.
    #[error("MCP server '{0}' is not connected")]
    NotConnected(String),

    /// A request got no reply within its deadline. Fatal for that request
    /// only; the connection stays usable.
    #[error("Request '{method}' timed out after {timeout_secs}s")]
    Timeout { method: String, timeout_secs: u64 },

    /// The incoming bytes were not valid JSON.
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// The child process exited while requests were pending.
    #[error("Process exited with code {code}")]
    ProcessTerminated { code: i32 },

    /// HTTP request was answered with a non-2xx status.
    #[error("Request failed with status {status}")]
    RequestFailed { status: u16 },

    /// The event stream ended before a matching reply arrived.
    #[error("Stream ended before a reply for request {id} arrived")]
    StreamExhausted { id: u64 },

    /// The connection was torn down while the request was in flight.
    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    /// The server answered with a JSON-RPC error object.
    #[error("Server error: code={code}, message={message}")]
    Rpc { code: i64, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl McpError {
    /// Create a connection failed error.
    pub fn connection_failed(server: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            server: server.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error for the named method.
    pub fn timeout(method: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            method: method.into(),
            timeout_secs,
        }
    }
}

impl From<RpcErrorObject> for McpError {
    fn from(error: RpcErrorObject) -> Self {
        Self::Rpc {
            code: error.code,
            message: error.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = McpError::connection_failed("calc", "connection refused");
        assert!(err.to_string().contains("calc"));
        assert!(err.to_string().contains("connection refused"));

        let err = McpError::timeout("tools/list", 30);
        assert!(err.to_string().contains("tools/list"));
        assert!(err.to_string().contains("30"));

        let err = McpError::ProcessTerminated { code: 1 };
        assert!(err.to_string().contains('1'));
    }

    #[test]
    fn test_error_from_rpc_object() {
        let rpc = RpcErrorObject {
            code: -32601,
            message: "Method not found".to_string(),
            data: None,
        };
        let err: McpError = rpc.into();
        assert!(matches!(err, McpError::Rpc { code: -32601, .. }));
    }
}
