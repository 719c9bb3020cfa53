// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Transport abstraction over MCP connections.
//!
//! The introspection layer depends only on this capability set; the concrete
//! variant (child-process pipes vs streaming HTTP) is selected once, at
//! construction, from the server config's `kind`.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::error::McpError;
use super::http::HttpTransport;
use super::protocol::{TOOLS_CALL, TOOLS_LIST};
use super::stdio::StdioTransport;
use super::types::{ToolDefinition, ToolListResult};
use crate::config::{ServerConfig, TransportKind};

/// Capability set shared by all MCP transports.
///
/// A transport is not safe for concurrent `disconnect` against in-flight
/// `send_request` calls; callers either serialize the two or rely on the
/// reject-all at teardown to fail in-flight callers deterministically.
#[async_trait]
pub trait McpTransport: Send + Sync {
    /// Establish the connection.
    async fn connect(&mut self) -> Result<(), McpError>;

    /// Tear the connection down, rejecting anything still in flight.
    async fn disconnect(&mut self);

    /// Send a correlated JSON-RPC request and await its result.
    async fn send_request(&self, method: &str, params: Value) -> Result<Value, McpError>;

    /// Whether the transport currently holds a connection.
    fn is_connected(&self) -> bool;

    /// List the tools the server declares. A missing `tools` field in the
    /// reply is an empty catalog, not an error.
    async fn list_tools(&self) -> Result<Vec<ToolDefinition>, McpError> {
        let result = self.send_request(TOOLS_LIST, json!({})).await?;
        let list: ToolListResult = serde_json::from_value(result)?;
        Ok(list.tools)
    }

    /// Invoke a tool by name.
    async fn call_tool(&self, name: &str, args: Value) -> Result<Value, McpError> {
        self.send_request(TOOLS_CALL, json!({"name": name, "arguments": args}))
            .await
    }
}

impl std::fmt::Debug for dyn McpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("McpTransport")
    }
}

/// Build the transport matching the config's kind.
///
/// Enforces the kind invariants up front: stdio requires a command, stream
/// requires a URL.
pub fn build_transport(config: &ServerConfig) -> Result<Box<dyn McpTransport>, McpError> {
    match config.kind {
        TransportKind::Stdio => Ok(Box::new(StdioTransport::new(config)?)),
        TransportKind::Stream => Ok(Box::new(HttpTransport::new(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_stdio_transport() {
        let config = ServerConfig::stdio("calc", "node").with_args(["mock.js", "--stdio"]);
        let transport = build_transport(&config).unwrap();
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_build_stream_transport() {
        let config = ServerConfig::stream("remote", "http://localhost:3002/mcp");
        let transport = build_transport(&config).unwrap();
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_build_stdio_without_command_fails() {
        let mut config = ServerConfig::stdio("bad", "ignored");
        config.command = None;
        let err = build_transport(&config).unwrap_err();
        assert!(matches!(err, McpError::InvalidConfig(_)));
    }

    #[test]
    fn test_build_stream_without_url_fails() {
        let mut config = ServerConfig::stream("bad", "ignored");
        config.url = None;
        let err = build_transport(&config).unwrap_err();
        assert!(matches!(err, McpError::InvalidConfig(_)));
    }
}
