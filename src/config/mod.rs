// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! MCP server configuration.
//!
//! A config file describes one server:
//!
//! ```json
//! {
//!   "name": "calc",
//!   "type": "stdio",
//!   "command": "node",
//!   "args": ["mock.js", "--stdio"],
//!   "env": {"NODE_ENV": "production"}
//! }
//! ```
//!
//! or, for a streaming HTTP server:
//!
//! ```json
//! {
//!   "name": "github",
//!   "type": "stream",
//!   "url": "https://mcp.example.com/v1",
//!   "headers": {"Authorization": "Bearer ..."}
//! }
//! ```

mod loader;

pub use loader::{load_server_config, load_server_configs};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for a single MCP server. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server name; also the default cache key and namespace prefix.
    pub name: String,

    /// Transport kind.
    #[serde(rename = "type")]
    pub kind: TransportKind,

    /// Optional human-readable description, carried into generated docs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Command for stdio transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Arguments for stdio transport.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Environment variables for stdio transport.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    /// Working directory for stdio transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,

    /// URL for streaming HTTP transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Extra HTTP headers for streaming HTTP transport.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

impl ServerConfig {
    /// Create a stdio server configuration.
    pub fn stdio(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TransportKind::Stdio,
            description: None,
            command: Some(command.into()),
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
            url: None,
            headers: HashMap::new(),
        }
    }

    /// Create a streaming HTTP server configuration.
    pub fn stream(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TransportKind::Stream,
            description: None,
            command: None,
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
            url: Some(url.into()),
            headers: HashMap::new(),
        }
    }

    /// Add command arguments.
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(|s| s.into()).collect();
        self
    }

    /// Set environment variables.
    pub fn with_env(
        mut self,
        env: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        self.env = env.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Set working directory.
    pub fn with_cwd(mut self, cwd: impl Into<String>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Set HTTP headers.
    pub fn with_headers(
        mut self,
        headers: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Check the kind-specific invariants: stdio requires `command`, stream
    /// requires `url`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::MissingField("name".to_string()));
        }
        match self.kind {
            TransportKind::Stdio if self.command.is_none() => Err(ConfigError::InvalidValue {
                field: "command".to_string(),
                message: "stdio config requires a command".to_string(),
            }),
            TransportKind::Stream if self.url.is_none() => Err(ConfigError::InvalidValue {
                field: "url".to_string(),
                message: "stream config requires a url".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Transport kind for an MCP server connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Child process speaking newline-delimited JSON-RPC over its pipes.
    Stdio,

    /// HTTP endpoint answering with JSON bodies or SSE streams.
    /// `"sse"` and `"http"` are accepted as config-file spellings.
    #[serde(alias = "sse", alias = "http")]
    Stream,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Stream => write!(f, "stream"),
        }
    }
}
