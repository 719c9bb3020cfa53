// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! MCP tool types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool declared by an MCP server.
///
/// Immutable after receipt; the wire uses camelCase for `inputSchema`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,

    /// Tool description.
    #[serde(default)]
    pub description: String,

    /// JSON Schema describing the tool's input.
    #[serde(rename = "inputSchema", default)]
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Create a tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Result shape of a `tools/list` reply.
///
/// A server omitting the `tools` field declares no tools.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolListResult {
    /// Declared tools.
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,
}
