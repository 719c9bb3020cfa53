// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Conversion of MCP tool definitions to provider tool formats.

use serde_json::{json, Value};

use crate::mcp::ToolDefinition;

/// Target provider format for generated tool definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Anthropic tool format: flat `{name, description, input_schema}`.
    Anthropic,

    /// OpenAI function-calling format: `{type: "function", function: {...}}`.
    OpenAi,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anthropic => write!(f, "anthropic"),
            Self::OpenAi => write!(f, "openai"),
        }
    }
}

/// Turn an MCP tool name into a valid JS identifier: hyphens to
/// underscores, invalid characters removed, leading digit escaped.
pub fn sanitize_tool_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c == '-' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect();

    match cleaned.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("_{cleaned}"),
        _ => cleaned,
    }
}

/// Convert one tool to the Anthropic shape.
pub fn to_anthropic_tool(tool: &ToolDefinition) -> Value {
    json!({
        "name": sanitize_tool_name(&tool.name),
        "description": tool.description,
        "input_schema": tool.input_schema,
    })
}

/// Convert one tool to the OpenAI function shape.
pub fn to_openai_tool(tool: &ToolDefinition) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": sanitize_tool_name(&tool.name),
            "description": tool.description,
            "parameters": tool.input_schema,
        }
    })
}

/// Convert a tool list to the requested provider format.
pub fn convert_tools(tools: &[ToolDefinition], kind: ProviderKind) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| match kind {
            ProviderKind::Anthropic => to_anthropic_tool(tool),
            ProviderKind::OpenAi => to_openai_tool(tool),
        })
        .collect()
}
