// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Markdown documentation for an introspected tool catalog.

use crate::config::ServerConfig;
use crate::mcp::ToolDefinition;

use super::convert::sanitize_tool_name;

/// Render a README describing every tool in the catalog.
pub fn generate_docs(tools: &[ToolDefinition], config: &ServerConfig) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# MCP Tools".to_string());
    lines.push(String::new());

    if !config.name.is_empty() {
        lines.push(format!("**{}**", config.name));
        lines.push(String::new());
    }

    if let Some(description) = &config.description {
        lines.push(description.clone());
        lines.push(String::new());
    }

    lines.push("## Tools".to_string());
    lines.push(String::new());

    for tool in tools {
        lines.push(format!("### {}", sanitize_tool_name(&tool.name)));
        lines.push(String::new());
        if tool.description.is_empty() {
            lines.push("*No description*".to_string());
        } else {
            lines.push(tool.description.clone());
        }
        lines.push(String::new());

        let has_schema = tool
            .input_schema
            .as_object()
            .map(|obj| !obj.is_empty())
            .unwrap_or(false);
        if has_schema {
            lines.push("**Parameters:**".to_string());
            lines.push(String::new());
            lines.push("```json".to_string());
            lines.push(
                serde_json::to_string_pretty(&tool.input_schema)
                    .unwrap_or_else(|_| "{}".to_string()),
            );
            lines.push("```".to_string());
            lines.push(String::new());
        }
    }

    lines.join("\n")
}
