// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Template-based code generation.
//!
//! Renders the introspected tool catalog into importable JavaScript or
//! TypeScript modules. Templates are embedded at compile time; names and
//! descriptions are JSON-encoded on the Rust side so the templates never
//! have to worry about quoting.

use minijinja::{context, Environment};
use serde::Serialize;

use super::convert::{convert_tools, ProviderKind};
use crate::config::ServerConfig;
use crate::error::GenerateError;
use crate::mcp::ToolDefinition;

const TOOLS_JS: &str = include_str!("../../templates/tools.js.jinja");
const TOOLS_TS: &str = include_str!("../../templates/tools.ts.jinja");
const DEMO_JS: &str = include_str!("../../templates/demo.js.jinja");
const DEMO_TS: &str = include_str!("../../templates/demo.ts.jinja");

/// Per-tool template context, pre-encoded for direct interpolation.
#[derive(Debug, Serialize)]
struct ToolContext {
    /// Sanitized identifier-safe name.
    name: String,

    /// `name` as a JSON string literal.
    name_json: String,

    /// Description as a JSON string literal.
    description_json: String,

    /// Input schema as serialized JSON.
    schema_json: String,
}

/// Build template contexts from the converted provider shapes, so the
/// rendered modules and [`convert_tools`] can never disagree on a field.
fn tool_contexts(
    tools: &[ToolDefinition],
    kind: ProviderKind,
) -> Result<Vec<ToolContext>, GenerateError> {
    let encode = |value: &serde_json::Value| {
        serde_json::to_string(value).map_err(|e| GenerateError::RenderFailed(e.to_string()))
    };

    convert_tools(tools, kind)
        .iter()
        .map(|converted| {
            let (flat, schema_field) = match kind {
                ProviderKind::Anthropic => (converted, "input_schema"),
                ProviderKind::OpenAi => (&converted["function"], "parameters"),
            };
            Ok(ToolContext {
                name: flat["name"].as_str().unwrap_or_default().to_string(),
                name_json: encode(&flat["name"])?,
                description_json: encode(&flat["description"])?,
                schema_json: serde_json::to_string_pretty(&flat[schema_field])
                    .map_err(|e| GenerateError::RenderFailed(e.to_string()))?,
            })
        })
        .collect()
}

fn environment() -> Result<Environment<'static>, GenerateError> {
    let mut env = Environment::new();
    env.add_template("tools.js", TOOLS_JS)?;
    env.add_template("tools.ts", TOOLS_TS)?;
    env.add_template("demo.js", DEMO_JS)?;
    env.add_template("demo.ts", DEMO_TS)?;
    Ok(env)
}

fn render(
    template: &str,
    tools: &[ToolDefinition],
    config: &ServerConfig,
    kind: ProviderKind,
) -> Result<String, GenerateError> {
    let env = environment()?;
    let template = env
        .get_template(template)
        .map_err(|_| GenerateError::UnknownTemplate(template.to_string()))?;

    let rendered = template.render(context! {
        server_name => config.name,
        description => config.description.clone().unwrap_or_default(),
        is_openai => kind == ProviderKind::OpenAi,
        tools => tool_contexts(tools, kind)?,
    })?;
    Ok(rendered)
}

/// Render the tools module for the given provider format and language.
pub fn generate_tools_module(
    tools: &[ToolDefinition],
    config: &ServerConfig,
    kind: ProviderKind,
    typescript: bool,
) -> Result<String, GenerateError> {
    let template = if typescript { "tools.ts" } else { "tools.js" };
    render(template, tools, config, kind)
}

/// Render the demo module showing how to load the generated tools.
pub fn generate_demo_module(
    tools: &[ToolDefinition],
    config: &ServerConfig,
    kind: ProviderKind,
    typescript: bool,
) -> Result<String, GenerateError> {
    let template = if typescript { "demo.ts" } else { "demo.js" };
    render(template, tools, config, kind)
}
