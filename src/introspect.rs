// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Server introspection orchestration.
//!
//! Drives the per-server sequence: cache lookup, connect, `tools/list`,
//! disconnect, cache write-back. Single-server introspection propagates the
//! failure; multi-server introspection isolates failures per server and
//! merges the surviving catalogs in input order, prefixing tool names with
//! their server to keep identically named tools apart.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{ToolCache, DEFAULT_CACHE_TTL};
use crate::config::ServerConfig;
use crate::mcp::{build_transport, McpError, ToolDefinition};

/// Options controlling cache use and namespacing.
#[derive(Debug, Clone)]
pub struct IntrospectOptions {
    /// Skip the cache entirely, both lookup and write-back.
    pub no_cache: bool,

    /// Cache key override; defaults to the server's declared name. Only
    /// meaningful in single-server mode, where there is one key to override.
    pub cache_key: Option<String>,

    /// Lifetime for written cache entries.
    pub cache_ttl: Duration,

    /// Cache location override; defaults to the per-user cache directory.
    pub cache: Option<ToolCache>,

    /// Prefix tool names with their server name when introspecting multiple
    /// servers together. Callers that guarantee disjoint tool names may turn
    /// this off.
    pub namespace_prefix: bool,
}

impl Default for IntrospectOptions {
    fn default() -> Self {
        Self {
            no_cache: false,
            cache_key: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: None,
            namespace_prefix: true,
        }
    }
}

impl IntrospectOptions {
    fn resolve_cache(&self) -> Option<ToolCache> {
        if self.no_cache {
            return None;
        }
        self.cache.clone().or_else(ToolCache::default_location)
    }
}

/// One server's failure in multi-server mode.
#[derive(Debug, Clone)]
pub struct ServerFailure {
    /// The failed server's declared name.
    pub server: String,

    /// Human-readable failure description.
    pub message: String,
}

/// Outcome of a multi-server introspection: the merged catalog plus a
/// side-channel of per-server failures.
#[derive(Debug, Default)]
pub struct IntrospectionReport {
    /// Merged tools, in input server order.
    pub tools: Vec<ToolDefinition>,

    /// Servers that failed, in input order.
    pub failures: Vec<ServerFailure>,
}

/// Introspect a single server. The failure, if any, is the caller's.
pub async fn introspect_server(
    config: &ServerConfig,
    options: &IntrospectOptions,
) -> Result<Vec<ToolDefinition>, McpError> {
    let key = options.cache_key.as_deref().unwrap_or(&config.name);
    introspect_one(config, options, key).await
}

/// Introspect several servers independently.
///
/// One bad server degrades the result instead of aborting the rest; if every
/// server fails the tool list is empty and the failure list tells the story.
/// Never fails itself.
pub async fn introspect_servers(
    configs: &[ServerConfig],
    options: &IntrospectOptions,
) -> IntrospectionReport {
    let prefix = configs.len() > 1 && options.namespace_prefix;
    let mut report = IntrospectionReport::default();

    for config in configs {
        match introspect_one(config, options, &config.name).await {
            Ok(tools) => {
                debug!(server = %config.name, tools = tools.len(), "server introspected");
                for mut tool in tools {
                    if prefix {
                        tool.name =
                            format!("{}_{}", sanitize_server_name(&config.name), tool.name);
                    }
                    report.tools.push(tool);
                }
            }
            Err(e) => {
                warn!(server = %config.name, error = %e, "server introspection failed");
                report.failures.push(ServerFailure {
                    server: config.name.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        tools = report.tools.len(),
        failed = report.failures.len(),
        "introspection finished"
    );
    report
}

/// The per-server state machine: cache lookup, then connect-list-disconnect
/// on a miss, then cache write-back on success.
async fn introspect_one(
    config: &ServerConfig,
    options: &IntrospectOptions,
    cache_key: &str,
) -> Result<Vec<ToolDefinition>, McpError> {
    let cache = options.resolve_cache();

    if let Some(cache) = &cache {
        if let Some(tools) = cache.get(cache_key) {
            debug!(server = %config.name, "using cached tool list");
            return Ok(tools);
        }
    }

    let mut transport = build_transport(config)?;
    transport.connect().await?;
    let result = transport.list_tools().await;
    transport.disconnect().await;
    let tools = result?;

    if let Some(cache) = &cache {
        // A failed write-back must not fail a successful introspection.
        if let Err(e) = cache.put(cache_key, &tools, options.cache_ttl) {
            warn!(server = %config.name, error = %e, "cache write failed");
        }
    }

    Ok(tools)
}

/// Make a server name safe as a tool name prefix: hyphens become
/// underscores.
fn sanitize_server_name(name: &str) -> String {
    name.replace('-', "_")
}
