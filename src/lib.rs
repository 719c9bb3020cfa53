// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! mcp-to-tools - Generate provider-ready tool catalogs from MCP servers.
//!
//! Connects to one or more Model Context Protocol servers, introspects the
//! tools they expose over JSON-RPC, and renders the result as importable
//! JavaScript/TypeScript modules plus documentation.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`error`] - Error types and result aliases
//! - [`config`] - Server configuration loading and validation
//! - [`mcp`] - Transports, wire protocol, and request correlation
//! - [`cache`] - File-backed TTL cache for introspected catalogs
//! - [`introspect`] - Orchestration: connect, list tools, merge, cache
//! - [`generate`] - Provider-format conversion, templates, and docs
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_to_tools::config::ServerConfig;
//! use mcp_to_tools::introspect::{introspect_server, IntrospectOptions};
//!
//! let config = ServerConfig::stdio("calc", "node").with_args(vec!["server.js".into()]);
//! let tools = introspect_server(&config, &IntrospectOptions::default()).await?;
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod generate;
pub mod introspect;
pub mod mcp;

pub use error::Result;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
