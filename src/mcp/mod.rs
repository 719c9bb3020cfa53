// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Model Context Protocol (MCP) client support.
//!
//! This module implements the transport and request-correlation layer used
//! to discover tools on MCP servers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                introspect (orchestrator)            │
//! └──────────────┬──────────────────────┬───────────────┘
//!                │                      │
//!        ┌───────▼────────┐     ┌───────▼────────┐
//!        │ StdioTransport │     │ HttpTransport  │
//!        │ (child process)│     │ (POST + SSE)   │
//!        └───────┬────────┘     └────────────────┘
//!                │
//!        ┌───────▼────────────┐
//!        │ RequestCorrelator  │
//!        │ (replies by id)    │
//!        └────────────────────┘
//! ```

pub mod correlator;
pub mod error;
pub mod http;
pub mod protocol;
pub mod stdio;
pub mod transport;
pub mod types;

pub use correlator::RequestCorrelator;
pub use error::McpError;
pub use http::HttpTransport;
pub use stdio::StdioTransport;
pub use transport::{build_transport, McpTransport};
pub use types::{ToolDefinition, ToolListResult};
