// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! TTL-based tool list cache.
//!
//! One JSON file per cache key under a per-user cache directory. Expired or
//! unreadable entries are indistinguishable from missing ones: `get` never
//! fails, it only declines. Writes overwrite unconditionally; entries are
//! self-contained, so concurrent writers of the same key race harmlessly
//! (last write wins).

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::mcp::ToolDefinition;

/// Default entry lifetime: one hour.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Directory under the user's home holding cache entries.
const CACHE_DIR_NAME: &str = ".mcp-to-tools/cache";

/// Errors that can occur writing a cache entry. Reads never error.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk entry shape: `{tools, timestamp (epoch ms), ttl (ms)}`.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    tools: Vec<ToolDefinition>,
    timestamp: i64,
    ttl: i64,
}

/// File-backed tool list cache.
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    /// Create a cache rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache at the per-user default location (`~/.mcp-to-tools/cache`).
    pub fn default_location() -> Option<Self> {
        dirs::home_dir().map(|home| Self::new(home.join(CACHE_DIR_NAME)))
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }

    /// Look up the tool list for a key.
    ///
    /// Returns `None` for missing, expired, or unparseable entries alike.
    pub fn get(&self, key: &str) -> Option<Vec<ToolDefinition>> {
        let path = self.entry_path(key);
        let content = std::fs::read_to_string(&path).ok()?;
        let entry: CacheEntry = serde_json::from_str(&content).ok()?;

        let now = Utc::now().timestamp_millis();
        if now > entry.timestamp + entry.ttl {
            debug!(key, "cache entry expired");
            return None;
        }

        debug!(key, tools = entry.tools.len(), "cache hit");
        Some(entry.tools)
    }

    /// Store a tool list under a key, creating the cache directory if
    /// missing. Overwrites any existing entry.
    pub fn put(&self, key: &str, tools: &[ToolDefinition], ttl: Duration) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.root)?;

        let entry = CacheEntry {
            tools: tools.to_vec(),
            timestamp: Utc::now().timestamp_millis(),
            ttl: ttl.as_millis() as i64,
        };
        std::fs::write(self.entry_path(key), serde_json::to_string(&entry)?)?;

        debug!(key, tools = tools.len(), "cache entry written");
        Ok(())
    }
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`, making any
/// server name a safe file name.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
