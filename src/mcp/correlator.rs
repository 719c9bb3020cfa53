// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Request/reply correlation.
//!
//! Replies on an MCP connection may arrive in any order relative to their
//! requests (a slow tool call answered after a faster concurrent one), so
//! in-flight requests are keyed by id rather than FIFO position. Every
//! registered request is resolved exactly once: by a matching reply, by
//! transport teardown, or by its own deadline.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{oneshot, Mutex};
use tracing::debug;

use super::error::McpError;

/// Default per-request deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

type Outcome = Result<Value, McpError>;
type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Outcome>>>>;

/// Tracks in-flight requests and routes replies to their callers.
pub struct RequestCorrelator {
    /// Monotonically increasing request id, process-local.
    next_id: AtomicU64,

    /// In-flight requests by id. Entries are removed on resolution,
    /// rejection, or timeout, never left behind.
    pending: PendingMap,

    /// Per-request deadline.
    timeout: Duration,
}

impl RequestCorrelator {
    /// Create a correlator with the default 30-second deadline.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a correlator with a custom per-request deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            pending: Arc::new(Mutex::new(HashMap::new())),
            timeout,
        }
    }

    /// Allocate the next request id.
    pub fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Register an in-flight request and get a handle to await its reply.
    pub async fn register(&self, id: u64, method: &str) -> PendingReply {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        PendingReply {
            id,
            method: method.to_string(),
            timeout: self.timeout,
            rx,
            pending: Arc::clone(&self.pending),
        }
    }

    /// Remove a pending request without resolving it.
    ///
    /// Used when the write side fails before the request ever went out.
    pub async fn discard(&self, id: u64) {
        self.pending.lock().await.remove(&id);
    }

    /// Resolve the request with the given id.
    ///
    /// Unknown ids (already resolved, timed out, or unsolicited) are dropped
    /// silently; a duplicate or late reply must never resolve a caller twice.
    pub async fn resolve(&self, id: u64, outcome: Outcome) {
        match self.pending.lock().await.remove(&id) {
            Some(tx) => {
                // Send fails only if the caller gave up; nothing left to do.
                let _ = tx.send(outcome);
            }
            None => {
                debug!(id, "dropping reply with no pending request");
            }
        }
    }

    /// Reject every still-pending request and clear the map.
    ///
    /// Used on transport teardown; `reason` is invoked once per entry.
    pub async fn reject_all<F>(&self, reason: F)
    where
        F: Fn() -> McpError,
    {
        let mut pending = self.pending.lock().await;
        for (_, tx) in pending.drain() {
            let _ = tx.send(Err(reason()));
        }
    }

    /// Number of requests currently in flight.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

impl Default for RequestCorrelator {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for one in-flight request.
pub struct PendingReply {
    id: u64,
    method: String,
    timeout: Duration,
    rx: oneshot::Receiver<Outcome>,
    pending: PendingMap,
}

impl PendingReply {
    /// The id this request was registered under.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Await the reply, the deadline, or transport teardown, whichever
    /// happens first.
    pub async fn wait(self) -> Outcome {
        match tokio::time::timeout(self.timeout, self.rx).await {
            Ok(Ok(outcome)) => outcome,
            // Sender dropped without resolving: the correlator went away.
            Ok(Err(_)) => Err(McpError::ConnectionClosed(format!(
                "request '{}' abandoned",
                self.method
            ))),
            Err(_) => {
                // Deadline fired. Remove our entry so a late reply is
                // dropped instead of resolving a caller that already left.
                self.pending.lock().await.remove(&self.id);
                Err(McpError::timeout(&self.method, self.timeout.as_secs()))
            }
        }
    }
}
