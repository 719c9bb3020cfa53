// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Child-process transport speaking newline-delimited JSON-RPC.
//!
//! Spawns the configured command with piped stdin/stdout and exchanges one
//! JSON value per line in both directions. A background task reads stdout and
//! routes replies through the correlator, so replies may arrive in any order
//! relative to requests. Stderr is drained as out-of-band diagnostics and
//! never parsed.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::correlator::RequestCorrelator;
use super::error::McpError;
use super::protocol::{self, Incoming, JsonRpcRequest};
use super::transport::McpTransport;
use crate::config::ServerConfig;

/// Transport over a spawned child process's pipes.
pub struct StdioTransport {
    /// Server name, used in errors and logs.
    server_name: String,

    command: String,
    args: Vec<String>,
    env: HashMap<String, String>,
    cwd: Option<String>,

    /// In-flight request tracking, shared with the reader task.
    correlator: Arc<RequestCorrelator>,

    /// Child stdin; `None` before connect and after disconnect.
    writer: Mutex<Option<ChildStdin>>,

    /// The child itself, kept for kill-on-disconnect. The reader task takes
    /// it on EOF to collect the exit code.
    child: Arc<Mutex<Option<Child>>>,

    reader_task: Mutex<Option<JoinHandle<()>>>,
    stderr_task: Mutex<Option<JoinHandle<()>>>,

    connected: Arc<AtomicBool>,
}

impl StdioTransport {
    /// Create a transport from a stdio server config. Does not spawn yet.
    pub fn new(config: &ServerConfig) -> Result<Self, McpError> {
        let command = config
            .command
            .clone()
            .ok_or_else(|| McpError::InvalidConfig("stdio transport requires a command".into()))?;

        Ok(Self {
            server_name: config.name.clone(),
            command,
            args: config.args.clone(),
            env: config.env.clone(),
            cwd: config.cwd.clone(),
            correlator: Arc::new(RequestCorrelator::new()),
            writer: Mutex::new(None),
            child: Arc::new(Mutex::new(None)),
            reader_task: Mutex::new(None),
            stderr_task: Mutex::new(None),
            connected: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Read stdout lines until EOF, routing replies through the correlator.
    ///
    /// A malformed line is dropped and the stream continues; misbehaving
    /// servers interleaving junk with valid replies must not break siblings.
    /// On EOF the child's exit code rejects everything still pending.
    async fn read_loop(
        server_name: String,
        stdout: ChildStdout,
        correlator: Arc<RequestCorrelator>,
        child: Arc<Mutex<Option<Child>>>,
        connected: Arc<AtomicBool>,
    ) {
        let mut lines = BufReader::new(stdout).lines();

        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let message = match protocol::decode_message(line) {
                Ok(message) => message,
                Err(_) => {
                    debug!(server = %server_name, "skipping malformed line");
                    continue;
                }
            };

            match protocol::classify(message) {
                Incoming::Reply { id, outcome } => {
                    correlator.resolve(id, outcome.map_err(Into::into)).await;
                }
                Incoming::Unsolicited(value) => {
                    debug!(server = %server_name, ?value, "dropping unsolicited message");
                }
            }
        }

        connected.store(false, Ordering::SeqCst);

        // Disconnect may have taken the child already; in that case the
        // teardown path owns the reject-all and we have nothing to add.
        let Some(mut child) = child.lock().await.take() else {
            return;
        };

        let code = child
            .wait()
            .await
            .ok()
            .and_then(|status| status.code())
            .unwrap_or(-1);
        warn!(server = %server_name, code, "process exited");

        correlator
            .reject_all(|| McpError::ProcessTerminated { code })
            .await;
    }

    /// Drain stderr as diagnostic text.
    async fn drain_stderr(server_name: String, stderr: ChildStderr) {
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(server = %server_name, "stderr: {line}");
        }
    }

    /// Number of requests currently awaiting replies. Test hook.
    pub async fn pending_requests(&self) -> usize {
        self.correlator.pending_count().await
    }
}

#[async_trait]
impl McpTransport for StdioTransport {
    async fn connect(&mut self) -> Result<(), McpError> {
        if self.connected.load(Ordering::SeqCst) {
            return Ok(());
        }

        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| McpError::connection_failed(&self.server_name, e.to_string()))?;

        let stdin = child.stdin.take().ok_or_else(|| {
            McpError::connection_failed(&self.server_name, "failed to get stdin")
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            McpError::connection_failed(&self.server_name, "failed to get stdout")
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            McpError::connection_failed(&self.server_name, "failed to get stderr")
        })?;

        *self.child.lock().await = Some(child);
        *self.writer.lock().await = Some(stdin);
        self.connected.store(true, Ordering::SeqCst);

        *self.reader_task.lock().await = Some(tokio::spawn(Self::read_loop(
            self.server_name.clone(),
            stdout,
            Arc::clone(&self.correlator),
            Arc::clone(&self.child),
            Arc::clone(&self.connected),
        )));
        *self.stderr_task.lock().await = Some(tokio::spawn(Self::drain_stderr(
            self.server_name.clone(),
            stderr,
        )));

        debug!(server = %self.server_name, command = %self.command, "stdio transport connected");
        Ok(())
    }

    async fn disconnect(&mut self) {
        self.connected.store(false, Ordering::SeqCst);

        // Stop the reader first so it does not race us for the child.
        if let Some(task) = self.reader_task.lock().await.take() {
            task.abort();
        }
        if let Some(task) = self.stderr_task.lock().await.take() {
            task.abort();
        }

        // Dropping stdin closes the child's input stream.
        self.writer.lock().await.take();

        if let Some(mut child) = self.child.lock().await.take() {
            let _ = child.kill().await;
        }

        // Outstanding callers observe a deterministic failure rather than a
        // hang; the pending set is cleared unconditionally.
        let server_name = self.server_name.clone();
        self.correlator
            .reject_all(move || McpError::ConnectionClosed(server_name.clone()))
            .await;

        debug!(server = %self.server_name, "stdio transport disconnected");
    }

    async fn send_request(&self, method: &str, params: Value) -> Result<Value, McpError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(McpError::NotConnected(self.server_name.clone()));
        }

        let id = self.correlator.next_id();
        let reply = self.correlator.register(id, method).await;
        let request = JsonRpcRequest::new(id, method, params);
        let mut line = request.encode()?;
        line.push('\n');

        {
            let mut writer = self.writer.lock().await;
            let Some(writer) = writer.as_mut() else {
                self.correlator.discard(id).await;
                return Err(McpError::NotConnected(self.server_name.clone()));
            };

            if let Err(e) = writer.write_all(line.as_bytes()).await {
                self.correlator.discard(id).await;
                return Err(McpError::connection_failed(&self.server_name, e.to_string()));
            }
            if let Err(e) = writer.flush().await {
                self.correlator.discard(id).await;
                return Err(McpError::connection_failed(&self.server_name, e.to_string()));
            }
        }

        reply.wait().await
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
