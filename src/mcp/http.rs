// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Streaming HTTP transport.
//!
//! Each request is one POST carrying the JSON-RPC envelope. The server
//! answers either with a single JSON body or with a server-sent-event stream;
//! in the stream case the body is consumed incrementally, events are split on
//! blank lines, and the `data:` payload is decoded and matched against the
//! request id. Because each call has exactly one outstanding exchange, the
//! shared monotonic id counter is all the correlation this variant needs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::error::McpError;
use super::protocol::{self, Incoming, JsonRpcRequest};
use super::transport::McpTransport;
use crate::config::ServerConfig;

/// Transport over HTTP POST with optional SSE replies.
pub struct HttpTransport {
    server_name: String,
    url: String,
    headers: HashMap<String, String>,
    client: reqwest::Client,
    next_id: AtomicU64,
    connected: AtomicBool,
}

impl HttpTransport {
    /// Create a transport from a stream server config.
    pub fn new(config: &ServerConfig) -> Result<Self, McpError> {
        let url = config
            .url
            .clone()
            .ok_or_else(|| McpError::InvalidConfig("stream transport requires a url".into()))?;

        Ok(Self {
            server_name: config.name.clone(),
            url,
            headers: config.headers.clone(),
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
            connected: AtomicBool::new(false),
        })
    }

    /// Consume an SSE body until a reply for `id` arrives.
    ///
    /// Events are framed by blank lines; only `data:` payload lines carry
    /// JSON-RPC. Malformed or unrelated events are skipped, matching the
    /// tolerance of the stdio reader. The buffer holds raw bytes because
    /// chunk boundaries can split a multi-byte UTF-8 sequence; only complete
    /// events are decoded to text.
    async fn read_event_stream(
        &self,
        mut response: reqwest::Response,
        id: u64,
    ) -> Result<Value, McpError> {
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk) = response.chunk().await? {
            buffer.extend_from_slice(&chunk);

            while let Some(boundary) = find_event_boundary(&buffer) {
                let event = String::from_utf8_lossy(&buffer[..boundary]).into_owned();
                buffer.drain(..boundary + 2);

                let Some(message) = parse_sse_event(&event) else {
                    continue;
                };

                match protocol::classify(message) {
                    Incoming::Reply { id: reply_id, outcome } if reply_id == id => {
                        return outcome.map_err(Into::into);
                    }
                    other => {
                        debug!(server = %self.server_name, ?other, "skipping unmatched event");
                    }
                }
            }
        }

        Err(McpError::StreamExhausted { id })
    }
}

/// Position of the next `\n\n` event boundary, if a complete event is
/// buffered.
fn find_event_boundary(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

/// Extract and decode the `data:` payload of one SSE event, if any.
fn parse_sse_event(event: &str) -> Option<Value> {
    for line in event.lines() {
        if let Some(data) = line.strip_prefix("data:") {
            return protocol::decode_message(data.trim()).ok();
        }
    }
    None
}

#[async_trait]
impl McpTransport for HttpTransport {
    async fn connect(&mut self) -> Result<(), McpError> {
        // No persistent socket; each request opens its own exchange.
        self.connected.store(true, Ordering::SeqCst);
        debug!(server = %self.server_name, url = %self.url, "http transport connected");
        Ok(())
    }

    async fn disconnect(&mut self) {
        self.connected.store(false, Ordering::SeqCst);
        debug!(server = %self.server_name, "http transport disconnected");
    }

    async fn send_request(&self, method: &str, params: Value) -> Result<Value, McpError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(McpError::NotConnected(self.server_name.clone()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = JsonRpcRequest::new(id, method, params);

        let mut builder = self
            .client
            .post(&self.url)
            .header("Accept", "application/json, text/event-stream")
            .json(&request);
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| McpError::connection_failed(&self.server_name, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(McpError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if content_type.contains("text/event-stream") {
            return self.read_event_stream(response, id).await;
        }

        let body = response.text().await?;
        let message = protocol::decode_message(&body)?;
        match protocol::classify(message) {
            Incoming::Reply { id: reply_id, outcome } if reply_id == id => {
                outcome.map_err(Into::into)
            }
            _ => Err(McpError::MalformedMessage(
                "reply does not match the request id".to_string(),
            )),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::transport::McpTransport as _;

    #[test]
    fn test_parse_sse_event_extracts_data() {
        let event = "event: message\ndata: {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}";
        let value = parse_sse_event(event).unwrap();
        assert_eq!(value["id"], 1);
    }

    #[test]
    fn test_parse_sse_event_without_data_line() {
        assert!(parse_sse_event("event: ping").is_none());
        assert!(parse_sse_event("").is_none());
    }

    #[test]
    fn test_parse_sse_event_malformed_json() {
        assert!(parse_sse_event("data: not json").is_none());
    }

    #[test]
    fn test_event_boundary_detection() {
        assert_eq!(find_event_boundary(b"data: x\n\nrest"), Some(7));
        assert_eq!(find_event_boundary(b"data: partial"), None);
        // A dangling multi-byte sequence before the boundary arrives must
        // stay buffered untouched.
        assert_eq!(find_event_boundary("data: caf\u{e9}".as_bytes()), None);
    }

    #[tokio::test]
    async fn test_connect_disconnect_roundtrip() {
        let config = ServerConfig::stream("remote", "http://localhost:3002/mcp");
        let mut transport = HttpTransport::new(&config).unwrap();

        assert!(!transport.is_connected());
        transport.connect().await.unwrap();
        assert!(transport.is_connected());
        transport.disconnect().await;
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_send_before_connect_fails() {
        let config = ServerConfig::stream("remote", "http://localhost:3002/mcp");
        let transport = HttpTransport::new(&config).unwrap();

        let err = transport
            .send_request("tools/list", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::NotConnected(_)));
    }
}
