// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Integration tests for the HTTP transport against a raw TCP mock server.
//!
//! The mock accepts one connection, consumes the POST request, and writes a
//! canned HTTP response. `Connection: close` plus EOF delimits SSE bodies.

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use mcp_to_tools::config::ServerConfig;
use mcp_to_tools::mcp::{HttpTransport, McpError, McpTransport};

/// Serve exactly one HTTP exchange, returning the URL to hit.
async fn serve_once(response: String) -> String {
    serve_chunked(vec![response.into_bytes()]).await
}

/// Serve one exchange whose response goes out in several TCP writes, with a
/// pause between them so each arrives as its own chunk.
async fn serve_chunked(parts: Vec<Vec<u8>>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        // Read headers, then exactly content-length body bytes.
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        let header_end = loop {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "client closed before sending a full request");
            request.extend_from_slice(&buf[..n]);
            if let Some(pos) = find_header_end(&request) {
                break pos;
            }
        };

        let headers = String::from_utf8_lossy(&request[..header_end]).to_string();
        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())?
            })
            .unwrap_or(0);
        while request.len() < header_end + 4 + content_length {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "client closed before sending the full body");
            request.extend_from_slice(&buf[..n]);
        }

        for part in parts {
            stream.write_all(&part).await.unwrap();
            stream.flush().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        stream.shutdown().await.unwrap();
    });

    format!("http://{addr}/mcp")
}

fn find_header_end(bytes: &[u8]) -> Option<usize> {
    bytes.windows(4).position(|w| w == b"\r\n\r\n")
}

fn json_response(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )
}

fn sse_response(events: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n{events}"
    )
}

async fn connected_transport(url: String) -> HttpTransport {
    let config = ServerConfig::stream("remote", url);
    let mut transport = HttpTransport::new(&config).unwrap();
    transport.connect().await.unwrap();
    transport
}

#[tokio::test]
async fn test_json_body_reply() {
    let reply = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": {"tools": [{"name": "remote-tool", "inputSchema": {"type": "object"}}]}
    });
    let url = serve_once(json_response(&reply.to_string())).await;

    let transport = connected_transport(url).await;
    let tools = transport.list_tools().await.unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "remote-tool");
    assert_eq!(tools[0].description, "");
}

#[tokio::test]
async fn test_sse_reply_after_unrelated_events() {
    let reply = json!({"jsonrpc": "2.0", "id": 1, "result": {"tools": []}});
    let events = format!(
        "event: ping\n\ndata: not json at all\n\ndata: {reply}\n\n"
    );
    let url = serve_once(sse_response(&events)).await;

    let transport = connected_transport(url).await;
    let tools = transport.list_tools().await.unwrap();
    assert!(tools.is_empty());
}

#[tokio::test]
async fn test_sse_reply_for_other_id_is_skipped() {
    let wrong = json!({"jsonrpc": "2.0", "id": 99, "result": "stale"});
    let right = json!({"jsonrpc": "2.0", "id": 1, "result": "fresh"});
    let events = format!("data: {wrong}\n\ndata: {right}\n\n");
    let url = serve_once(sse_response(&events)).await;

    let transport = connected_transport(url).await;
    let result = transport.send_request("tools/list", json!({})).await.unwrap();
    assert_eq!(result, json!("fresh"));
}

#[tokio::test]
async fn test_sse_chunk_split_inside_multibyte_character() {
    let reply = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": {"tools": [{
            "name": "calc",
            "description": "opération élémentaire",
            "inputSchema": {"type": "object"}
        }]}
    });
    let body = format!("data: {reply}\n\n").into_bytes();

    // Cut the body one byte into the first two-byte "é" (0xC3 0xA9).
    let cut = body.iter().position(|&b| b == 0xC3).unwrap() + 1;
    let header =
        b"HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n";
    let first = [header.as_slice(), &body[..cut]].concat();
    let second = body[cut..].to_vec();
    let url = serve_chunked(vec![first, second]).await;

    let transport = connected_transport(url).await;
    let tools = transport.list_tools().await.unwrap();
    assert_eq!(tools[0].description, "opération élémentaire");
}

#[tokio::test]
async fn test_sse_stream_ending_without_reply() {
    let events = "event: ping\n\ndata: not json\n\n".to_string();
    let url = serve_once(sse_response(&events)).await;

    let transport = connected_transport(url).await;
    let err = transport
        .send_request("tools/list", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, McpError::StreamExhausted { id: 1 }));
}

#[tokio::test]
async fn test_http_error_status() {
    let response =
        "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            .to_string();
    let url = serve_once(response).await;

    let transport = connected_transport(url).await;
    let err = transport
        .send_request("tools/list", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, McpError::RequestFailed { status: 500 }));
}

#[tokio::test]
async fn test_mismatched_json_reply_id() {
    let reply = json!({"jsonrpc": "2.0", "id": 42, "result": "wrong request"});
    let url = serve_once(json_response(&reply.to_string())).await;

    let transport = connected_transport(url).await;
    let err = transport
        .send_request("tools/list", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, McpError::MalformedMessage(_)));
}

#[tokio::test]
async fn test_rpc_error_in_json_body() {
    let reply = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": {"code": -32600, "message": "Invalid Request"}
    });
    let url = serve_once(json_response(&reply.to_string())).await;

    let transport = connected_transport(url).await;
    let err = transport
        .send_request("tools/list", json!({}))
        .await
        .unwrap_err();
    match err {
        McpError::Rpc { code, .. } => assert_eq!(code, -32600),
        other => panic!("expected rpc error, got {other:?}"),
    }
}
