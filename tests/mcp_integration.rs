//! End-to-end MCP tests over the HTTP transports with a canned Errata API.

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use errata_mcp::errata::{AdvisoryInfo, ErrataApi, Product};
use errata_mcp::mcp::{McpRouter, McpServer};
use errata_mcp::tools::ErrataTools;
use errata_mcp::types::{AdvisoryId, ServerConfig, Transport};
use errata_mcp::{Error, Result};

/// Knows RHEL and advisory 148894; everything else is missing.
struct CannedErrata;

#[async_trait]
impl ErrataApi for CannedErrata {
    async fn product(&self, name: &str) -> Result<Product> {
        match name {
            "RHEL" => Ok(Product {
                name: "RHEL".to_string(),
                id: Some(16),
                description: None,
            }),
            other => Err(Error::not_found(format!("product {}", other))),
        }
    }

    async fn advisory(&self, id: AdvisoryId) -> Result<AdvisoryInfo> {
        if id.get() != 148894 {
            return Err(Error::not_found(format!("advisory {}", id)));
        }
        Ok(AdvisoryInfo {
            id: "RHSA-2025:0001-01".to_string(),
            numeric_id: 148894,
            synopsis: "Important: kernel security update".to_string(),
            description: String::new(),
            advisory_type: "RHSA".to_string(),
            state: "QE".to_string(),
            product: "RHEL".to_string(),
            release: "RHEL-9.4.0.Z".to_string(),
            created_date: "2025-01-10T00:00:00Z".to_string(),
            updated_date: "2025-01-12T00:00:00Z".to_string(),
            url: "https://errata.example/advisory/148894".to_string(),
            embargoed: false,
            text_only: false,
            content_types: vec!["rpm".to_string()],
            security_impact: Some("Important".to_string()),
        })
    }

    async fn builds_list(&self, id: AdvisoryId) -> Result<Value> {
        if id.get() != 148894 {
            return Err(Error::not_found(format!("builds list for advisory {}", id)));
        }
        Ok(json!({
            "RHEL-9.4.0.Z": {"builds": [
                {"kernel-5.14.0-1.el9": {
                    "is_signed": true,
                    "variant_arch": {"BaseOS": {"x86_64": [{"is_signed": true}]}}
                }}
            ]}
        }))
    }
}

async fn start(transport: Transport) -> (Arc<McpServer>, String) {
    let router = McpRouter::new(ErrataTools::new(Arc::new(CannedErrata)));
    let server = Arc::new(McpServer::new(
        router,
        ServerConfig {
            transport,
            host: "127.0.0.1".to_string(),
            port: 0,
        },
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let running = server.clone();
    tokio::spawn(async move {
        running.serve_with_listener(listener).await.unwrap();
    });
    (server, base)
}

async fn post_mcp(base: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/mcp", base))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_reports_version() {
    let (server, base) = start(Transport::StreamableHttp).await;

    let body: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    server.shutdown();
}

#[tokio::test]
async fn streamable_http_round_trip() {
    let (server, base) = start(Transport::StreamableHttp).await;

    let init: Value = post_mcp(
        &base,
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {"protocolVersion": "2024-11-05"}}),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(init["result"]["serverInfo"]["name"], "errata-mcp-server");

    let notified = post_mcp(
        &base,
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    )
    .await;
    assert_eq!(notified.status(), reqwest::StatusCode::ACCEPTED);

    let listed: Value = post_mcp(&base, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}))
        .await
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = listed["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert!(names.contains(&"get_errata_builds_list"));
    assert!(names.contains(&"list_errata_products"));

    let products: Value = post_mcp(
        &base,
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
               "params": {"name": "list_errata_products", "arguments": {}}}),
    )
    .await
    .json()
    .await
    .unwrap();
    let envelope = &products["result"]["structuredContent"];
    assert_eq!(envelope["status"], "success");
    assert_eq!(envelope["data"], json!(["RHEL"]));
    assert_eq!(envelope["message"], "Retrieved 1 products");

    let invalid: Value = post_mcp(
        &base,
        json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call",
               "params": {"name": "get_errata_advisory_info", "arguments": {"advisory_id": "RHSA-2025:0001"}}}),
    )
    .await
    .json()
    .await
    .unwrap();
    let envelope = &invalid["result"]["structuredContent"];
    assert_eq!(envelope["status"], "error");
    assert_eq!(envelope["advisory_id"], "RHSA-2025:0001");
    assert!(envelope["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid input: "));

    server.shutdown();
}

#[tokio::test]
async fn streamable_http_rejects_garbage() {
    let (server, base) = start(Transport::StreamableHttp).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/mcp", base))
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], -32700);

    server.shutdown();
}

/// Minimal SSE reader: yields `(event, data)` pairs, skipping keep-alive comments.
struct SseReader {
    stream: futures::stream::BoxStream<'static, reqwest::Result<Vec<u8>>>,
    buffer: String,
}

impl SseReader {
    fn new(resp: reqwest::Response) -> Self {
        Self {
            stream: resp.bytes_stream().map(|r| r.map(|b| b.to_vec())).boxed(),
            buffer: String::new(),
        }
    }

    async fn next_event(&mut self) -> (String, String) {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let block: String = self.buffer.drain(..end + 2).collect();
                let mut event = String::from("message");
                let mut data = String::new();
                for line in block.lines() {
                    if let Some(value) = line.strip_prefix("event:") {
                        event = value.trim_start().to_string();
                    } else if let Some(value) = line.strip_prefix("data:") {
                        data.push_str(value.trim_start());
                    }
                }
                if data.is_empty() {
                    continue;
                }
                return (event, data);
            }

            let chunk = tokio::time::timeout(Duration::from_secs(5), self.stream.next())
                .await
                .expect("timed out waiting for SSE event")
                .expect("SSE stream ended")
                .unwrap();
            self.buffer
                .push_str(&String::from_utf8_lossy(&chunk).replace("\r\n", "\n"));
        }
    }
}

#[tokio::test]
async fn sse_session_delivers_tool_results() {
    let (server, base) = start(Transport::Sse).await;
    let http = reqwest::Client::new();

    let resp = http.get(format!("{}/sse", base)).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let mut events = SseReader::new(resp);

    let (event, endpoint) = events.next_event().await;
    assert_eq!(event, "endpoint");
    assert!(endpoint.starts_with("/messages/?session_id="));

    let accepted = http
        .post(format!("{}{}", base, endpoint))
        .json(&json!({"jsonrpc": "2.0", "id": "b1", "method": "tools/call",
                      "params": {"name": "get_errata_builds_list", "arguments": {"advisory_id": 148894}}}))
        .send()
        .await
        .unwrap();
    assert_eq!(accepted.status(), reqwest::StatusCode::ACCEPTED);

    let (event, data) = events.next_event().await;
    assert_eq!(event, "message");
    let reply: Value = serde_json::from_str(&data).unwrap();
    assert_eq!(reply["id"], "b1");
    let envelope = &reply["result"]["structuredContent"];
    assert_eq!(envelope["status"], "success");
    assert_eq!(envelope["advisory_id"], "148894");
    assert_eq!(envelope["message"], "Retrieved 1 builds for advisory 148894");
    assert_eq!(envelope["data"]["signing_summary"]["all_builds_signed"], true);
    assert_eq!(envelope["data"]["signing_summary"]["all_files_signed"], true);

    let unknown = http
        .post(format!("{}/messages/?session_id={}", base, uuid::Uuid::new_v4()))
        .json(&json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), reqwest::StatusCode::NOT_FOUND);

    server.shutdown();
}
