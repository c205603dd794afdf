//! MCP method router: shared by every transport.

use serde_json::{json, Value};
use std::time::Instant;

use super::protocol::{
    JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    MCP_VERSION, METHOD_NOT_FOUND, SERVER_NAME, SERVER_VERSION, SUPPORTED_VERSIONS,
};
use crate::tools::ErrataTools;
use crate::types::Error;

/// Routes JSON-RPC messages to the MCP lifecycle methods and the tool set.
#[derive(Debug)]
pub struct McpRouter {
    tools: ErrataTools,
}

impl McpRouter {
    pub fn new(tools: ErrataTools) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &ErrataTools {
        &self.tools
    }

    /// Handle one raw line of input. Returns `None` when no reply is due.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<Value>(line) {
            Ok(message) => self.handle_message(message).await,
            Err(e) => {
                // Without an id there is nobody to answer.
                tracing::debug!("Unparseable message, not responding: {}", e);
                None
            }
        }
    }

    /// Handle one decoded JSON-RPC message.
    pub async fn handle_message(&self, message: Value) -> Option<JsonRpcResponse> {
        let id = message.get("id").cloned().filter(|id| !id.is_null());

        match serde_json::from_value::<JsonRpcRequest>(message) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => match id {
                Some(id) => Some(JsonRpcResponse::error(
                    Some(id),
                    INVALID_REQUEST,
                    &format!("Invalid request: {}", e),
                )),
                None => {
                    tracing::debug!("Invalid request without id, not responding: {}", e);
                    None
                }
            },
        }
    }

    /// Dispatch a request. Notifications are handled and yield `None`.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!("Handling notification: {}", request.method);
            return None;
        }

        let id = request.id.clone();
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, &request.params),
            "ping" | "initialized" | "notifications/initialized" => {
                JsonRpcResponse::success(id, json!({}))
            }
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tool_call(id, request.params).await,
            _ => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>, params: &Value) -> JsonRpcResponse {
        if let Some(client) = params.get("clientInfo") {
            let name = client
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("<unknown>");
            let version = client.get("version").and_then(Value::as_str).unwrap_or("");
            tracing::info!("MCP client connected: {} {}", name, version);
        }

        let requested = params.get("protocolVersion").and_then(Value::as_str);
        let version = match requested {
            Some(v) if SUPPORTED_VERSIONS.contains(&v) => v,
            _ => MCP_VERSION,
        };

        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": version,
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": SERVER_VERSION
                },
                "capabilities": {
                    "tools": { "listChanged": false }
                },
                "instructions": "Read-only access to the Errata Tool: products, advisory states, \
                    advisory metadata by numeric id, and build signing status."
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools: Vec<Value> = self
            .tools
            .catalog()
            .list_entries()
            .into_iter()
            .filter_map(|entry| serde_json::to_value(entry).ok())
            .collect();

        tracing::debug!("Returning {} tools", tools.len());
        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    async fn handle_tool_call(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let Some(tool_name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing required parameter: name");
        };
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        let start_time = Instant::now();
        let result = self.tools.call(tool_name, arguments).await;
        let elapsed = start_time.elapsed();

        tracing::info!(
            tool = tool_name,
            duration_ms = elapsed.as_millis() as u64,
            success = matches!(&result, Ok(envelope) if envelope.is_success()),
            "Tool execution completed"
        );

        match result {
            Ok(envelope) => match serde_json::to_value(&envelope) {
                Ok(structured) => {
                    let text = serde_json::to_string_pretty(&structured)
                        .unwrap_or_else(|_| structured.to_string());
                    JsonRpcResponse::success(
                        id,
                        json!({
                            "content": [{ "type": "text", "text": text }],
                            "structuredContent": structured,
                            "isError": false
                        }),
                    )
                }
                Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, &e.to_string()),
            },
            Err(e @ (Error::NotFound(_) | Error::Validation(_))) => {
                JsonRpcResponse::error(id, INVALID_PARAMS, &e.to_string())
            }
            Err(e) => JsonRpcResponse::error(id, e.to_jsonrpc_code(), &e.to_string()),
        }
    }
}
