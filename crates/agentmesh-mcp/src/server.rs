//! Line-delimited JSON-RPC server over stdio.
//!
//! Requests are handled to completion one at a time; the only suspension
//! points are the outbound network awaits inside a handler. Logs go to
//! stderr — stdout belongs to the protocol stream.

use crate::protocol::{RpcRequest, RpcResponse, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR};
use crate::router::Router;
use agentmesh_core::{MeshResult, ToolCall};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

pub const SERVER_NAME: &str = "agentmesh-mcp";
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub struct McpServer {
    router: Router,
}

impl McpServer {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Reads requests from stdin until EOF, writing one response line per
    /// request to stdout.
    pub async fn run(&self) -> MeshResult<()> {
        info!(server = SERVER_NAME, "serving on stdio");

        let mut reader = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut line = String::new();

        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) => {
                    debug!("stdin closed, shutting down");
                    break;
                }
                Ok(_) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if let Some(reply) = self.handle_line(trimmed).await {
                        stdout.write_all(reply.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;
                    }
                }
                Err(e) => {
                    error!(error = %e, "error reading stdin");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handles one raw input line. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let reply = match serde_json::from_str::<RpcRequest>(line) {
            Ok(req) => self.handle_request(req).await?,
            Err(e) => RpcResponse::error(Value::Null, PARSE_ERROR, format!("parse error: {e}")),
        };
        serde_json::to_string(&reply).ok()
    }

    async fn handle_request(&self, req: RpcRequest) -> Option<RpcResponse> {
        // No id means notification: never reply.
        let id = match req.id {
            Some(id) => id,
            None => {
                debug!(method = %req.method, "notification");
                return None;
            }
        };

        let reply = match req.method.as_str() {
            "initialize" => RpcResponse::result(
                id,
                serde_json::json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {"tools": {}},
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION"),
                    }
                }),
            ),
            "tools/list" => RpcResponse::result(
                id,
                serde_json::json!({"tools": self.router.catalog().descriptors()}),
            ),
            "tools/call" => {
                let params = req.params.unwrap_or(Value::Null);
                let name = params
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                if name.is_empty() {
                    return Some(RpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        "params.name is required",
                    ));
                }
                let call = ToolCall {
                    name,
                    arguments: params
                        .get("arguments")
                        .cloned()
                        .unwrap_or(Value::Null),
                };
                let response = self.router.dispatch(call).await;
                match serde_json::to_value(&response) {
                    Ok(value) => RpcResponse::result(id, value),
                    Err(e) => RpcResponse::error(id, INVALID_PARAMS, e.to_string()),
                }
            }
            other => RpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("method not found: {other}"),
            ),
        };

        Some(reply)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use agentmesh_a2a::{CallOptions, RetryPolicy};
    use agentmesh_gateway::RegistryGateway;
    use std::sync::Arc;

    fn test_server() -> McpServer {
        // Non-routable upstream: these tests never reach the network.
        let gateway = Arc::new(RegistryGateway::new("http://127.0.0.1:1"));
        let router = Router::new(gateway, RetryPolicy::default(), CallOptions::default());
        McpServer::new(router)
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let server = test_server();
        let reply = server
            .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#)
            .await
            .unwrap();
        let json: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(json["result"]["serverInfo"]["name"], SERVER_NAME);
        assert!(json["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn tools_list_returns_catalog_in_order() {
        let server = test_server();
        let reply = server
            .handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
            .await
            .unwrap();
        let json: Value = serde_json::from_str(&reply).unwrap();
        let tools = json["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 8);
        assert_eq!(tools[0]["name"], "mesh_search");
        assert!(tools[0]["inputSchema"].is_object());

        // Listing twice yields the identical sequence.
        let again = server
            .handle_line(r#"{"jsonrpc":"2.0","id":3,"method":"tools/list"}"#)
            .await
            .unwrap();
        let json_again: Value = serde_json::from_str(&again).unwrap();
        assert_eq!(json["result"]["tools"], json_again["result"]["tools"]);
    }

    #[tokio::test]
    async fn notification_gets_no_reply() {
        let server = test_server();
        let reply = server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn unknown_method_is_rejected() {
        let server = test_server();
        let reply = server
            .handle_line(r#"{"jsonrpc":"2.0","id":4,"method":"resources/list"}"#)
            .await
            .unwrap();
        let json: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(json["error"]["code"], METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn unparseable_line_is_a_parse_error() {
        let server = test_server();
        let reply = server.handle_line("{this is not json").await.unwrap();
        let json: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(json["error"]["code"], PARSE_ERROR);
    }

    #[tokio::test]
    async fn tool_call_without_name_is_invalid_params() {
        let server = test_server();
        let reply = server
            .handle_line(r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{}}"#)
            .await
            .unwrap();
        let json: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(json["error"]["code"], INVALID_PARAMS);
    }

    #[tokio::test]
    async fn unknown_tool_becomes_error_envelope() {
        let server = test_server();
        let reply = server
            .handle_line(
                r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"mesh_bogus"}}"#,
            )
            .await
            .unwrap();
        let json: Value = serde_json::from_str(&reply).unwrap();
        // Tool-level failures are envelopes, not protocol errors.
        assert!(json.get("error").is_none());
        assert_eq!(json["result"]["isError"], true);
        let text = json["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("Unknown tool"));
    }

    #[tokio::test]
    async fn local_guide_tool_served_without_network() {
        let server = test_server();
        let reply = server
            .handle_line(
                r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"mesh_guide","arguments":{"language":"python"}}}"#,
            )
            .await
            .unwrap();
        let json: Value = serde_json::from_str(&reply).unwrap();
        let text = json["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("mesh_search"));
        assert!(json["result"].get("isError").is_none());
    }
}
