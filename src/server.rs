use crate::error::ToolError;
use crate::ethereum::ChainClient;
use crate::tools::ToolRegistry;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Serialize, Deserialize, Debug)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Option<Value>,
    pub id: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: Some(result),
            error: None,
            id,
        }
    }

    fn failure(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
            id,
        }
    }
}

pub async fn run(client: &dyn ChainClient, tools: &ToolRegistry) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!(
        tools = tools.len(),
        "MCP Server Ready. Waiting for JSON-RPC requests on stdin..."
    );

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        debug!("Received request: {}", line);

        let req: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                continue;
            }
        };

        if req.id.is_none() && req.method.starts_with("notifications/") {
            debug!("Ignoring notification {}", req.method);
            continue;
        }

        let response = handle_request(&req, client, tools).await;

        let response_str = serde_json::to_string(&response)?;
        println!("{}", response_str);
    }

    Ok(())
}

pub async fn handle_request(
    req: &JsonRpcRequest,
    client: &dyn ChainClient,
    tools: &ToolRegistry,
) -> JsonRpcResponse {
    let id = req.id.clone();
    match req.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        ),
        "tools/list" => {
            let tool_list: Vec<Value> = tools
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name(),
                        "description": t.description(),
                        "inputSchema": t.schema()
                    })
                })
                .collect();

            JsonRpcResponse::success(id, json!({ "tools": tool_list }))
        }
        "tools/call" => {
            let Some(params) = &req.params else {
                return JsonRpcResponse::failure(id, -32602, "Missing params");
            };
            let Some(tool_name) = params.get("name").and_then(|v| v.as_str()) else {
                return JsonRpcResponse::failure(id, -32602, "Missing 'name' parameter");
            };
            let Some(tool) = tools.get(tool_name) else {
                return JsonRpcResponse::failure(id, -32601, format!("Tool not found: {}", tool_name));
            };
            let args = params.get("arguments").cloned().unwrap_or(json!({}));

            match tool.call(client, args).await {
                // MCP text content for display plus the raw value for agents.
                Ok(result) => JsonRpcResponse::success(
                    id,
                    json!({
                        "content": [{
                            "type": "text",
                            "text": serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.to_string())
                        }],
                        "data": result
                    }),
                ),
                Err(e) => {
                    error!(tool = tool_name, "Tool execution failed: {:#}", e);
                    match e.downcast_ref::<ToolError>() {
                        Some(ToolError::InvalidArguments(_)) => {
                            JsonRpcResponse::failure(id, -32602, e.to_string())
                        }
                        _ => JsonRpcResponse::failure(
                            id,
                            -32603,
                            format!("Tool execution failed: {:#}", e),
                        ),
                    }
                }
            }
        }
        _ => JsonRpcResponse::failure(id, -32601, "Method not found"),
    }
}
