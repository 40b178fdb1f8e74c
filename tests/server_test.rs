mod common;

use common::{client_with, MockChain, ACCOUNT};
use evm_agent_tools::server::{handle_request, JsonRpcRequest, PROTOCOL_VERSION};
use evm_agent_tools::ToolRegistry;
use serde_json::{json, Value};

fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".into(),
        method: method.into(),
        params,
        id: Some(json!(1)),
    }
}

#[tokio::test]
async fn initialize_reports_tool_capability() {
    let (client, _) = client_with(vec![MockChain::new(1)]);
    let registry = ToolRegistry::with_defaults().unwrap();

    let response = handle_request(&request("initialize", None), &client, &registry).await;
    let result = response.result.unwrap();
    assert_eq!(result["protocolVersion"], json!(PROTOCOL_VERSION));
    assert!(result["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn tools_list_includes_schemas() {
    let (client, _) = client_with(vec![MockChain::new(1)]);
    let registry = ToolRegistry::with_defaults().unwrap();

    let response = handle_request(&request("tools/list", None), &client, &registry).await;
    let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
    assert_eq!(tools.len(), registry.len());

    let fee_history = tools
        .iter()
        .find(|t| t["name"] == json!("getFeeHistory"))
        .unwrap();
    assert_eq!(
        fee_history["inputSchema"]["properties"]["blockCount"]["maximum"],
        json!(1024)
    );
}

#[tokio::test]
async fn tools_call_returns_text_and_data() {
    let (client, _) = client_with(vec![MockChain::new(1), MockChain::new(10)]);
    let registry = ToolRegistry::with_defaults().unwrap();

    let req = request(
        "tools/call",
        Some(json!({ "name": "getBlockNumber", "arguments": {} })),
    );
    let response = handle_request(&req, &client, &registry).await;
    assert!(response.error.is_none());

    let result = response.result.unwrap();
    assert_eq!(
        result["data"],
        json!([
            { "chainId": 1, "blockNumber": "100" },
            { "chainId": 10, "blockNumber": "1000" }
        ])
    );
    assert_eq!(result["content"][0]["type"], json!("text"));
}

#[tokio::test]
async fn invalid_arguments_map_to_invalid_params() {
    let (client, _) = client_with(vec![MockChain::new(1)]);
    let registry = ToolRegistry::with_defaults().unwrap();

    let req = request(
        "tools/call",
        Some(json!({ "name": "getFeeHistory", "arguments": { "blockCount": 0, "chainId": 1 } })),
    );
    let response = handle_request(&req, &client, &registry).await;
    assert_eq!(response.error.unwrap().code, -32602);
}

#[tokio::test]
async fn rpc_failures_map_to_internal_error() {
    let (client, _) = client_with(vec![MockChain::new(1).failing()]);
    let registry = ToolRegistry::with_defaults().unwrap();

    let req = request(
        "tools/call",
        Some(json!({ "name": "getBalance", "arguments": { "address": ACCOUNT.to_string() } })),
    );
    let response = handle_request(&req, &client, &registry).await;
    let error = response.error.unwrap();
    assert_eq!(error.code, -32603);
    assert!(error.message.contains("rpc error on chain 1"));
}

#[tokio::test]
async fn unknown_tool_and_method() {
    let (client, _) = client_with(vec![MockChain::new(1)]);
    let registry = ToolRegistry::with_defaults().unwrap();

    let req = request("tools/call", Some(json!({ "name": "swapTokens" })));
    let response = handle_request(&req, &client, &registry).await;
    assert_eq!(response.error.unwrap().code, -32601);

    let response = handle_request(&request("resources/list", None), &client, &registry).await;
    assert_eq!(response.error.unwrap().code, -32601);

    let response = handle_request(&request("tools/call", None), &client, &registry).await;
    assert_eq!(response.error.unwrap().code, -32602);
}
