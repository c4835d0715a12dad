//! MCP protocol integration test.
//!
//! Drives the real server over an in-memory duplex transport: tool discovery
//! via `list_tools`, invocation via `call_tool` and the error responses for
//! unknown tools, bad arguments and remote failures. The Gridly API is
//! replaced by a recording transport.

use std::sync::Arc;

use gridly_client::testing::RecordingTransport;
use gridly_client::{ApiResponse, GridlyClient, Method};
use gridly_mcp::server::GridlyMcpServer;
use rmcp::model::{CallToolRequestParams, CallToolResult, ClientInfo, ErrorCode, JsonObject};
use rmcp::service::{RoleClient, RunningService};
use rmcp::{ClientHandler, ServiceError, ServiceExt};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default)]
struct DummyClient;

impl ClientHandler for DummyClient {
    fn get_info(&self) -> ClientInfo {
        ClientInfo::default()
    }
}

type Client = RunningService<RoleClient, DummyClient>;

async fn connect(
    transport: Arc<RecordingTransport>,
) -> anyhow::Result<(Client, JoinHandle<anyhow::Result<()>>)> {
    let (server_transport, client_transport) = tokio::io::duplex(4096);

    let server = GridlyMcpServer::new(GridlyClient::with_transport(transport))?;
    let server_handle = tokio::spawn(async move {
        let service = server.serve(server_transport).await?;
        service.waiting().await?;
        anyhow::Ok(())
    });

    let client = DummyClient.serve(client_transport).await?;
    Ok((client, server_handle))
}

fn request(name: &str, arguments: Value) -> CallToolRequestParams {
    let arguments: JsonObject = arguments.as_object().cloned().unwrap_or_default();
    CallToolRequestParams {
        meta: None,
        name: name.to_string().into(),
        arguments: Some(arguments),
        task: None,
    }
}

fn text(result: &CallToolResult) -> &str {
    result
        .content
        .first()
        .and_then(|c| c.raw.as_text())
        .map(|t| t.text.as_str())
        .expect("Expected text content")
}

#[tokio::test]
async fn test_mcp_protocol_list_tools() -> anyhow::Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    let (client, server_handle) = connect(transport.clone()).await?;

    let tools = client.list_tools(None).await?;
    let tool_names: Vec<&str> = tools.tools.iter().map(|t| t.name.as_ref()).collect();
    assert_eq!(tool_names.len(), 32);
    assert_eq!(tool_names.first(), Some(&"list_projects"));
    assert_eq!(tool_names.last(), Some(&"fetch_record_history"));

    let list_records = tools
        .tools
        .iter()
        .find(|t| t.name == "list_records")
        .expect("Expected list_records in tool list");
    let schema = Value::Object((*list_records.input_schema).clone());
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["required"], json!(["viewId"]));
    assert_eq!(
        schema["properties"]["sort"]["additionalProperties"]["enum"],
        json!(["asc", "desc"])
    );

    assert!(transport.requests().is_empty(), "Listing must not hit the API");

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_mcp_protocol_call_tool() -> anyhow::Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    transport.push_response(ApiResponse::json(&json!({
        "id": "g1",
        "name": "Sheet",
        "metadata": { "a": 1 }
    })));
    let (client, server_handle) = connect(transport.clone()).await?;

    let result = client
        .call_tool(request(
            "update_grid",
            json!({ "id": "g1", "name": "Sheet", "metadata": { "a": 1 } }),
        ))
        .await?;

    let parsed: Value = serde_json::from_str(text(&result))?;
    assert_eq!(parsed["name"], "Sheet");

    let sent = transport.last_request().expect("Expected one API request");
    assert_eq!(sent.method(), Method::Patch);
    assert_eq!(sent.path(), "/grids/g1");
    assert_eq!(sent.body(), Some(&json!({ "name": "Sheet", "metadata": { "a": 1 } })));

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_mcp_protocol_delete_reports_message() -> anyhow::Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    transport.push_response(ApiResponse::no_content());
    transport.push_response(ApiResponse::new(404, "not found"));
    let (client, server_handle) = connect(transport).await?;

    let deleted = client
        .call_tool(request("delete_view", json!({ "id": "v1" })))
        .await?;
    assert_eq!(text(&deleted), "View successfully deleted.");

    let missing = client
        .call_tool(request("delete_view", json!({ "id": "v1" })))
        .await?;
    assert_eq!(text(&missing), "Failed to delete view.");

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_mcp_protocol_unknown_tool_keeps_session() -> anyhow::Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    transport.push_response(ApiResponse::json(&json!([])));
    let (client, server_handle) = connect(transport.clone()).await?;

    match client.call_tool(request("frobnicate", json!({}))).await {
        Err(ServiceError::McpError(error)) => {
            assert_eq!(error.code, ErrorCode::METHOD_NOT_FOUND);
            assert!(error.message.contains("frobnicate"));
        }
        other => panic!("Expected method-not-found error, got {other:?}"),
    }

    let result = client
        .call_tool(request("list_projects", json!({})))
        .await?;
    assert_eq!(text(&result), "[]");
    assert_eq!(transport.requests().len(), 1);

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_mcp_protocol_invalid_arguments() -> anyhow::Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    let (client, server_handle) = connect(transport.clone()).await?;

    match client
        .call_tool(request("list_records", json!({ "sort": { "c1": "sideways" } })))
        .await
    {
        Err(ServiceError::McpError(error)) => {
            assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
            let data = error.data.expect("Expected violation details");
            let fields: Vec<&str> = data["violations"]
                .as_array()
                .expect("Expected violations array")
                .iter()
                .filter_map(|v| v["field"].as_str())
                .collect();
            assert_eq!(fields, vec!["viewId", "sort.c1"]);
        }
        other => panic!("Expected invalid-params error, got {other:?}"),
    }
    assert!(transport.requests().is_empty());

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_mcp_protocol_remote_failure() -> anyhow::Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    transport.push_response(ApiResponse::new(401, r#"{"message":"Invalid API key"}"#));
    let (client, server_handle) = connect(transport).await?;

    match client.call_tool(request("list_projects", json!({}))).await {
        Err(ServiceError::McpError(error)) => {
            assert_eq!(error.code, ErrorCode::INTERNAL_ERROR);
            assert_eq!(error.data, Some(json!({ "status": 401 })));
            assert!(error.message.contains("Invalid API key"));
        }
        other => panic!("Expected internal error, got {other:?}"),
    }

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}
