//! # MCP Handler Module
//!
//! Implements the Model Context Protocol methods for the Sui server and
//! hands `tools/call` requests to the tool dispatcher.
//!
//! ## Supported Methods
//! - `initialize` - server info, capabilities and negotiated protocol version
//! - `ping` - liveness check
//! - `tools/list` - the full tool catalog
//! - `tools/call` - invoke a tool by name
//! - `<tool name>` - shorthand for `tools/call` with `params` as arguments
//!
//! Notifications never receive a response.

use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::{
    mcp::protocol::{error_codes, Request, Response},
    tools::{envelope, ToolRequest},
    AppState,
};

pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-06-18";
pub const SERVER_NAME: &str = "sui-mcp-server";

/// This is the main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    if req.is_notification() {
        debug!("Ignoring notification: {}", req.method);
        return None;
    }
    info!("Handling MCP request for method: {}", req.method);

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "ping" => Response::success(req.response_id(), json!({})),
        "tools/list" => handle_tools_list(&req, &state),
        "tools/call" => handle_tool_call(req, state).await,
        // Convenience aliases: a tool name used directly as the method is
        // rewritten into tools/call with params as the arguments.
        method if state.tools.has_tool(method) => {
            let wrapped = Request {
                jsonrpc: req.jsonrpc.clone(),
                id: req.id.clone(),
                method: "tools/call".to_string(),
                params: Some(json!({
                    "name": req.method,
                    "arguments": req.params.clone().unwrap_or_else(|| json!({})),
                })),
            };
            handle_tool_call(wrapped, state).await
        }
        _ => Response::error(
            req.response_id(),
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Handles a 'tools/call' request by dispatching it to the named tool.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.response_id(),
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(Value::as_str) {
        Some(name) => name.to_string(),
        None => {
            return Response::error(
                req.response_id(),
                error_codes::INVALID_PARAMS,
                "Missing 'name' in tools/call params".into(),
            )
        }
    };
    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

    let tools = state.tools.clone();
    let result = tools
        .dispatch(state, ToolRequest::new(tool_name, arguments))
        .await;

    match serde_json::to_value(envelope::build(result)) {
        Ok(body) => Response::success(req.response_id(), body),
        Err(e) => {
            error!("Failed to serialize tool result: {}", e);
            Response::error(
                req.response_id(),
                error_codes::INTERNAL_ERROR,
                format!("Failed to serialize tool result: {}", e),
            )
        }
    }
}

fn handle_initialize(req: &Request) -> Response {
    let protocol_version = req
        .params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);
    let server_info = json!({
        "name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions = "Sui wallet MCP server: create and import wallets, query balances, objects and transactions, transfer SUI and objects, switch networks and convert units.";

    Response::success(
        req.response_id(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": protocol_version,
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}

/// Handles the 'tools/list' request by returning every cataloged tool.
fn handle_tools_list(req: &Request, state: &AppState) -> Response {
    Response::success(req.response_id(), state.tools.listing().clone())
}
