use serde::Serialize;
use serde_json::Value;

use crate::tools::dispatcher::ToolResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

/// `tools/call` result body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl CallToolResult {
    pub fn text(&self) -> Option<&str> {
        self.content.first().map(|Content::Text { text }| text.as_str())
    }
}

fn pretty(payload: &Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}

/// Shapes a dispatch result for the client. Failures stay in-band.
pub fn build(result: ToolResult) -> CallToolResult {
    match result {
        ToolResult::Success(payload) => CallToolResult {
            content: vec![Content::Text {
                text: pretty(&payload),
            }],
            is_error: None,
        },
        ToolResult::Failure { message, .. } => CallToolResult {
            content: vec![Content::Text {
                text: format!("Error: {}", message),
            }],
            is_error: Some(true),
        },
    }
}
