//! Tool call results in MCP shape

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use shade_registry::InvokeError;

/// Result payload of a `tools/call` request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content types for tool results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Wrap a handler's return value.
    ///
    /// Strings are passed as text; anything else is rendered as JSON, and
    /// objects are also attached as structured content.
    pub fn success(value: Value) -> Self {
        let text = match &value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Self {
            content: vec![ToolContent::Text { text }],
            structured_content: value.is_object().then_some(value),
            is_error: None,
        }
    }

    /// Report a failed invocation as `{error_kind, message}`
    pub fn failure(err: &InvokeError) -> Self {
        let message = err.to_string();
        Self {
            content: vec![ToolContent::Text {
                text: message.clone(),
            }],
            structured_content: Some(json!({
                "error_kind": err.kind(),
                "message": message,
            })),
            is_error: Some(true),
        }
    }

    pub fn from_outcome(outcome: std::result::Result<Value, InvokeError>) -> Self {
        match outcome {
            Ok(value) => Self::success(value),
            Err(err) => Self::failure(&err),
        }
    }
}
