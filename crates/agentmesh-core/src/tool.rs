use serde::{Deserialize, Serialize};

/// An inbound request to invoke a named tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON arguments to pass to the tool.
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// A single content block inside a [`ToolResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ContentBlock {
    /// A `text`-typed content block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_string(),
            text: text.into(),
        }
    }
}

/// The uniform envelope returned for every tool invocation.
///
/// Success carries the pretty-printed payload; failure carries a
/// human-readable message with `is_error` set. Nothing else ever reaches the
/// inbound transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<ContentBlock>,
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResponse {
    /// Creates a successful response with a single text block.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            is_error: false,
        }
    }

    /// Creates an error response with a single text block.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            is_error: true,
        }
    }

    /// Pretty-prints a JSON payload into a successful response.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        Self::success(text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn success_response() {
        let resp = ToolResponse::success("output");
        assert!(!resp.is_error);
        assert_eq!(resp.content[0].text, "output");
        assert_eq!(resp.content[0].content_type, "text");
    }

    #[test]
    fn error_response() {
        let resp = ToolResponse::error("failed");
        assert!(resp.is_error);
    }

    #[test]
    fn is_error_omitted_when_false() {
        let resp = ToolResponse::success("ok");
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("isError").is_none());

        let resp = ToolResponse::error("bad");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["isError"], true);
    }

    #[test]
    fn from_json_pretty_prints() {
        let resp = ToolResponse::from_json(&serde_json::json!({"a": 1}));
        assert!(resp.content[0].text.contains("\"a\": 1"));
    }

    #[test]
    fn tool_call_defaults_arguments() {
        let call: ToolCall = serde_json::from_str(r#"{"name":"mesh_health"}"#).unwrap();
        assert_eq!(call.name, "mesh_health");
        assert!(call.arguments.is_null());
    }
}
