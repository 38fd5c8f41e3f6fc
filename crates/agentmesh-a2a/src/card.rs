//! Agent card — the connection descriptor fetched per call.

use agentmesh_core::{MeshError, MeshResult};
use serde::{Deserialize, Serialize};

/// A2A-style connection descriptor for a target agent.
///
/// Fetched fresh for every call attempt and owned solely by the attempt that
/// fetched it — a card is never cached across attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    /// Endpoint the task payload is POSTed to. Some registries publish this
    /// under `url`.
    #[serde(default, alias = "url")]
    pub endpoint: String,
    /// Bearer token attached to the outbound call when present.
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub pricing: Option<Pricing>,
    #[serde(default)]
    pub input_schema: Option<serde_json::Value>,
    #[serde(default)]
    pub output_schema: Option<serde_json::Value>,
}

/// Per-call pricing advertised by the card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    #[serde(default)]
    pub per_call: f64,
}

impl AgentCard {
    /// Parses a card out of a gateway `tools/call` result.
    ///
    /// The gateway returns the result verbatim, so the card arrives either
    /// as a bare JSON object or wrapped in an MCP text content block.
    pub fn from_gateway_result(result: &serde_json::Value) -> MeshResult<Self> {
        if let Some(text) = result.pointer("/content/0/text").and_then(|v| v.as_str()) {
            return serde_json::from_str(text)
                .map_err(|e| MeshError::RemoteProtocol(format!("malformed agent card: {e}")));
        }
        serde_json::from_value(result.clone())
            .map_err(|e| MeshError::RemoteProtocol(format!("malformed agent card: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_card() {
        let result = serde_json::json!({
            "endpoint": "https://agent.example.com/task",
            "authToken": "tok-123",
            "pricing": {"perCall": 0.01}
        });
        let card = AgentCard::from_gateway_result(&result).unwrap();
        assert_eq!(card.endpoint, "https://agent.example.com/task");
        assert_eq!(card.auth_token.as_deref(), Some("tok-123"));
        assert_eq!(card.pricing.unwrap().per_call, 0.01);
    }

    #[test]
    fn parses_content_wrapped_card() {
        let inner = r#"{"endpoint":"https://agent.example.com/task","inputSchema":{"type":"object"}}"#;
        let result = serde_json::json!({
            "content": [{"type": "text", "text": inner}],
            "isError": false
        });
        let card = AgentCard::from_gateway_result(&result).unwrap();
        assert_eq!(card.endpoint, "https://agent.example.com/task");
        assert!(card.input_schema.is_some());
        assert!(card.auth_token.is_none());
    }

    #[test]
    fn accepts_url_alias() {
        let result = serde_json::json!({"url": "https://agent.example.com/a2a"});
        let card = AgentCard::from_gateway_result(&result).unwrap();
        assert_eq!(card.endpoint, "https://agent.example.com/a2a");
    }

    #[test]
    fn missing_endpoint_defaults_empty() {
        let card = AgentCard::from_gateway_result(&serde_json::json!({})).unwrap();
        assert!(card.endpoint.is_empty());
    }

    #[test]
    fn malformed_wrapped_card_is_protocol_error() {
        let result = serde_json::json!({
            "content": [{"type": "text", "text": "not json at all"}]
        });
        let err = AgentCard::from_gateway_result(&result).unwrap_err();
        assert!(matches!(err, MeshError::RemoteProtocol(_)));
    }
}
