//! HTTP client for the upstream registry's `tools/call` endpoint.

use crate::protocol::{JsonRpcRequest, JsonRpcResponse};
use agentmesh_core::{MeshError, MeshResult};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Default upstream registry endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.agentmesh.dev/mcp";

/// Client for the upstream AgentMesh registry.
///
/// Owns the process-wide request-id counter: every outbound envelope gets a
/// strictly increasing id, never reused within a process lifetime. Performs
/// exactly one HTTP round-trip per call — callers that need retries layer
/// them on top.
pub struct RegistryGateway {
    base_url: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl RegistryGateway {
    /// Creates a gateway pointed at `base_url`, id counter starting at 1.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// The upstream endpoint this gateway talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Invoke an upstream tool by name and return the envelope's `result`
    /// verbatim. The caller interprets its shape.
    ///
    /// Fails with [`MeshError::Transport`] on a non-success HTTP status and
    /// [`MeshError::RemoteProtocol`] when the decoded envelope carries an
    /// explicit error object.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> MeshResult<serde_json::Value> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let req = JsonRpcRequest::new(
            id,
            "tools/call",
            Some(serde_json::json!({
                "name": name,
                "arguments": arguments,
            })),
        );

        debug!(id, tool = %name, url = %self.base_url, "registry call");

        let resp = self
            .http
            .post(&self.base_url)
            .header("content-type", "application/json")
            .json(&req)
            .send()
            .await
            .map_err(|e| MeshError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MeshError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: JsonRpcResponse = resp
            .json()
            .await
            .map_err(|e| MeshError::Http(format!("invalid registry response: {e}")))?;

        if let Some(err) = envelope.error {
            return Err(MeshError::RemoteProtocol(err.message));
        }

        envelope
            .result
            .ok_or_else(|| MeshError::RemoteProtocol("response carried no result".to_string()))
    }
}
