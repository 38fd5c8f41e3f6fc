//! Dispatch router — resolves an invocation to a local handler or an
//! upstream pass-through, validates arguments before any network activity,
//! and wraps every outcome into the uniform response envelope.

use crate::catalog::{Catalog, LocalTool, ToolHandler};
use crate::docs;
use agentmesh_a2a::{AgentCaller, CallOptions, InputMode, RetryPolicy};
use agentmesh_core::{MeshError, MeshResult, ToolCall, ToolResponse};
use agentmesh_gateway::RegistryGateway;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

const MAX_SEARCH_LIMIT: u64 = 50;

pub struct Router {
    catalog: Catalog,
    gateway: Arc<RegistryGateway>,
    caller: AgentCaller,
    call_defaults: CallOptions,
}

impl Router {
    pub fn new(
        gateway: Arc<RegistryGateway>,
        policy: RetryPolicy,
        call_defaults: CallOptions,
    ) -> Self {
        Self {
            catalog: Catalog::new(),
            caller: AgentCaller::new(gateway.clone(), policy),
            gateway,
            call_defaults,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Dispatches one invocation. Never lets an error escape: every failure
    /// becomes an `isError` envelope.
    pub async fn dispatch(&self, call: ToolCall) -> ToolResponse {
        info!(tool = %call.name, "dispatching tool call");
        match self.try_dispatch(&call).await {
            Ok(resp) => resp,
            Err(e) => ToolResponse::error(format!("Error: {e}")),
        }
    }

    async fn try_dispatch(&self, call: &ToolCall) -> MeshResult<ToolResponse> {
        let spec = self
            .catalog
            .get(&call.name)
            .ok_or_else(|| MeshError::UnknownTool(call.name.clone()))?;
        let args = &call.arguments;

        match &spec.handler {
            ToolHandler::Local(LocalTool::Guide) => {
                Ok(ToolResponse::success(docs::guide(optional_str(
                    args, "language",
                ))))
            }
            ToolHandler::Local(LocalTool::Quickstart) => {
                Ok(ToolResponse::success(docs::quickstart(optional_str(
                    args, "language",
                ))))
            }
            ToolHandler::Local(LocalTool::CallAgent) => self.call_agent(args).await,
            ToolHandler::Remote { upstream } => {
                let args = validate_remote_args(&call.name, args)?;
                let result = self.gateway.call_tool(upstream, args).await?;
                Ok(ToolResponse::from_json(&result))
            }
        }
    }

    async fn call_agent(&self, args: &Value) -> MeshResult<ToolResponse> {
        let agent_id = require_str(args, "agentId", "mesh_call_agent")?;
        let message = require_str(args, "message", "mesh_call_agent")?;
        let mode = match args.get("inputMode").and_then(Value::as_str) {
            Some(value) => InputMode::from_arg(value)?,
            None => InputMode::default(),
        };
        let opts = CallOptions {
            timeout_ms: args
                .get("timeoutMs")
                .and_then(Value::as_u64)
                .unwrap_or(self.call_defaults.timeout_ms),
            max_retries: args
                .get("maxRetries")
                .and_then(Value::as_u64)
                .map(|v| v as u32)
                .unwrap_or(self.call_defaults.max_retries),
            user_agent_id: args
                .get("userAgentId")
                .and_then(Value::as_str)
                .map(String::from)
                .or_else(|| self.call_defaults.user_agent_id.clone()),
        };

        let outcome = self.caller.call_agent(&agent_id, &message, mode, &opts).await;
        let text = serde_json::to_string_pretty(&outcome)?;
        Ok(if outcome.is_success() {
            ToolResponse::success(text)
        } else {
            ToolResponse::error(text)
        })
    }
}

/// Validates a pass-through tool's arguments and returns the payload to
/// forward upstream. Runs before any network activity.
fn validate_remote_args(name: &str, args: &Value) -> MeshResult<Value> {
    let mut args = match args {
        Value::Object(_) => args.clone(),
        Value::Null => Value::Object(serde_json::Map::new()),
        _ => {
            return Err(MeshError::Validation(format!(
                "arguments for {name} must be an object"
            )))
        }
    };

    match name {
        "mesh_search" => {
            require_str(&args, "query", name)?;
            if let Some(limit) = args.get("limit").and_then(Value::as_u64) {
                args["limit"] = Value::from(limit.min(MAX_SEARCH_LIMIT));
            }
        }
        "mesh_select" | "mesh_card" => {
            require_str(&args, "agentId", name)?;
        }
        "mesh_feedback" => {
            require_str(&args, "agentId", name)?;
            require_str(&args, "feedback", name)?;
            let rating = args
                .get("rating")
                .and_then(Value::as_f64)
                .ok_or_else(|| MeshError::Validation(format!("'rating' is required for {name}")))?;
            if !(1.0..=5.0).contains(&rating) {
                return Err(MeshError::Validation(format!(
                    "rating must be between 1 and 5, got {rating}"
                )));
            }
        }
        // mesh_health takes no arguments.
        _ => {}
    }

    Ok(args)
}

fn require_str(args: &Value, key: &str, tool: &str) -> MeshResult<String> {
    match args.get(key).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        _ => Err(MeshError::Validation(format!(
            "'{key}' is required for {tool}"
        ))),
    }
}

fn optional_str<'a>(args: &'a Value, key: &str) -> &'a str {
    args.get(key).and_then(Value::as_str).unwrap_or_default()
}
