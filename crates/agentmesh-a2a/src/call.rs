//! The orchestrated call state machine.

use crate::card::AgentCard;
use agentmesh_core::{MeshError, MeshResult};
use agentmesh_gateway::RegistryGateway;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Upstream tool that serves agent cards.
const CARD_TOOL: &str = "get_agent_card";

/// Default per-call deadline in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Shape of the exponential backoff between attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Base delay in milliseconds; the delay for attempt index `i` is
    /// `base * 2^i`.
    pub backoff_base_ms: u64,
    /// Cap for the exponential backoff.
    pub backoff_max_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff_base_ms: 1_000,
            backoff_max_ms: 10_000,
        }
    }
}

/// Computes the backoff delay for a given attempt index, capped at
/// `backoff_max_ms`.
fn compute_backoff(policy: &RetryPolicy, attempt: u32) -> u64 {
    let delay = policy
        .backoff_base_ms
        .saturating_mul(2u64.saturating_pow(attempt));
    delay.min(policy.backoff_max_ms)
}

/// How the task message is delivered to the target agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Wrap the raw message as `{message, inputMode: "text"}`.
    #[default]
    Text,
    /// Parse the message as JSON and send it as-is.
    Data,
}

impl InputMode {
    /// Parses the wire value of the `inputMode` argument.
    pub fn from_arg(value: &str) -> MeshResult<Self> {
        match value {
            "text" => Ok(Self::Text),
            "data" => Ok(Self::Data),
            other => Err(MeshError::Validation(format!(
                "inputMode must be \"text\" or \"data\", got \"{other}\""
            ))),
        }
    }
}

/// Per-call options parsed from the tool arguments.
#[derive(Debug, Clone)]
pub struct CallOptions {
    pub timeout_ms: u64,
    pub max_retries: u32,
    /// Caller's own agent id, forwarded with the card fetch for tracking.
    pub user_agent_id: Option<String>,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            user_agent_id: None,
        }
    }
}

/// Result of one orchestrated call, success or failure. Returned exactly
/// once per call; never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CallOutcome {
    #[serde(rename_all = "camelCase")]
    Success {
        result: serde_json::Value,
        response_time_ms: u64,
        status_code: u16,
        /// Retries consumed; 0 when the first attempt succeeded.
        retry_count: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        estimated_cost: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Failure {
        error: String,
        response_time_ms: u64,
        retry_count: u32,
        timed_out: bool,
    },
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Estimated cost: the card's per-call rate scaled by elapsed seconds with a
/// floor of 1.0 (a fast call still pays the base rate), rounded to 4
/// decimal places.
fn estimate_cost(per_call: f64, elapsed_ms: u64) -> f64 {
    let scale = (elapsed_ms as f64 / 1000.0).max(1.0);
    (per_call * scale * 10_000.0).round() / 10_000.0
}

/// Builds the outbound task payload.
///
/// `Data` mode requires the message to parse as JSON; a parse failure is a
/// permanent input error, never retried.
fn build_payload(message: &str, mode: InputMode) -> MeshResult<serde_json::Value> {
    match mode {
        InputMode::Data => serde_json::from_str(message).map_err(|e| {
            MeshError::Validation(format!("inputMode \"data\" requires a JSON message: {e}"))
        }),
        InputMode::Text => Ok(serde_json::json!({
            "message": message,
            "inputMode": "text",
        })),
    }
}

/// Performs orchestrated calls to target agents.
///
/// Attempts are strictly sequential: an attempt's outcome, including its
/// backoff delay, is fully resolved before the next one starts.
pub struct AgentCaller {
    gateway: Arc<RegistryGateway>,
    http: reqwest::Client,
    policy: RetryPolicy,
}

impl AgentCaller {
    pub fn new(gateway: Arc<RegistryGateway>, policy: RetryPolicy) -> Self {
        Self {
            gateway,
            http: reqwest::Client::new(),
            policy,
        }
    }

    /// Runs the full card-fetch / call / retry sequence for one task.
    ///
    /// Total attempts performed = `opts.max_retries + 1`. The card is
    /// re-fetched on every attempt; a stale card from a failed attempt is
    /// never reused.
    pub async fn call_agent(
        &self,
        agent_id: &str,
        message: &str,
        mode: InputMode,
        opts: &CallOptions,
    ) -> CallOutcome {
        let total_attempts = opts.max_retries.saturating_add(1);
        let mut last_error = String::new();
        let mut last_elapsed_ms = 0u64;

        for attempt in 0..total_attempts {
            if attempt > 0 {
                let delay = compute_backoff(&self.policy, attempt - 1);
                info!(agent = %agent_id, attempt, delay_ms = delay, "backing off before retry");
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            let started = Instant::now();

            let card = match self.fetch_card(agent_id, opts.user_agent_id.as_deref()).await {
                Ok(card) => card,
                Err(e) => {
                    warn!(agent = %agent_id, attempt, error = %e, "card fetch failed");
                    last_error = e.to_string();
                    last_elapsed_ms = started.elapsed().as_millis() as u64;
                    continue;
                }
            };

            let payload = match build_payload(message, mode) {
                Ok(p) => p,
                // Permanent input error: retrying cannot fix the message.
                Err(e) => {
                    return CallOutcome::Failure {
                        error: e.to_string(),
                        response_time_ms: started.elapsed().as_millis() as u64,
                        retry_count: attempt,
                        timed_out: false,
                    }
                }
            };

            let deadline = Duration::from_millis(opts.timeout_ms);
            match tokio::time::timeout(deadline, self.post_task(&card, &payload)).await {
                // Timer fired: the in-flight request future is dropped, so a
                // late response cannot produce a second reply. Timeouts are
                // terminal — the caller already paid the full deadline.
                Err(_) => {
                    let err = MeshError::Timeout(opts.timeout_ms);
                    warn!(agent = %agent_id, attempt, timeout_ms = opts.timeout_ms, "call timed out");
                    return CallOutcome::Failure {
                        error: err.to_string(),
                        response_time_ms: started.elapsed().as_millis() as u64,
                        retry_count: attempt,
                        timed_out: true,
                    };
                }
                Ok(Ok((status_code, result))) => {
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    let estimated_cost = card
                        .pricing
                        .as_ref()
                        .map(|p| estimate_cost(p.per_call, elapsed_ms));
                    info!(
                        agent = %agent_id,
                        attempt,
                        elapsed_ms,
                        status = status_code,
                        "agent call succeeded"
                    );
                    return CallOutcome::Success {
                        result,
                        response_time_ms: elapsed_ms,
                        status_code,
                        retry_count: attempt,
                        estimated_cost,
                    };
                }
                Ok(Err(e)) => {
                    warn!(agent = %agent_id, attempt, error = %e, "agent call failed");
                    last_error = e.to_string();
                    last_elapsed_ms = started.elapsed().as_millis() as u64;
                }
            }
        }

        let err = MeshError::ExhaustedRetries {
            attempts: total_attempts,
            last_error,
        };
        CallOutcome::Failure {
            error: err.to_string(),
            response_time_ms: last_elapsed_ms,
            retry_count: opts.max_retries,
            timed_out: false,
        }
    }

    /// Fetches the target's card through the gateway. An empty endpoint is
    /// treated like any other attempt failure.
    async fn fetch_card(
        &self,
        agent_id: &str,
        user_agent_id: Option<&str>,
    ) -> MeshResult<AgentCard> {
        let mut args = serde_json::json!({"agentId": agent_id});
        if let Some(uid) = user_agent_id {
            args["context"] = serde_json::json!({"userAgentId": uid});
        }

        let result = self.gateway.call_tool(CARD_TOOL, args).await?;
        let card = AgentCard::from_gateway_result(&result)?;
        if card.endpoint.is_empty() {
            return Err(MeshError::RemoteProtocol(format!(
                "agent card for '{agent_id}' has no endpoint"
            )));
        }
        debug!(agent = %agent_id, endpoint = %card.endpoint, "agent card fetched");
        Ok(card)
    }

    /// One outbound POST to the card's endpoint. Non-success status is a
    /// transport error; the body is parsed as JSON when possible.
    async fn post_task(
        &self,
        card: &AgentCard,
        payload: &serde_json::Value,
    ) -> MeshResult<(u16, serde_json::Value)> {
        let mut request = self
            .http
            .post(&card.endpoint)
            .header("content-type", "application/json")
            .json(payload);

        if let Some(token) = &card.auth_token {
            request = request.bearer_auth(token);
        }

        let resp = request
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

        let status_code = status.as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| MeshError::Http(e.to_string()))?;
        let result =
            serde_json::from_str(&text).unwrap_or_else(|_| serde_json::Value::String(text));
        Ok((status_code, result))
    }
}
