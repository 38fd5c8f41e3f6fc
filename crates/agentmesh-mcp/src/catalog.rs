//! The static tool catalog. Built once at startup, immutable for the
//! process lifetime; listing order is declaration order.

use serde::Serialize;
use std::collections::HashMap;

/// Metadata describing one tool's interface.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Tools the bridge answers itself, without the upstream registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTool {
    CallAgent,
    Guide,
    Quickstart,
}

/// How an invocation of a catalog entry is handled, resolved once at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolHandler {
    Local(LocalTool),
    Remote { upstream: &'static str },
}

/// One catalog entry: descriptor plus handler kind.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub descriptor: ToolDescriptor,
    pub handler: ToolHandler,
}

/// Ordered, name-indexed catalog of every tool the bridge exposes.
pub struct Catalog {
    specs: Vec<ToolSpec>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        let specs = build_specs();
        let index = specs
            .iter()
            .enumerate()
            .map(|(i, s)| (s.descriptor.name.clone(), i))
            .collect();
        Self { specs, index }
    }

    /// Descriptors in declaration order. Stable across calls.
    pub fn descriptors(&self) -> Vec<&ToolDescriptor> {
        self.specs.iter().map(|s| &s.descriptor).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.index.get(name).map(|&i| &self.specs[i])
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

fn spec(
    name: &str,
    description: &str,
    input_schema: serde_json::Value,
    handler: ToolHandler,
) -> ToolSpec {
    ToolSpec {
        descriptor: ToolDescriptor {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        },
        handler,
    }
}

fn build_specs() -> Vec<ToolSpec> {
    vec![
        spec(
            "mesh_search",
            "Search the mesh registry's database of indexed agents. Provide a natural \
             language description of the capability you need; results are ranked by \
             relevance, reputation, and past performance.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Natural language description of the task or capability (e.g. 'image generation agent', 'data analysis with Python')"
                    },
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of agents to return (default: 10, max: 50)",
                        "default": 10
                    },
                    "filters": {
                        "type": "object",
                        "description": "Optional filters for search results",
                        "properties": {
                            "minReputation": {
                                "type": "number",
                                "description": "Minimum reputation score (0-100)"
                            },
                            "protocols": {
                                "type": "array",
                                "items": {"type": "string"},
                                "description": "Filter by supported protocols (e.g. ['A2A'])"
                            },
                            "verified": {
                                "type": "boolean",
                                "description": "Only return verified agents"
                            }
                        }
                    }
                },
                "required": ["query"]
            }),
            ToolHandler::Remote {
                upstream: "search_agents",
            },
        ),
        spec(
            "mesh_select",
            "Get the full profile of a specific agent by id: capabilities, endpoints, \
             reputation metrics, and recent evaluations. Use after a search, before \
             invoking the agent.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "agentId": {
                        "type": "string",
                        "description": "The unique identifier of the agent to retrieve"
                    }
                },
                "required": ["agentId"]
            }),
            ToolHandler::Remote {
                upstream: "get_agent",
            },
        ),
        spec(
            "mesh_card",
            "Fetch the A2A agent card for a target agent: endpoint, authentication, and \
             capability details needed to establish a connection.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "agentId": {
                        "type": "string",
                        "description": "The unique identifier of the agent to connect to"
                    },
                    "context": {
                        "type": "object",
                        "description": "Optional context about why you're connecting",
                        "properties": {
                            "task": {
                                "type": "string",
                                "description": "Brief description of the task"
                            },
                            "userAgentId": {
                                "type": "string",
                                "description": "Your agent id, for tracking and reputation"
                            }
                        }
                    }
                },
                "required": ["agentId"]
            }),
            ToolHandler::Remote {
                upstream: "get_agent_card",
            },
        ),
        spec(
            "mesh_feedback",
            "Submit evaluation feedback after interacting with an agent. Feedback \
             strengthens reputation and improves future match accuracy for everyone.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "agentId": {
                        "type": "string",
                        "description": "The agent the feedback is about"
                    },
                    "rating": {
                        "type": "number",
                        "description": "Rating from 1-5 stars",
                        "minimum": 1,
                        "maximum": 5
                    },
                    "feedback": {
                        "type": "string",
                        "description": "Brief description of the experience (what worked, what didn't, task completion)"
                    },
                    "metadata": {
                        "type": "object",
                        "description": "Optional metadata about the interaction",
                        "properties": {
                            "taskCompleted": {
                                "type": "boolean",
                                "description": "Whether the agent completed the task"
                            },
                            "responseTime": {
                                "type": "number",
                                "description": "Response time in milliseconds"
                            },
                            "tokensUsed": {
                                "type": "number",
                                "description": "Approximate tokens consumed"
                            }
                        }
                    },
                    "userAgentId": {
                        "type": "string",
                        "description": "Your agent id (optional, for reputation tracking)"
                    }
                },
                "required": ["agentId", "rating", "feedback"]
            }),
            ToolHandler::Remote {
                upstream: "submit_feedback",
            },
        ),
        spec(
            "mesh_health",
            "Check the health of the mesh registry service: availability, indexed agent \
             count, and API status.",
            serde_json::json!({
                "type": "object",
                "properties": {}
            }),
            ToolHandler::Remote {
                upstream: "health_check",
            },
        ),
        spec(
            "mesh_call_agent",
            "Call a target agent end-to-end: fetches its agent card, sends the task \
             message to its endpoint, and returns the result with timing and cost \
             metadata. Transient failures are retried with exponential backoff.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "agentId": {
                        "type": "string",
                        "description": "The unique identifier of the agent to call"
                    },
                    "message": {
                        "type": "string",
                        "description": "The task message to send. With inputMode \"data\" this must be a JSON document."
                    },
                    "inputMode": {
                        "type": "string",
                        "enum": ["text", "data"],
                        "description": "How the message is delivered (default: text)",
                        "default": "text"
                    },
                    "timeoutMs": {
                        "type": "number",
                        "description": "Per-call deadline in milliseconds (default: 30000)",
                        "default": 30000
                    },
                    "maxRetries": {
                        "type": "number",
                        "description": "Retries after the first attempt (default: 1)",
                        "default": 1
                    },
                    "userAgentId": {
                        "type": "string",
                        "description": "Your agent id, forwarded for tracking"
                    }
                },
                "required": ["agentId", "message"]
            }),
            ToolHandler::Local(LocalTool::CallAgent),
        ),
        spec(
            "mesh_guide",
            "A short guide to working with the mesh registry: discovering agents, \
             calling them, and closing the loop with feedback.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "language": {
                        "type": "string",
                        "enum": ["typescript", "python", "curl"],
                        "description": "Language for the embedded examples (default: typescript)"
                    }
                }
            }),
            ToolHandler::Local(LocalTool::Guide),
        ),
        spec(
            "mesh_quickstart",
            "A copy-pasteable snippet that searches for an agent and calls it.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "language": {
                        "type": "string",
                        "enum": ["typescript", "python", "curl"],
                        "description": "Snippet language (default: typescript)"
                    }
                }
            }),
            ToolHandler::Local(LocalTool::Quickstart),
        ),
    ]
}
