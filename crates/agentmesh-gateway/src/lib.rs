//! Remote gateway client — single-call JSON-RPC 2.0 over HTTP to the
//! upstream AgentMesh registry. Retry policy lives in `agentmesh-a2a`, not
//! here.

pub mod client;
pub mod protocol;

pub use client::{RegistryGateway, DEFAULT_BASE_URL};
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
