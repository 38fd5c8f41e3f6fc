//! Core types shared across the AgentMesh crates.
//!
//! # Main types
//!
//! - [`MeshError`] — Unified error enum for every failure class the bridge
//!   can surface.
//! - [`MeshResult`] — Convenience alias for `Result<T, MeshError>`.
//! - [`ToolCall`] — An inbound tool invocation (name plus JSON arguments).
//! - [`ToolResponse`] — The uniform content envelope returned to the caller.

pub mod error;
pub mod tool;

pub use error::{MeshError, MeshResult};
pub use tool::{ContentBlock, ToolCall, ToolResponse};
