//! Inbound MCP surface of the bridge: the tool catalog, the dispatch
//! router, and the line-delimited JSON-RPC server over stdio.

pub mod catalog;
pub mod docs;
pub mod protocol;
pub mod router;
pub mod server;

pub use catalog::{Catalog, LocalTool, ToolDescriptor, ToolHandler, ToolSpec};
pub use router::Router;
pub use server::McpServer;
