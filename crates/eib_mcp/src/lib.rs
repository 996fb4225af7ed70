//! MCP (Model Context Protocol) Server for Edge Image Builder
//!
//! This crate implements an MCP server that lets AI assistants produce
//! Edge Image Builder definition files through a single tool,
//! `generate_config`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         MCP client                               │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               │ JSON-RPC 2.0, one message per line (stdio)
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     crates/eib_mcp/                              │
//! │                                                                  │
//! │  Server     │ read line, dispatch, write at most one response   │
//! │  Protocol   │ JSON-RPC envelopes, MCP payloads, error codes     │
//! │  Tools      │ registry + generate_config                        │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │   crates/eib_config/   credentials → schema → YAML              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Requests are handled strictly one at a time, in arrival order.

pub mod protocol;
pub mod server;
pub mod tools;

// Re-exports for convenience
pub use protocol::{ErrorCode, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId};
pub use server::{McpServer, McpServerConfig};
pub use tools::{create_default_registry, McpTool, ToolFailure, ToolRegistry};
