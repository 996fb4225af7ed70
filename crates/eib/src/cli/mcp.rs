//! MCP Server CLI launcher
//!
//! The server communicates via stdio using newline-delimited JSON-RPC.

use anyhow::Result;
use eib_config::EibSchema;
use eib_mcp::{McpServer, McpServerConfig};
use std::sync::Arc;

/// Arguments for the MCP server command
pub struct McpArgs {
    pub bcrypt_cost: u32,
}

/// Run the MCP server (blocks until stdin closes)
pub fn run(args: McpArgs) -> Result<()> {
    let config = McpServerConfig {
        bcrypt_cost: args.bcrypt_cost,
        ..McpServerConfig::default()
    };
    let server = McpServer::new(config, Arc::new(EibSchema::embedded()));

    tracing::info!(
        "{} {} on stdio (bcrypt cost {})",
        server.config().server_name,
        server.config().server_version,
        args.bcrypt_cost
    );

    server.run()
}
