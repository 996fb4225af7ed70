//! CLI module for the EIB MCP launcher

pub mod generate;
pub mod mcp;
pub mod schema;
