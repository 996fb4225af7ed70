//! MCP Server Implementation
//!
//! JSON-RPC 2.0 server over stdio for the Model Context Protocol.
//!
//! # Architecture
//!
//! The server reads one newline-delimited request at a time, handles it to
//! completion and writes at most one response line before reading the next.
//! There is no per-session state: every request is handled on its own.
//!
//! # Example
//!
//! ```ignore
//! let schema = Arc::new(EibSchema::embedded());
//! let server = McpServer::new(McpServerConfig::default(), schema);
//! server.run()?; // Blocking, no async runtime required
//! ```

use crate::protocol::{
    ErrorCode, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse, Method,
    RequestId, ServerCapabilities, ServerInfo, ToolCallParams, ToolsCapability,
    ToolsListResult, JSONRPC_VERSION, MCP_PROTOCOL_VERSION,
};
use crate::tools::{create_default_registry, ToolRegistry};
use anyhow::{Context, Result};
use eib_config::{ConfigGenerator, EibSchema, DEFAULT_BCRYPT_COST};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// MCP Server configuration
#[derive(Debug, Clone)]
pub struct McpServerConfig {
    /// Server name (reported in initialize)
    pub server_name: String,

    /// Server version (reported in initialize)
    pub server_version: String,

    /// MCP protocol revision (reported in initialize)
    pub protocol_version: String,

    /// bcrypt work factor for credential hashing
    pub bcrypt_cost: u32,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self {
            server_name: "eib-mcp".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

/// MCP Server
pub struct McpServer {
    config: McpServerConfig,
    tools: ToolRegistry,
}

impl McpServer {
    /// Create a server exposing `generate_config` over `schema`
    pub fn new(config: McpServerConfig, schema: Arc<EibSchema>) -> Self {
        let generator = ConfigGenerator::with_bcrypt_cost(schema, config.bcrypt_cost);
        let tools = create_default_registry(generator);
        Self::with_registry(config, tools)
    }

    /// Create a server with a custom tool registry
    pub fn with_registry(config: McpServerConfig, tools: ToolRegistry) -> Self {
        Self { config, tools }
    }

    pub fn config(&self) -> &McpServerConfig {
        &self.config
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run the server (blocking, reads from stdin, writes to stdout)
    pub fn run(&self) -> Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Serve requests from `reader` until EOF, writing responses to `writer`
    ///
    /// Only read or write failures end the loop early.
    pub fn serve<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> Result<()> {
        info!("MCP server starting ({} tools registered)", self.tools.len());

        let mut line = Vec::new();
        loop {
            line.clear();
            let read = reader
                .read_until(b'\n', &mut line)
                .context("Failed to read from input stream")?;
            if read == 0 {
                break;
            }

            if let Some(response) = self.handle_line(&line) {
                self.write_response(&mut writer, &response)?;
            }
        }

        info!("MCP server shutting down");
        Ok(())
    }

    /// Parse and handle one raw line
    ///
    /// Blank lines and lines that are not a JSON-RPC request are dropped
    /// without a response.
    pub fn handle_line(&self, line: &[u8]) -> Option<JsonRpcResponse> {
        let text = match std::str::from_utf8(line) {
            Ok(text) => text.trim(),
            Err(e) => {
                debug!("Dropping message that is not UTF-8: {}", e);
                return None;
            }
        };
        if text.is_empty() {
            return None;
        }

        // Raw lines may carry plaintext passwords; never log them.
        debug!("Received {} bytes", text.len());

        match serde_json::from_str::<JsonRpcRequest>(text) {
            Ok(request) => self.handle_request(request),
            Err(e) => {
                debug!("Dropping malformed message: {}", e);
                None
            }
        }
    }

    /// Handle a single JSON-RPC request (synchronous)
    ///
    /// Returns `None` for notifications, whatever the method.
    pub fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            debug!("Request declares JSON-RPC version {:?}", request.jsonrpc);
        }

        let Some(id) = request.id else {
            debug!("Notification {}, no response", request.method);
            return None;
        };

        let response = match Method::parse(&request.method) {
            Method::Initialize => self.handle_initialize(id),
            Method::Ping => JsonRpcResponse::success(id, Value::Object(Map::new())),
            Method::ToolsList => self.handle_tools_list(id),
            Method::ToolsCall => self.handle_tools_call(id, request.params),
            Method::Unknown(method) => {
                debug!("Unknown method: {}", method);
                JsonRpcResponse::error(
                    id,
                    JsonRpcError::new(ErrorCode::MethodNotFound, "Method not found"),
                )
            }
        };
        Some(response)
    }

    /// Handle initialize request; params are not inspected
    fn handle_initialize(&self, id: RequestId) -> JsonRpcResponse {
        info!("Initialize");

        let result = InitializeResult {
            protocol_version: self.config.protocol_version.clone(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: self.config.server_name.clone(),
                version: self.config.server_version.clone(),
            },
        };

        success(id, &result)
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: RequestId) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: self.tools.list_tools(),
        };

        success(id, &result)
    }

    /// Handle tools/call request
    fn handle_tools_call(&self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        let params = match params.map(serde_json::from_value::<ToolCallParams>) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                debug!("Invalid tool call params: {}", e);
                return parse_error(id);
            }
            None => {
                debug!("Missing tool call params");
                return parse_error(id);
            }
        };

        let Some(tool) = self.tools.get(&params.name) else {
            debug!("Unknown tool: {}", params.name);
            return JsonRpcResponse::error(
                id,
                JsonRpcError::new(ErrorCode::MethodNotFound, "Tool not found"),
            );
        };

        let arguments = match params.arguments {
            None => Value::Object(Map::new()),
            Some(arguments @ Value::Object(_)) => arguments,
            Some(_) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::new(
                        ErrorCode::InvalidParams,
                        "Invalid tool arguments: expected an object",
                    ),
                );
            }
        };

        info!("Tool call: {}", params.name);

        match tool.execute(arguments) {
            Ok(result) => success(id, &result),
            Err(failure) => {
                warn!("Tool {} failed: {}", params.name, failure);
                JsonRpcResponse::error(
                    id,
                    JsonRpcError::new(ErrorCode::ToolExecution, failure.message)
                        .with_data(failure.data),
                )
            }
        }
    }

    /// Write one response line; a response that cannot be encoded is dropped
    fn write_response<W: Write>(&self, writer: &mut W, response: &JsonRpcResponse) -> Result<()> {
        let json = match serde_json::to_string(response) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize response: {}", e);
                return Ok(());
            }
        };

        debug!("Sending {} bytes", json.len());
        writeln!(writer, "{}", json).context("Failed to write to output stream")?;
        writer.flush().context("Failed to flush output stream")?;
        Ok(())
    }
}

fn success<T: Serialize>(id: RequestId, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => {
            error!("Failed to serialize result: {}", e);
            JsonRpcResponse::error(
                id,
                JsonRpcError::new(ErrorCode::InternalError, "Failed to serialize result"),
            )
        }
    }
}

fn parse_error(id: RequestId) -> JsonRpcResponse {
    JsonRpcResponse::error(id, JsonRpcError::new(ErrorCode::ParseError, "Parse error"))
}
