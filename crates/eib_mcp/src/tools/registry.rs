//! Tool Registry - Tool Discovery and Dispatch
//!
//! Maintains the list of available tools and looks them up by name.

use super::McpTool;
use crate::protocol::ToolDefinition;
use std::collections::BTreeMap;
use tracing::debug;

/// Registry of available MCP tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Box<dyn McpTool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Box<dyn McpTool>) {
        let name = tool.name();
        debug!("Registering tool: {}", name);
        self.tools.insert(name, tool);
    }

    /// Definitions of all tools, ordered by name
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ToolCallResult;
    use crate::tools::ToolFailure;
    use serde_json::{json, Value};

    struct EchoTool;

    impl McpTool for EchoTool {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "Echo the arguments back"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object"})
        }

        fn execute(&self, args: Value) -> Result<ToolCallResult, ToolFailure> {
            Ok(ToolCallResult::text(args.to_string()))
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(Box::new(EchoTool));

        assert_eq!(registry.len(), 1);
        assert!(registry.get("unknown_tool").is_none());

        let result = registry.get("echo").unwrap().execute(json!({"a": 1})).unwrap();
        assert_eq!(result, ToolCallResult::text(r#"{"a":1}"#));
    }

    #[test]
    fn test_list_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        registry.register(Box::new(EchoTool));

        let tools = registry.list_tools();

        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "echo");
        assert_eq!(tools[0].input_schema["type"], "object");
    }
}
