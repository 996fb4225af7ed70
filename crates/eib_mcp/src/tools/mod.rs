//! MCP Tool Implementations
//!
//! Tools are registered in the [`ToolRegistry`] and dispatched by name from
//! `tools/call`. The server currently exposes a single tool,
//! `generate_config`.

mod generate_config;
mod registry;

pub use generate_config::{GenerateConfigTool, GENERATE_CONFIG};
pub use registry::ToolRegistry;

use crate::protocol::{ToolCallResult, ToolDefinition};
use eib_config::{ConfigError, ConfigGenerator};
use serde_json::{json, Value};
use thiserror::Error;

/// Trait for MCP tools
///
/// Execution is synchronous; a call runs to completion before the server
/// reads the next message.
pub trait McpTool: Send + Sync {
    /// Tool name (e.g., "generate_config")
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool with an argument object
    fn execute(&self, args: Value) -> Result<ToolCallResult, ToolFailure>;

    /// Get the tool definition for tools/list
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// A tool ran and failed; becomes a `-32000` error response.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ToolFailure {
    pub message: String,
    /// Structured detail for the error's `data` member
    pub data: Option<Value>,
}

impl From<ConfigError> for ToolFailure {
    fn from(err: ConfigError) -> Self {
        let data = err
            .violations()
            .map(|violations| json!({ "violations": violations }));
        Self {
            message: err.to_string(),
            data,
        }
    }
}

/// Registry with every tool this server offers.
pub fn create_default_registry(generator: ConfigGenerator) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(GenerateConfigTool::new(generator)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_from_validation_carries_violations() {
        let failure = ToolFailure::from(ConfigError::Invalid(vec![
            "/image: \"arch\" is a required property".to_string(),
        ]));

        assert!(failure.message.starts_with("configuration is invalid:\n- /image"));
        assert_eq!(
            failure.data,
            Some(json!({"violations": ["/image: \"arch\" is a required property"]}))
        );
    }

    #[test]
    fn test_failure_from_other_errors_has_no_data() {
        let failure = ToolFailure::from(ConfigError::Credentials(eib_config::HashError(
            "invalid cost".into(),
        )));

        assert_eq!(failure.message, "failed to encrypt passwords: invalid cost");
        assert!(failure.data.is_none());
    }
}
