//! Error types for the configuration pipeline.
//!
//! The `Display` text of [`ConfigError`] is what MCP clients see in the
//! `message` of a tool-execution error, so it is kept stable.

use thiserror::Error;

/// Pipeline result type.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration pipeline errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A user credential could not be hashed
    #[error("failed to encrypt passwords: {0}")]
    Credentials(#[from] HashError),

    /// The embedded schema artifact is unusable (build defect)
    #[error("failed to load schema: {0}")]
    Schema(#[from] SchemaError),

    /// The document does not conform to the schema
    #[error("configuration is invalid:\n{}", bullet_list(.0))]
    Invalid(Vec<String>),

    /// The validated document could not be written as YAML
    #[error("failed to marshal to YAML: {0}")]
    Render(#[from] serde_yaml::Error),
}

impl ConfigError {
    /// Violations reported by validation, if this is a validation failure.
    pub fn violations(&self) -> Option<&[String]> {
        match self {
            Self::Invalid(violations) => Some(violations),
            _ => None,
        }
    }
}

/// Failure reported by a [`crate::PasswordHasher`].
#[derive(Error, Debug)]
#[error("{0}")]
pub struct HashError(pub String);

impl From<bcrypt::BcryptError> for HashError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self(err.to_string())
    }
}

/// The schema artifact could not be parsed or compiled.
///
/// Cloneable so the outcome of the one-time load can be cached.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema is not valid JSON: {0}")]
    Parse(String),

    #[error("schema does not compile: {0}")]
    Compile(String),
}

fn bullet_list(lines: &[String]) -> String {
    lines.iter().map(|line| format!("- {}\n", line)).collect()
}
