//! The `generate_config` pipeline: normalize, validate, render.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::credentials::{normalize_credentials, BcryptHasher, PasswordHasher};
use crate::error::Result;
use crate::render::render_yaml;
use crate::schema::EibSchema;

/// Produces definition files from untyped arguments.
///
/// Holds no per-call state; one generator serves every request of a session.
pub struct ConfigGenerator {
    schema: Arc<EibSchema>,
    hasher: Box<dyn PasswordHasher>,
}

impl ConfigGenerator {
    pub fn new(schema: Arc<EibSchema>, hasher: impl PasswordHasher + 'static) -> Self {
        Self {
            schema,
            hasher: Box::new(hasher),
        }
    }

    /// Generator hashing credentials with bcrypt at `cost`.
    pub fn with_bcrypt_cost(schema: Arc<EibSchema>, cost: u32) -> Self {
        Self::new(schema, BcryptHasher::new(cost))
    }

    pub fn schema(&self) -> &Arc<EibSchema> {
        &self.schema
    }

    /// Run the full pipeline over `arguments` and return the YAML text.
    pub fn generate(&self, arguments: Value) -> Result<String> {
        let document = normalize_credentials(arguments, self.hasher.as_ref())?;
        self.schema.validate(&document)?;
        let yaml = render_yaml(&document)?;
        debug!(bytes = yaml.len(), "rendered definition file");
        Ok(yaml)
    }
}
