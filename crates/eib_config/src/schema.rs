//! Embedded EIB definition schema and validation.
//!
//! The schema ships inside the binary and never changes at runtime. It is
//! parsed and compiled on first use and the outcome is cached, including a
//! failure, which can only mean the embedded artifact is broken.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use jsonschema::{Draft, ValidationError, Validator};
use serde_json::Value;
use tracing::debug;

use crate::document::DocumentExt;
use crate::error::{ConfigError, Result, SchemaError};

/// Raw JSON Schema for `edge-image-builder` definition files.
pub const EMBEDDED_SCHEMA: &str = include_str!("../schema/eib.schema.json");

const HELM_PATH: &[&str] = &["kubernetes", "helm"];

/// A definition schema, loaded lazily from its raw text.
pub struct EibSchema {
    raw: Cow<'static, str>,
    document: OnceLock<std::result::Result<Value, SchemaError>>,
    validator: OnceLock<std::result::Result<Validator, SchemaError>>,
}

impl EibSchema {
    /// The schema compiled into this crate.
    pub fn embedded() -> Self {
        Self::from_raw(EMBEDDED_SCHEMA)
    }

    /// A schema from arbitrary text. Nothing is parsed until first use.
    pub fn from_raw(raw: impl Into<Cow<'static, str>>) -> Self {
        Self {
            raw: raw.into(),
            document: OnceLock::new(),
            validator: OnceLock::new(),
        }
    }

    /// The schema as structured data.
    pub fn document(&self) -> std::result::Result<&Value, SchemaError> {
        self.document
            .get_or_init(|| {
                serde_json::from_str(&self.raw).map_err(|e| SchemaError::Parse(e.to_string()))
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    fn validator(&self) -> std::result::Result<&Validator, SchemaError> {
        self.validator
            .get_or_init(|| {
                let document = self.document()?;
                debug!("compiling definition schema");
                jsonschema::options()
                    .with_draft(Draft::Draft7)
                    .build(document)
                    .map_err(|e| SchemaError::Compile(e.to_string()))
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Validate `document`, reporting every violation found.
    pub fn validate(&self, document: &Value) -> Result<()> {
        let validator = self.validator()?;

        let mut violations: Vec<String> = validator
            .iter_errors(document)
            .map(|error| describe(&error))
            .collect();
        violations.extend(unresolved_chart_repositories(document));

        if violations.is_empty() {
            Ok(())
        } else {
            debug!(count = violations.len(), "definition rejected by schema");
            Err(ConfigError::Invalid(violations))
        }
    }
}

impl Default for EibSchema {
    fn default() -> Self {
        Self::embedded()
    }
}

impl fmt::Debug for EibSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EibSchema")
            .field("bytes", &self.raw.len())
            .field("compiled", &matches!(self.validator.get(), Some(Ok(_))))
            .finish()
    }
}

fn describe(error: &ValidationError<'_>) -> String {
    let location = error.instance_path.to_string();
    if location.is_empty() {
        format!("(root): {}", error)
    } else {
        format!("{}: {}", location, error)
    }
}

/// Helm charts must name a repository declared alongside them.
///
/// JSON Schema cannot express this, so it runs after structural checks.
fn unresolved_chart_repositories(document: &Value) -> Vec<String> {
    let Some(helm) = document.at_path(HELM_PATH) else {
        return Vec::new();
    };

    let declared: BTreeSet<&str> = helm
        .get("repositories")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|repo| repo.get("name")?.as_str())
        .collect();

    helm.get("charts")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .enumerate()
        .filter_map(|(index, chart)| {
            let repository = chart.get("repositoryName")?.as_str()?;
            if declared.contains(repository) {
                return None;
            }
            Some(format!(
                "/kubernetes/helm/charts/{}/repositoryName: repository {:?} is not declared in kubernetes.helm.repositories",
                index, repository
            ))
        })
        .collect()
}
