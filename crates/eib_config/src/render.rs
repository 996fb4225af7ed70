//! YAML rendering of validated definitions.

use serde_json::Value;

use crate::error::Result;

/// Render `document` as a block-style YAML definition file.
///
/// Keys come out in `serde_json` map order, so the output is stable for a
/// given document.
pub fn render_yaml(document: &Value) -> Result<String> {
    Ok(serde_yaml::to_string(document)?)
}
