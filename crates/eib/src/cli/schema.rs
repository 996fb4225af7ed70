use anyhow::{Context, Result};
use eib_config::EibSchema;
use std::io::Write;

/// Print the embedded definition schema, pretty-printed.
pub fn run() -> Result<()> {
    let schema = EibSchema::embedded();
    let document = schema.document().context("Embedded schema is not valid JSON")?;
    let text = serde_json::to_string_pretty(document)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", text).context("Failed to write schema")?;
    Ok(())
}
