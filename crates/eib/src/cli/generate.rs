//! Offline `generate`: run a definition file through the MCP tool pipeline.

use anyhow::{Context, Result};
use eib_config::{ConfigGenerator, EibSchema};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Arguments for the generate command
#[derive(Debug)]
pub struct GenerateArgs {
    pub file: PathBuf,
    pub bcrypt_cost: u32,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let yaml = generate_file(&args.file, args.bcrypt_cost)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(yaml.as_bytes())
        .context("Failed to write definition")?;
    Ok(())
}

/// Load `path` and return the generated definition file.
pub fn generate_file(path: &Path, bcrypt_cost: u32) -> Result<String> {
    let arguments = load_arguments(path)?;
    let generator = ConfigGenerator::with_bcrypt_cost(Arc::new(EibSchema::embedded()), bcrypt_cost);

    let yaml = generator
        .generate(arguments)
        .with_context(|| format!("Failed to generate definition from {}", path.display()))?;
    info!("Generated definition from {}", path.display());
    Ok(yaml)
}

/// `.json` files are parsed as JSON, anything else as YAML.
fn load_arguments(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
    } else {
        serde_yaml::from_str(&text).with_context(|| format!("Invalid YAML in {}", path.display()))
    }
}
