//! `generate_config` - build an Edge Image Builder definition file.

use super::{McpTool, ToolFailure};
use crate::protocol::ToolCallResult;
use eib_config::ConfigGenerator;
use serde_json::{json, Value};
use tracing::{info, warn};

/// Tool name as exposed over MCP
pub const GENERATE_CONFIG: &str = "generate_config";

const DESCRIPTION: &str = r#"Generates a valid edge-image-builder YAML definition file.
IMPORTANT GUIDELINES:
1. Every "kubernetes.helm.charts[].repositoryName" MUST match a "name" in "kubernetes.helm.repositories", and every chart MUST set "version".
2. "kubernetes.nodes" entries MUST NOT contain IP addresses (only "hostname", "type", "initializer").
3. "operatingSystem.time" MUST use "timezone" (lowercase), NOT "timeZone".
4. "operatingSystem" MUST contain exactly one of "isoConfiguration" or "rawConfiguration".
5. Passwords: put plaintext in "password" or "encryptedPassword" on a user. It is hashed automatically; existing hashes (starting with "$") are kept.

Example Structure:
apiVersion: "1.0"
image:
  imageType: "iso"
  arch: "x86_64"
  baseImage: "SL-Micro.x86_64-6.0-Base-SelfInstall-GM.install.iso"
  outputImageName: "eib-image.iso"
operatingSystem:
  isoConfiguration:
    installDevice: "/dev/sda"
  users:
    - username: "root"
      password: "..."
  time:
    timezone: "UTC"
    ntp:
      servers:
        - "pool.ntp.org"
kubernetes:
  version: "v1.30.3+rke2r1"
  network:
    apiVIP: "192.168.122.100"
  nodes:
    - hostname: "node1"
      type: "server"
  helm:
    charts:
      - name: "metallb"
        repositoryName: "suse-edge"
        version: "0.14.3"
    repositories:
      - name: "suse-edge"
        url: "oci://registry.suse.com/edge/3.1""#;

/// Normalizes, validates and renders a definition file.
pub struct GenerateConfigTool {
    generator: ConfigGenerator,
}

impl GenerateConfigTool {
    pub fn new(generator: ConfigGenerator) -> Self {
        Self { generator }
    }
}

impl McpTool for GenerateConfigTool {
    fn name(&self) -> &'static str {
        GENERATE_CONFIG
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    /// The definition schema itself; a placeholder if it cannot be parsed.
    fn input_schema(&self) -> Value {
        match self.generator.schema().document() {
            Ok(schema) => schema.clone(),
            Err(e) => {
                warn!("Definition schema unavailable for tools/list: {}", e);
                json!({"type": "object", "error": "failed to parse schema"})
            }
        }
    }

    fn execute(&self, args: Value) -> Result<ToolCallResult, ToolFailure> {
        let yaml = self.generator.generate(args)?;
        info!(bytes = yaml.len(), "Generated definition file");
        Ok(ToolCallResult::text(yaml))
    }
}
