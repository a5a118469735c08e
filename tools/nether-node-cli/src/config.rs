//! nether-node.toml configuration
//!
//! Every key is optional. A missing file means all defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file looked up in the working directory when `--config` is not given
pub const CONFIG_FILE: &str = "nether-node.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub inspect: InspectSection,
}

/// Settings for documents written by `canonicalize`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Pretty-print the JSON. Default: true
    #[serde(default = "default_true")]
    pub pretty: bool,
}

/// Settings for `inspect` reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InspectSection {
    /// Report host-convention TRS instead of document TRS. Default: true
    #[serde(default = "default_true")]
    pub host_space: bool,
    /// Decimal places for printed components. Default: 4
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_true() -> bool {
    true
}

fn default_precision() -> usize {
    4
}

impl Default for OutputSection {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Default for InspectSection {
    fn default() -> Self {
        Self {
            host_space: true,
            precision: 4,
        }
    }
}

pub fn parse_config(content: &str) -> Result<ToolConfig> {
    toml::from_str(content).context("Invalid nether-node configuration")
}

/// Load configuration from `path`, or from [`CONFIG_FILE`] if it exists
pub fn load_config(path: Option<&Path>) -> Result<ToolConfig> {
    let path = match path {
        Some(path) => path,
        None if Path::new(CONFIG_FILE).exists() => Path::new(CONFIG_FILE),
        None => return Ok(ToolConfig::default()),
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {:?}", path))?;
    let config = parse_config(&content).with_context(|| format!("In {:?}", path))?;
    tracing::debug!("Loaded config from {:?}", path);
    Ok(config)
}
