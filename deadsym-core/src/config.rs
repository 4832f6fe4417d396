//! Configuration loading from deadsym.toml.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{DeadsymError, IoResultExt};

use crate::logging::LogFormat;
use crate::symbol::DEFAULT_SYSTEM_INCLUDE_PREFIXES;
use crate::tools::ToolSet;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "deadsym.toml";

/// Main configuration structure for deadsym.toml.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DeadsymConfig {
    /// External tool overrides (cross toolchains).
    pub tools: Option<ToolsConfig>,
    /// Source attribution settings.
    pub attribution: Option<AttributionConfig>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Program names for the dump tools.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    pub objdump: Option<String>,
    pub nm: Option<String>,
}

/// Source attribution configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AttributionConfig {
    /// Extra path prefixes treated as system headers, appended to the defaults.
    pub system_include_prefixes: Option<Vec<String>>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Diagnostic log format: "plain" or "json".
    pub log_format: Option<LogFormat>,
}

impl DeadsymConfig {
    /// Tools to run, defaults filled in.
    pub fn tool_set(&self) -> ToolSet {
        let mut set = ToolSet::default();
        if let Some(tools) = &self.tools {
            if let Some(objdump) = &tools.objdump {
                set.objdump = objdump.clone();
            }
            if let Some(nm) = &tools.nm {
                set.nm = nm.clone();
            }
        }
        set
    }

    /// Default system include prefixes followed by configured ones.
    pub fn system_include_prefixes(&self) -> Vec<String> {
        let mut prefixes: Vec<String> = DEFAULT_SYSTEM_INCLUDE_PREFIXES
            .iter()
            .map(|p| p.to_string())
            .collect();
        if let Some(extra) = self
            .attribution
            .as_ref()
            .and_then(|a| a.system_include_prefixes.as_ref())
        {
            prefixes.extend(extra.iter().cloned());
        }
        prefixes
    }

    pub fn log_format(&self) -> LogFormat {
        self.output
            .as_ref()
            .and_then(|o| o.log_format)
            .unwrap_or_default()
    }
}

/// Loads configuration from deadsym.toml in `dir` if it exists.
pub fn load_config(dir: &Path) -> Result<Option<DeadsymConfig>> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).with_path(&path)?;
    let cfg = toml::from_str(&content).map_err(|e| DeadsymError::config(&path, e.to_string()))?;
    Ok(Some(cfg))
}
