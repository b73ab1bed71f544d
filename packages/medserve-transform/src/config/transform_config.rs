//! Transform run configuration and its YAML schema (v1)

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;

/// Only supported schema version
pub const CONFIG_VERSION: u32 = 1;

const MAX_RECURSION_DEPTH_LIMIT: usize = 4096;

/// Settings for one transform run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformConfig {
    /// Schema version (always 1 for v1)
    pub version: u32,

    /// Log progress every N concepts of a bucket
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,

    /// Deepest nesting of record creation before the run is aborted
    #[serde(default = "default_max_recursion_depth")]
    pub max_recursion_depth: usize,

    /// Hand empty batches to the sink as well
    #[serde(default)]
    pub emit_empty_batches: bool,
}

fn default_progress_interval() -> usize {
    1000
}

fn default_max_recursion_depth() -> usize {
    256
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            progress_interval: default_progress_interval(),
            max_recursion_depth: default_max_recursion_depth(),
            emit_empty_batches: false,
        }
    }
}

impl TransformConfig {
    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    pub fn emit_empty_batches(mut self, emit: bool) -> Self {
        self.emit_empty_batches = emit;
        self
    }

    /// Load and validate a YAML configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML configuration text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        // Version check on the raw document, before the typed parse
        let raw: serde_yaml::Value = serde_yaml::from_str(content)?;
        let version = raw
            .get("version")
            .ok_or(ConfigError::MissingVersion)?
            .as_u64()
            .ok_or(ConfigError::MissingVersion)?;
        if version != u64::from(CONFIG_VERSION) {
            return Err(ConfigError::UnsupportedVersion {
                found: u32::try_from(version).unwrap_or(u32::MAX),
                supported: vec![CONFIG_VERSION],
            });
        }

        let config: TransformConfig = serde_yaml::from_value(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        serde_yaml::to_string(self).map_err(ConfigError::Yaml)
    }
}

impl Validatable for TransformConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.progress_interval == 0 {
            return Err(ConfigError::range_with_hint(
                "progress_interval",
                self.progress_interval,
                1,
                usize::MAX,
                "Use a positive interval",
            ));
        }
        if self.max_recursion_depth == 0 || self.max_recursion_depth > MAX_RECURSION_DEPTH_LIMIT {
            return Err(ConfigError::range_with_hint(
                "max_recursion_depth",
                self.max_recursion_depth,
                1,
                MAX_RECURSION_DEPTH_LIMIT,
                "AMT hierarchies nest only a few levels deep; 256 is plenty",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "TransformConfig"
    }
}
