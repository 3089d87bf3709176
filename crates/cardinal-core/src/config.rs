//! Analysis configuration, loadable from TOML.
//!
//! ```toml
//! # cardinal.toml
//! cut_set = "dominators"   # or "reachability" (default)
//! max_positions = 4096     # optional guard against oversized models
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// How required components are detected. Both strategies agree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutSetStrategy {
    /// One fresh source→sink search per component.
    #[default]
    Reachability,
    /// Dominator chain of the sink in the condensed component DAG.
    Dominators,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub cut_set: CutSetStrategy,
    /// Reject content models with more distinct particles than this.
    #[serde(default)]
    pub max_positions: Option<usize>,
}

impl AnalysisConfig {
    /// Parse a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not valid TOML or has unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("failed to parse analysis config")
    }

    /// Load a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("invalid config in {}", path.display()))
    }
}
