use std::path::Path;

use anyhow::Context;
use pathdex_index::IndexerConfig;
use pathdex_search::SearchConfig;
use serde::{Deserialize, Serialize};

/// Everything a config file can set.
///
/// ```toml
/// [index]
/// min_degree = 16
///
/// [search]
/// result_limit = 25
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathdexConfig {
    pub index: IndexerConfig,
    pub search: SearchConfig,
}

impl PathdexConfig {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("invalid config file")?;
        config.index.validate()?;
        Ok(config)
    }

    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        Self::from_toml_str(&text)
    }
}
