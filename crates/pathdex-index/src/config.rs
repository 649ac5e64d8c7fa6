use serde::{Deserialize, Serialize};

use crate::error::{IndexError, IndexResult};

/// Tuning knobs for the ingestion pipeline.
///
/// Every field has a default, so a config file only needs to name the
/// values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Minimum degree of the index tree. Must be at least 2.
    pub min_degree: usize,
    /// Capacity of the progress event channel. Must be at least 1.
    pub channel_capacity: usize,
    /// Minimum rise in percent before another progress value is emitted.
    pub progress_step: f64,
    /// Progress at or above this percent is always emitted.
    pub completion_threshold: f64,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            min_degree: pathdex_tree::DEFAULT_MIN_DEGREE,
            channel_capacity: 16,
            progress_step: 1.0,
            completion_threshold: 99.9,
            follow_links: false,
        }
    }
}

impl IndexerConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(s: &str) -> IndexResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> IndexResult<()> {
        if self.min_degree < 2 {
            return Err(IndexError::InvalidConfig(format!(
                "min_degree must be at least 2, got {}",
                self.min_degree
            )));
        }
        if self.channel_capacity == 0 {
            return Err(IndexError::InvalidConfig(
                "channel_capacity must be at least 1".into(),
            ));
        }
        if !(self.progress_step > 0.0 && self.progress_step <= 100.0) {
            return Err(IndexError::InvalidConfig(format!(
                "progress_step must be in (0, 100], got {}",
                self.progress_step
            )));
        }
        if !(0.0..=100.0).contains(&self.completion_threshold) {
            return Err(IndexError::InvalidConfig(format!(
                "completion_threshold must be in [0, 100], got {}",
                self.completion_threshold
            )));
        }
        Ok(())
    }
}
