use serde::{Deserialize, Serialize};

/// Search settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Most results returned by one name search.
    pub result_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { result_limit: 15 }
    }
}
