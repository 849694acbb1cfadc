//! Search configuration from TOML (`[search]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSearchConfig {
    /// Allow the research phase to call the search service at all
    pub enabled: bool,
    /// Results requested per search (capped at 3)
    pub max_results: usize,
    /// HTTP timeout for one search request
    pub timeout_seconds: u64,
}

impl Default for FileSearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_results: 3,
            timeout_seconds: 15,
        }
    }
}
