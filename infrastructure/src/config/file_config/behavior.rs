//! Behavior configuration from TOML (`[behavior]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    /// Timeout in seconds for a single model or search call
    pub timeout_seconds: u64,
    /// Ceiling for the whole debate; unset means none
    pub session_timeout_seconds: Option<u64>,
    /// Consult the clarification policy before debating
    pub clarification: bool,
}

impl Default for FileBehaviorConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 120,
            session_timeout_seconds: None,
            clarification: false,
        }
    }
}
