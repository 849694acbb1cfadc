//! Debate mode value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// How long the council may argue.
///
/// The mode fixes the round budget at session creation:
///
/// | Mode | Rounds |
/// |------|--------|
/// | `quick` | 1 |
/// | `standard` | 2 |
/// | `deep` | 3 |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebateMode {
    Quick,
    #[default]
    Standard,
    Deep,
}

impl DebateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebateMode::Quick => "quick",
            DebateMode::Standard => "standard",
            DebateMode::Deep => "deep",
        }
    }

    /// Round budget for this mode.
    pub fn max_rounds(&self) -> u32 {
        match self {
            DebateMode::Quick => 1,
            DebateMode::Standard => 2,
            DebateMode::Deep => 3,
        }
    }
}

impl std::fmt::Display for DebateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DebateMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(DebateMode::Quick),
            "standard" => Ok(DebateMode::Standard),
            "deep" => Ok(DebateMode::Deep),
            other => Err(DomainError::UnknownMode(other.to_string())),
        }
    }
}
