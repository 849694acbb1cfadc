//! Consensus verdict value object

use serde::{Deserialize, Serialize};

/// The moderator's judgement of how far the advisors agree.
///
/// Ephemeral: produced by one analysis call and consumed immediately to pick
/// the next debate transition. The default value is the conservative
/// "no consensus, zero agreement" verdict.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsensusVerdict {
    /// Whether the moderator judged the core recommendation agreed.
    pub reached: bool,
    /// Agreement in `0.0..=1.0`.
    pub agreement_level: f64,
    #[serde(default)]
    pub agreement_points: Vec<String>,
    #[serde(default)]
    pub disagreement_points: Vec<String>,
    #[serde(default)]
    pub majority_view: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minority_view: Option<String>,
}

impl ConsensusVerdict {
    /// The verdict used whenever analysis is skipped or fails.
    pub fn no_consensus() -> Self {
        Self::default()
    }

    /// Agreement as a whole percentage, for display.
    pub fn agreement_percent(&self) -> u8 {
        (self.agreement_level.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}
