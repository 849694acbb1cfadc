//! Council configuration from TOML (`[council]` section)

use council_domain::{Advisor, DebateMode, MAX_ADVISORS, MIN_ADVISORS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ConfigValidationError;

/// Raw council configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Advisor identifiers, in speaking order
    pub advisors: Vec<String>,
    /// Round budget: quick, standard or deep
    pub mode: DebateMode,
    /// Research even when the question has no research keyword
    pub research: bool,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            advisors: Advisor::default_council()
                .iter()
                .map(|a| a.as_str().to_string())
                .collect(),
            mode: DebateMode::default(),
            research: false,
        }
    }
}

impl FileCouncilConfig {
    /// Parse advisor identifiers, enforcing the council size and uniqueness.
    pub fn parse_advisors(&self) -> Result<Vec<Advisor>, ConfigValidationError> {
        let mut seen = HashSet::new();
        let mut advisors = Vec::with_capacity(self.advisors.len());
        for raw in &self.advisors {
            let advisor: Advisor = raw
                .parse()
                .map_err(|_| ConfigValidationError::UnknownAdvisor(raw.clone()))?;
            if !seen.insert(advisor) {
                return Err(ConfigValidationError::DuplicateAdvisor(raw.clone()));
            }
            advisors.push(advisor);
        }
        if !(MIN_ADVISORS..=MAX_ADVISORS).contains(&advisors.len()) {
            return Err(ConfigValidationError::AdvisorCount(advisors.len()));
        }
        Ok(advisors)
    }
}
