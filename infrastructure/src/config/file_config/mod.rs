//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate;
//! advisors stay strings so validation can name the offending entry.

mod behavior;
mod council;
mod output;
mod provider;
mod search;

pub use behavior::FileBehaviorConfig;
pub use council::FileCouncilConfig;
pub use output::FileOutputConfig;
pub use provider::FileProviderConfig;
pub use search::FileSearchConfig;

use council_application::{DebateOptions, DebateParams};
use council_domain::{MAX_ADVISORS, MIN_ADVISORS};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error("unknown advisor '{0}'")]
    UnknownAdvisor(String),

    #[error("council needs {min} to {max} advisors, got {0}", min = MIN_ADVISORS, max = MAX_ADVISORS)]
    AdvisorCount(usize),

    #[error("advisor '{0}' listed more than once")]
    DuplicateAdvisor(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Council composition and debate length
    pub council: FileCouncilConfig,
    /// Anthropic API settings
    pub provider: FileProviderConfig,
    /// Web search settings
    pub search: FileSearchConfig,
    /// Timeouts and gates
    pub behavior: FileBehaviorConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.behavior.timeout_seconds == 0
            || self.behavior.session_timeout_seconds == Some(0)
            || self.search.timeout_seconds == 0
            || self.provider.stream_idle_timeout_seconds == 0
        {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if self.provider.model.trim().is_empty() || self.provider.moderator_model().trim().is_empty()
        {
            return Err(ConfigValidationError::EmptyModelName);
        }

        self.council.parse_advisors()?;
        Ok(())
    }

    /// Debate options as configured; CLI flags are applied on top.
    pub fn debate_options(&self) -> Result<DebateOptions, ConfigValidationError> {
        Ok(DebateOptions {
            mode: self.council.mode,
            advisors: self.council.parse_advisors()?,
            research_enabled: self.council.research,
            clarification_enabled: self.behavior.clarification,
        })
    }

    /// Call control for the use case.
    pub fn debate_params(&self) -> DebateParams {
        DebateParams::default()
            .with_call_timeout(Duration::from_secs(self.behavior.timeout_seconds))
            .with_session_timeout(self.behavior.session_timeout_seconds.map(Duration::from_secs))
            .with_advisor_max_tokens(self.provider.advisor_max_tokens)
            .with_consensus_max_tokens(self.provider.consensus_max_tokens)
            .with_synthesis_max_tokens(self.provider.synthesis_max_tokens)
            .with_cache_system_prompt(self.provider.cache_system_prompt)
            .with_search_max_results(self.search.max_results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{Advisor, DebateMode, OutputFormat};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[council]
advisors = ["skeptic", "innovator"]
mode = "deep"
research = true

[provider]
model = "claude-haiku-4-5"
moderator_model = "claude-sonnet-4-5"
synthesis_max_tokens = 4096

[search]
enabled = false

[behavior]
timeout_seconds = 30
session_timeout_seconds = 600

[output]
format = "full"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());

        let options = config.debate_options().unwrap();
        assert_eq!(options.advisors, vec![Advisor::Skeptic, Advisor::Innovator]);
        assert_eq!(options.mode, DebateMode::Deep);
        assert!(options.research_enabled);
        assert!(!options.clarification_enabled);

        let params = config.debate_params();
        assert_eq!(params.call_timeout, Duration::from_secs(30));
        assert_eq!(params.session_timeout, Some(Duration::from_secs(600)));
        assert_eq!(params.synthesis_max_tokens, 4096);
        assert_eq!(params.advisor_max_tokens, 1024);

        assert_eq!(config.provider.moderator_model(), "claude-sonnet-4-5");
        assert!(!config.search.enabled);
        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(!config.output.color);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[council]
mode = "quick"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.council.mode, DebateMode::Quick);
        assert_eq!(config.council.advisors.len(), 3);
        assert_eq!(config.behavior.timeout_seconds, 120);
        assert!(config.search.enabled);
        assert!(config.output.format.is_none());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debate_params(), DebateParams::default());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = FileConfig::default();
        config.behavior.timeout_seconds = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTimeout));

        let mut config = FileConfig::default();
        config.behavior.session_timeout_seconds = Some(0);
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTimeout));
    }

    #[test]
    fn test_validate_empty_model() {
        let mut config = FileConfig::default();
        config.provider.model = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyModelName));

        let mut config = FileConfig::default();
        config.provider.moderator_model = Some(String::new());
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyModelName));
    }

    #[test]
    fn test_validate_advisors() {
        let mut config = FileConfig::default();
        config.council.advisors = vec!["oracle".to_string(), "analyst".to_string()];
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::UnknownAdvisor("oracle".to_string()))
        );

        config.council.advisors = vec!["analyst".to_string(); 6];
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::DuplicateAdvisor(_))
        ));
    }
}
