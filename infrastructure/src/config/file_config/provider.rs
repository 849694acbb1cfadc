//! Provider configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};

/// Anthropic Messages API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Model used for advisor turns.
    pub model: String,
    /// Model used by the moderator; falls back to `model`.
    pub moderator_model: Option<String>,
    /// Base URL for the Anthropic API.
    pub base_url: String,
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Anthropic API version header.
    pub api_version: String,
    pub advisor_max_tokens: u32,
    pub consensus_max_tokens: u32,
    pub synthesis_max_tokens: u32,
    /// Mark persona system prompts as cacheable.
    pub cache_system_prompt: bool,
    /// Abort a stream after this many seconds without a chunk.
    pub stream_idle_timeout_seconds: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-5".to_string(),
            moderator_model: None,
            base_url: "https://api.anthropic.com".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            api_version: "2023-06-01".to_string(),
            advisor_max_tokens: 1024,
            consensus_max_tokens: 1024,
            synthesis_max_tokens: 2048,
            cache_system_prompt: true,
            stream_idle_timeout_seconds: 60,
        }
    }
}

impl FileProviderConfig {
    pub fn moderator_model(&self) -> &str {
        self.moderator_model.as_deref().unwrap_or(&self.model)
    }

    /// API key from the config file, else from `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderator_falls_back_to_model() {
        let mut config = FileProviderConfig::default();
        assert_eq!(config.moderator_model(), "claude-sonnet-4-5");
        config.moderator_model = Some("claude-opus-4-1".to_string());
        assert_eq!(config.moderator_model(), "claude-opus-4-1");
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let config = FileProviderConfig {
            api_key: Some("sk-test".to_string()),
            api_key_env: "COUNCIL_TEST_UNSET_PROVIDER_KEY".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-test"));

        let config = FileProviderConfig {
            api_key: Some("   ".to_string()),
            api_key_env: "COUNCIL_TEST_UNSET_PROVIDER_KEY".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key(), None);
    }
}
