//! Error types for the Anthropic adapter

use council_application::GatewayError;
use thiserror::Error;

/// Result type alias for Anthropic operations
pub type Result<T> = std::result::Result<T, AnthropicError>;

/// Errors that can occur when talking to the Anthropic Messages API
#[derive(Error, Debug)]
pub enum AnthropicError {
    #[error("API key not found: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Stream idle for {0}s")]
    IdleTimeout(u64),
}

impl From<AnthropicError> for GatewayError {
    fn from(error: AnthropicError) -> Self {
        let message = error.to_string();
        match &error {
            AnthropicError::MissingApiKey(_) | AnthropicError::Api { status: 401 | 403, .. } => {
                GatewayError::AuthenticationError(message)
            }
            AnthropicError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            AnthropicError::Http(e) if e.is_connect() => GatewayError::ConnectionError(message),
            AnthropicError::IdleTimeout(_) => GatewayError::Timeout,
            _ => GatewayError::RequestFailed(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses_map_to_authentication_error() {
        let error = AnthropicError::Api {
            status: 401,
            message: "invalid x-api-key".to_string(),
        };
        assert!(matches!(
            GatewayError::from(error),
            GatewayError::AuthenticationError(_)
        ));
    }

    #[test]
    fn test_other_api_errors_are_request_failures() {
        let error = AnthropicError::Api {
            status: 529,
            message: "Overloaded".to_string(),
        };
        match GatewayError::from(error) {
            GatewayError::RequestFailed(message) => assert!(message.contains("Overloaded")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_idle_timeout_is_timeout() {
        assert!(matches!(
            GatewayError::from(AnthropicError::IdleTimeout(60)),
            GatewayError::Timeout
        ));
    }
}
