//! Messages API wire types
//!
//! Request bodies are borrowed views over a
//! [`CompletionRequest`](council_application::CompletionRequest); responses
//! are deserialized leniently, ignoring fields this adapter does not use.

use council_domain::Message;
use serde::{Deserialize, Serialize};

/// `POST /v1/messages` body.
#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub system: Vec<SystemBlock<'a>>,
    pub messages: &'a [Message],
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

/// One block of the system prompt.
#[derive(Debug, Serialize)]
pub struct SystemBlock<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<CacheControl>,
}

impl<'a> SystemBlock<'a> {
    pub fn text(text: &'a str, cache: bool) -> Self {
        Self {
            kind: "text",
            text,
            cache_control: cache.then_some(CacheControl {
                kind: "ephemeral",
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CacheControl {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Non-streaming response.
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

impl MessagesResponse {
    /// Concatenated text of all text blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text.as_deref())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Error body, e.g. `{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

/// Human-readable message from an error response body.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.error.message.is_empty() => {
            if parsed.error.kind.is_empty() {
                parsed.error.message
            } else {
                format!("{}: {}", parsed.error.kind, parsed.error.message)
            }
        }
        _ => body.trim().to_string(),
    }
}
