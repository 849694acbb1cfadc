//! Anthropic Messages API adapter for [`CompletionClient`]

use super::error::{AnthropicError, Result};
use super::protocol::{MessagesRequest, MessagesResponse, SystemBlock, error_message};
use super::sse::{SseParser, StreamAction, parse_stream_event};
use async_trait::async_trait;
use council_application::{
    CompletionClient, CompletionRequest, GatewayError, RequestKind, StreamHandle,
};
use council_domain::CompletionEvent;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Connection settings for [`AnthropicCompletionClient`].
#[derive(Debug, Clone)]
pub struct AnthropicSettings {
    pub api_key: String,
    pub base_url: String,
    pub api_version: String,
    /// Model used for advisor turns.
    pub advisor_model: String,
    /// Model used for consensus analysis and synthesis.
    pub moderator_model: String,
    /// Maximum silence between two stream chunks.
    pub idle_timeout: Duration,
}

impl AnthropicSettings {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.anthropic.com";
    pub const DEFAULT_API_VERSION: &'static str = "2023-06-01";

    /// Settings with the API key read from the environment variable `var`.
    pub fn from_env(
        var: &str,
        advisor_model: impl Into<String>,
        moderator_model: impl Into<String>,
    ) -> Result<Self> {
        let api_key = std::env::var(var)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AnthropicError::MissingApiKey(var.to_string()))?;
        Ok(Self {
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_version: Self::DEFAULT_API_VERSION.to_string(),
            advisor_model: advisor_model.into(),
            moderator_model: moderator_model.into(),
            idle_timeout: Duration::from_secs(60),
        })
    }
}

/// [`CompletionClient`] backed by the Anthropic Messages API.
pub struct AnthropicCompletionClient {
    http: reqwest::Client,
    settings: AnthropicSettings,
}

impl AnthropicCompletionClient {
    pub fn new(settings: AnthropicSettings) -> Result<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(AnthropicError::MissingApiKey("api_key".to_string()));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("advisor-council/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &AnthropicSettings {
        &self.settings
    }

    /// Advisors and the moderator may run on different models.
    pub fn model_for(&self, kind: RequestKind) -> &str {
        if kind.is_moderator() {
            &self.settings.moderator_model
        } else {
            &self.settings.advisor_model
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.settings.base_url.trim_end_matches('/'))
    }

    async fn send(&self, request: &CompletionRequest, stream: bool) -> Result<reqwest::Response> {
        let body = MessagesRequest {
            model: self.model_for(request.kind),
            max_tokens: request.max_tokens,
            system: vec![SystemBlock::text(
                &request.system_prompt,
                request.cache_system_prompt,
            )],
            messages: &request.messages,
            stream,
        };

        debug!(
            "POST {} kind={} model={} stream={}",
            self.endpoint(),
            request.kind,
            body.model,
            stream
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", &self.settings.api_version)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AnthropicError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }
        Ok(response)
    }

    async fn complete_inner(&self, request: &CompletionRequest) -> Result<String> {
        let response = self.send(request, false).await?;
        let body: MessagesResponse = serde_json::from_str(&response.text().await?)?;
        if body.stop_reason.as_deref() == Some("max_tokens") {
            warn!("{} response truncated at max_tokens", request.kind);
        }
        Ok(body.text())
    }
}

#[async_trait]
impl CompletionClient for AnthropicCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, GatewayError> {
        let text = self.complete_inner(request).await?;
        if text.trim().is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(text)
    }

    async fn complete_streaming(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<StreamHandle, GatewayError> {
        let response = self.send(request, true).await?;
        let idle_timeout = self.settings.idle_timeout;
        let (tx, rx) = mpsc::channel(64);

        tokio::spawn(async move {
            let outcome = pump_stream(response.bytes_stream(), idle_timeout, &tx).await;
            let last = match outcome {
                Ok(text) => CompletionEvent::Completed(text),
                Err(e) => {
                    warn!("Completion stream failed: {}", e);
                    CompletionEvent::Error(e.to_string())
                }
            };
            // Receiver gone means the caller stopped listening
            let _ = tx.send(last).await;
        });

        Ok(StreamHandle::new(rx))
    }
}

/// Forward text deltas until `message_stop`; returns the full text.
///
/// A body that ends before `message_stop` is a truncated answer and fails.
async fn pump_stream<S, B, E>(
    stream: S,
    idle_timeout: Duration,
    tx: &mpsc::Sender<CompletionEvent>,
) -> Result<String>
where
    S: futures::Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    AnthropicError: From<E>,
{
    let mut stream = std::pin::pin!(stream);
    let mut parser = SseParser::new();
    let mut full_text = String::new();

    loop {
        let next = tokio::time::timeout(idle_timeout, stream.next())
            .await
            .map_err(|_| AnthropicError::IdleTimeout(idle_timeout.as_secs()))?;

        let (events, finished) = match next {
            Some(chunk) => (parser.feed(chunk?.as_ref()), false),
            None => (parser.flush(), true),
        };

        for event in &events {
            match parse_stream_event(event) {
                Some(StreamAction::TextDelta(text)) => {
                    full_text.push_str(&text);
                    if tx.send(CompletionEvent::Delta(text)).await.is_err() {
                        return Ok(full_text);
                    }
                }
                Some(StreamAction::Stop) => return Ok(full_text),
                Some(StreamAction::Error(message)) => return Err(AnthropicError::Stream(message)),
                None => {}
            }
        }

        if finished {
            return Err(AnthropicError::Stream(
                "stream ended before message_stop".to_string(),
            ));
        }
    }
}
