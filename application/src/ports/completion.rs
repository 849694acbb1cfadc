//! Completion client port
//!
//! Defines the interface for asking a language model for text, either in one
//! piece or as a stream of chunks.

use async_trait::async_trait;
use council_domain::{CompletionEvent, Message};
use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during completion calls
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Empty response")]
    EmptyResponse,

    #[error("Timeout")]
    Timeout,

    #[error("Transport closed")]
    TransportClosed,

    #[error("Other error: {0}")]
    Other(String),
}

/// What a completion is for.
///
/// Adapters use it to pick a model: advisor turns go to the advisor model,
/// everything the moderator does goes to the moderator model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    AdvisorTurn,
    ConsensusAnalysis,
    Synthesis,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::AdvisorTurn => "advisor_turn",
            RequestKind::ConsensusAnalysis => "consensus_analysis",
            RequestKind::Synthesis => "synthesis",
        }
    }

    pub fn is_moderator(&self) -> bool {
        !matches!(self, RequestKind::AdvisorTurn)
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub kind: RequestKind,
    pub system_prompt: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    /// Ask the provider to cache the system prompt across calls.
    pub cache_system_prompt: bool,
}

impl CompletionRequest {
    pub const DEFAULT_MAX_TOKENS: u32 = 1024;

    /// A request with one user message.
    pub fn new(
        kind: RequestKind,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            system_prompt: system_prompt.into(),
            messages: vec![Message::user(user_prompt)],
            max_tokens: Self::DEFAULT_MAX_TOKENS,
            cache_system_prompt: false,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_cache_system_prompt(mut self, cache: bool) -> Self {
        self.cache_system_prompt = cache;
        self
    }
}

/// Handle for receiving streaming events from a completion.
///
/// Wraps an `mpsc::Receiver<CompletionEvent>` and provides convenience
/// methods for consuming the stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<CompletionEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<CompletionEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(self) -> Result<String, GatewayError> {
        self.forward(|_| {}).await
    }

    /// Consume the stream, handing every chunk to `on_chunk`, and return the
    /// full text.
    ///
    /// A stream that carries only a `Completed` event (the non-streaming
    /// fallback) is forwarded as one chunk.
    pub async fn forward<F>(mut self, mut on_chunk: F) -> Result<String, GatewayError>
    where
        F: FnMut(&str) + Send,
    {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                CompletionEvent::Delta(chunk) => {
                    if !chunk.is_empty() {
                        on_chunk(&chunk);
                        full_text.push_str(&chunk);
                    }
                }
                CompletionEvent::Completed(text) => {
                    if full_text.is_empty() {
                        if !text.is_empty() {
                            on_chunk(&text);
                        }
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                CompletionEvent::Error(e) => {
                    return Err(GatewayError::RequestFailed(e));
                }
            }
        }
        // Sender dropped before Completed: the answer is truncated
        Err(GatewayError::TransportClosed)
    }
}

/// Client for language model completions
///
/// This port defines how the application layer talks to a model provider.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a request and wait for the whole response.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;

    /// Send a request and get a streaming response.
    ///
    /// Default implementation calls `complete()` and wraps the result in a
    /// single `Completed` event, so non-streaming adapters work unchanged.
    async fn complete_streaming(
        &self,
        request: &CompletionRequest,
    ) -> Result<StreamHandle, GatewayError> {
        let result = self.complete(request).await?;
        let (tx, rx) = mpsc::channel(1);
        // If the receiver is already dropped there is nobody to tell
        let _ = tx.send(CompletionEvent::Completed(result)).await;
        Ok(StreamHandle::new(rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(events: Vec<CompletionEvent>) -> StreamHandle {
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            tx.try_send(event).unwrap();
        }
        StreamHandle::new(rx)
    }

    #[tokio::test]
    async fn test_forward_streams_deltas() {
        let stream = handle(vec![
            CompletionEvent::Delta("Hel".to_string()),
            CompletionEvent::Delta("lo".to_string()),
            CompletionEvent::Completed("Hello".to_string()),
        ]);
        let mut chunks = Vec::new();
        let text = stream.forward(|c| chunks.push(c.to_string())).await.unwrap();
        assert_eq!(text, "Hello");
        assert_eq!(chunks, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn test_forward_completed_only_is_one_chunk() {
        let stream = handle(vec![CompletionEvent::Completed("All at once".to_string())]);
        let mut chunks = Vec::new();
        let text = stream.forward(|c| chunks.push(c.to_string())).await.unwrap();
        assert_eq!(text, "All at once");
        assert_eq!(chunks, vec!["All at once"]);
    }

    #[tokio::test]
    async fn test_forward_error_event() {
        let stream = handle(vec![
            CompletionEvent::Delta("partial".to_string()),
            CompletionEvent::Error("overloaded".to_string()),
        ]);
        let err = stream.collect_text().await.unwrap_err();
        assert!(matches!(err, GatewayError::RequestFailed(ref m) if m == "overloaded"));
    }

    #[tokio::test]
    async fn test_closed_channel_without_completed_fails() {
        let stream = handle(vec![CompletionEvent::Delta("cut off".to_string())]);
        let mut chunks = Vec::new();
        let err = stream
            .forward(|c| chunks.push(c.to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::TransportClosed));
        assert_eq!(chunks, vec!["cut off"]);
    }

    struct Fixed;

    #[async_trait]
    impl CompletionClient for Fixed {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, GatewayError> {
            Ok("fixed".to_string())
        }
    }

    #[tokio::test]
    async fn test_default_streaming_fallback() {
        let request = CompletionRequest::new(RequestKind::Synthesis, "sys", "user");
        let text = Fixed
            .complete_streaming(&request)
            .await
            .unwrap()
            .collect_text()
            .await
            .unwrap();
        assert_eq!(text, "fixed");
    }

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new(RequestKind::AdvisorTurn, "sys", "hi")
            .with_max_tokens(42)
            .with_cache_system_prompt(true);
        assert_eq!(request.max_tokens, 42);
        assert!(request.cache_system_prompt);
        assert_eq!(request.messages, vec![Message::user("hi")]);
        assert!(!request.kind.is_moderator());
        assert!(RequestKind::Synthesis.is_moderator());
    }
}
