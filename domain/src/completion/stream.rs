//! Streaming events for completion calls.
//!
//! [`CompletionEvent`] represents individual events in a streaming completion,
//! enabling advisor text to be forwarded while it is being generated.

/// An event in a streaming completion.
///
/// Bridges infrastructure-level streaming (e.g. SSE chunks) to the
/// application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionEvent {
    /// A text chunk from the model.
    Delta(String),
    /// The complete response text (signals stream end).
    Completed(String),
    /// An error that occurred during streaming.
    Error(String),
}

impl CompletionEvent {
    /// Returns the text content if this is a Delta or Completed event.
    pub fn text(&self) -> Option<&str> {
        match self {
            CompletionEvent::Delta(s) | CompletionEvent::Completed(s) => Some(s),
            CompletionEvent::Error(_) => None,
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CompletionEvent::Completed(_) | CompletionEvent::Error(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_text_returns_content() {
        let event = CompletionEvent::Delta("hello".to_string());
        assert_eq!(event.text(), Some("hello"));
        assert!(!event.is_terminal());
    }

    #[test]
    fn completed_is_terminal() {
        let event = CompletionEvent::Completed("full response".to_string());
        assert_eq!(event.text(), Some("full response"));
        assert!(event.is_terminal());
    }

    #[test]
    fn error_has_no_text() {
        let event = CompletionEvent::Error("oops".to_string());
        assert_eq!(event.text(), None);
        assert!(event.is_terminal());
    }
}
