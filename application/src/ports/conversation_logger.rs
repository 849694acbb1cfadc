//! Port for structured debate logging.
//!
//! Defines the [`ConversationLogger`] trait for recording every debate event
//! to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! debate transcript in a machine-readable format (JSONL).

use council_domain::StreamEvent;

/// Port for logging debate events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// The `log` method is synchronous and non-fallible so that a broken log
/// never disturbs the debate; write failures are dropped.
pub trait ConversationLogger: Send + Sync {
    /// Record a debate event.
    fn log(&self, event: &StreamEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: &StreamEvent) {}
}
