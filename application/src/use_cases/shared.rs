//! Shared utilities for use cases.
//!
//! Contains cancellation checking, the timeout/cancel guard every external
//! call runs under, and the event emitter the debate use cases report
//! through.

use crate::ports::conversation_logger::ConversationLogger;
use crate::ports::event_sink::EventSink;
use crate::use_cases::run_debate::RunDebateError;
use council_domain::{EventPayload, StreamEvent};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Why a guarded call did not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interrupted {
    Cancelled,
    TimedOut(Duration),
}

/// Check if cancellation has been requested.
///
/// Returns `Err(RunDebateError::Cancelled)` if the token is cancelled.
pub(crate) fn check_cancelled(token: &CancellationToken) -> Result<(), RunDebateError> {
    if token.is_cancelled() {
        return Err(RunDebateError::Cancelled);
    }
    Ok(())
}

/// Run an external call under the per-call timeout, racing cancellation.
///
/// Cancellation wins ties, so nothing is reported after a cancel.
pub(crate) async fn guarded<F, T>(
    call: F,
    timeout: Duration,
    token: &CancellationToken,
) -> Result<T, Interrupted>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Interrupted::Cancelled),
        result = tokio::time::timeout(timeout, call) => {
            result.map_err(|_| Interrupted::TimedOut(timeout))
        }
    }
}

/// Fan-out point for debate events.
///
/// Every event goes to the conversation logger and then the sink. Once the
/// token is cancelled nothing more is emitted.
pub(crate) struct EventEmitter<'a> {
    sink: &'a dyn EventSink,
    logger: &'a dyn ConversationLogger,
    token: &'a CancellationToken,
}

impl<'a> EventEmitter<'a> {
    pub(crate) fn new(
        sink: &'a dyn EventSink,
        logger: &'a dyn ConversationLogger,
        token: &'a CancellationToken,
    ) -> Self {
        Self {
            sink,
            logger,
            token,
        }
    }

    pub(crate) fn emit(&self, event: StreamEvent) {
        if self.token.is_cancelled() {
            return;
        }
        self.logger.log(&event);
        self.sink.emit(event);
    }

    pub(crate) fn payload(&self, payload: EventPayload) {
        self.emit(StreamEvent::now(payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::conversation_logger::NoConversationLogger;
    use crate::ports::event_sink::CollectingSink;

    #[tokio::test]
    async fn test_guarded_returns_value() {
        let token = CancellationToken::new();
        let value = guarded(async { 7 }, Duration::from_secs(1), &token).await;
        assert_eq!(value, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_guarded_times_out() {
        let token = CancellationToken::new();
        let result = guarded(
            tokio::time::sleep(Duration::from_secs(10)),
            Duration::from_secs(2),
            &token,
        )
        .await;
        assert_eq!(result, Err(Interrupted::TimedOut(Duration::from_secs(2))));
    }

    #[tokio::test]
    async fn test_guarded_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let result = guarded(async { 1 }, Duration::from_secs(1), &token).await;
        assert_eq!(result, Err(Interrupted::Cancelled));
        assert!(matches!(
            check_cancelled(&token),
            Err(RunDebateError::Cancelled)
        ));
    }

    #[test]
    fn test_emitter_goes_quiet_after_cancel() {
        let sink = CollectingSink::new();
        let token = CancellationToken::new();
        let emitter = EventEmitter::new(&sink, &NoConversationLogger, &token);

        emitter.emit(StreamEvent::status("before"));
        token.cancel();
        emitter.emit(StreamEvent::status("after"));

        assert_eq!(sink.events().len(), 1);
    }
}
