//! Round executor
//!
//! Runs one debate round: every selected advisor speaks once, in order, and
//! each turn sees the answers already given earlier in the same round.

use crate::config::DebateParams;
use crate::ports::completion::{CompletionClient, CompletionRequest, RequestKind};
use crate::use_cases::run_debate::RunDebateError;
use crate::use_cases::shared::{EventEmitter, Interrupted, guarded};
use council_domain::{Advisor, DebateSession, EventPayload, PromptTemplate, StreamEvent};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Fewest successful advisor turns a round may end with.
pub const MIN_SUCCESSFUL_TURNS: usize = 2;

/// What happened in one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub round: u32,
    pub succeeded: Vec<Advisor>,
    pub failed: Vec<Advisor>,
}

/// Sequential executor for one debate round.
pub struct RoundExecutor<C: CompletionClient + ?Sized> {
    client: Arc<C>,
    params: DebateParams,
}

impl<C: CompletionClient + ?Sized> RoundExecutor<C> {
    pub fn new(client: Arc<C>, params: DebateParams) -> Self {
        Self { client, params }
    }

    /// Run the session's current round.
    ///
    /// The round must already have been started with
    /// [`DebateSession::begin_round`]. A failing advisor is reported and
    /// skipped; the round as a whole fails only when fewer than
    /// [`MIN_SUCCESSFUL_TURNS`] advisors got through.
    pub(crate) async fn run_round(
        &self,
        session: &mut DebateSession,
        events: &EventEmitter<'_>,
        token: &CancellationToken,
    ) -> Result<RoundSummary, RunDebateError> {
        let round = session.current_round();
        let advisors = session.advisors().to_vec();
        let mut summary = RoundSummary {
            round,
            succeeded: Vec::new(),
            failed: Vec::new(),
        };

        for advisor in advisors {
            events.payload(EventPayload::AgentStart { advisor, round });

            let success = match self.advisor_turn(session, advisor, events, token).await? {
                Some(content) => {
                    session.record_response(advisor, content)?;
                    info!(advisor = %advisor, round, "Advisor responded");
                    summary.succeeded.push(advisor);
                    true
                }
                None => {
                    summary.failed.push(advisor);
                    false
                }
            };

            events.payload(EventPayload::AgentComplete {
                advisor,
                round,
                success,
            });
        }

        if summary.succeeded.len() < MIN_SUCCESSFUL_TURNS {
            warn!(
                round,
                succeeded = summary.succeeded.len(),
                "Too few advisors responded"
            );
            return Err(RunDebateError::InsufficientResponses {
                succeeded: summary.succeeded.len(),
                required: MIN_SUCCESSFUL_TURNS,
            });
        }

        Ok(summary)
    }

    /// One streamed advisor call.
    ///
    /// Returns the full text, or `None` after reporting a failed turn. Only
    /// cancellation is an error.
    async fn advisor_turn(
        &self,
        session: &DebateSession,
        advisor: Advisor,
        events: &EventEmitter<'_>,
        token: &CancellationToken,
    ) -> Result<Option<String>, RunDebateError> {
        let request = CompletionRequest::new(
            RequestKind::AdvisorTurn,
            advisor.persona().system_prompt,
            PromptTemplate::advisor_turn(session, advisor),
        )
        .with_max_tokens(self.params.advisor_max_tokens)
        .with_cache_system_prompt(self.params.cache_system_prompt);

        let call = async {
            let stream = self.client.complete_streaming(&request).await?;
            stream
                .forward(|chunk| {
                    events.payload(EventPayload::AgentResponse {
                        advisor,
                        chunk: chunk.to_string(),
                    })
                })
                .await
        };

        let failure = match guarded(call, self.params.call_timeout, token).await {
            Ok(Ok(text)) if !text.trim().is_empty() => return Ok(Some(text)),
            Ok(Ok(_)) => "empty response".to_string(),
            Ok(Err(e)) => e.to_string(),
            Err(Interrupted::TimedOut(after)) => format!("timed out after {}s", after.as_secs()),
            Err(Interrupted::Cancelled) => return Err(RunDebateError::Cancelled),
        };

        warn!(advisor = %advisor, error = %failure, "Advisor turn failed");
        events.emit(StreamEvent::warning(
            format!("{} failed: {}", advisor.name(), failure),
            Some(advisor),
        ));
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::conversation_logger::NoConversationLogger;
    use crate::ports::event_sink::CollectingSink;
    use crate::use_cases::testing::{Reply, ScriptedClient, chunks, fail, text};
    use council_domain::{DebateMode, Question};
    use std::time::Duration;

    fn session(advisors: Vec<Advisor>) -> DebateSession {
        let mut session = DebateSession::new(
            Question::try_new("Should we open a Berlin office?").unwrap(),
            None,
            DebateMode::Standard,
            advisors,
        )
        .unwrap();
        session.begin_round().unwrap();
        session
    }

    fn three() -> Vec<Advisor> {
        vec![Advisor::Strategist, Advisor::Analyst, Advisor::Skeptic]
    }

    async fn run(
        client: Arc<ScriptedClient>,
        session: &mut DebateSession,
        params: DebateParams,
    ) -> (Result<RoundSummary, RunDebateError>, CollectingSink) {
        let sink = CollectingSink::new();
        let token = CancellationToken::new();
        let result = {
            let events = EventEmitter::new(&sink, &NoConversationLogger, &token);
            RoundExecutor::new(client, params)
                .run_round(session, &events, &token)
                .await
        };
        (result, sink)
    }

    #[tokio::test]
    async fn test_all_advisors_speak_in_order() {
        let client = ScriptedClient::new(vec![
            chunks(&["Expand ", "now."]),
            text("The numbers say wait."),
            text("Too risky."),
        ]);
        let mut s = session(three());
        let (result, sink) = run(client.clone(), &mut s, DebateParams::default()).await;

        let summary = result.unwrap();
        assert_eq!(summary.succeeded, three());
        assert!(summary.failed.is_empty());
        assert_eq!(s.latest_response(Advisor::Strategist), Some("Expand now."));
        assert_eq!(
            sink.kinds(),
            vec![
                "agent_start",
                "agent_response",
                "agent_response",
                "agent_complete",
                "agent_start",
                "agent_response",
                "agent_complete",
                "agent_start",
                "agent_response",
                "agent_complete",
            ]
        );

        let requests = client.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(
            requests[0].system_prompt,
            Advisor::Strategist.persona().system_prompt
        );
        assert!(requests.iter().all(|r| r.kind == RequestKind::AdvisorTurn));
    }

    #[tokio::test]
    async fn test_later_advisor_sees_earlier_answer_of_same_round() {
        let client = ScriptedClient::new(vec![
            text("S1"),
            text("A1"),
            text("K1"),
            text("S2-fresh"),
            text("A2"),
            text("K2"),
        ]);
        let mut s = session(three());
        let (result, _) = run(client.clone(), &mut s, DebateParams::default()).await;
        result.unwrap();

        s.begin_round().unwrap();
        let (result, _) = run(client.clone(), &mut s, DebateParams::default()).await;
        result.unwrap();

        let requests = client.requests();
        let analyst_round_two = &requests[4].messages[0].content;
        assert!(analyst_round_two.contains("S2-fresh"));
        assert!(!analyst_round_two.contains("S1"));
        assert!(analyst_round_two.contains("K1"));
    }

    #[tokio::test]
    async fn test_single_failure_does_not_abort_round() {
        let client = ScriptedClient::new(vec![text("Yes."), fail("overloaded"), text("No.")]);
        let mut s = session(three());
        let (result, sink) = run(client, &mut s, DebateParams::default()).await;

        let summary = result.unwrap();
        assert_eq!(summary.failed, vec![Advisor::Analyst]);
        assert_eq!(s.responses_of(Advisor::Analyst).len(), 0);

        let events = sink.events();
        let error_index = events
            .iter()
            .position(|e| e.kind() == "error")
            .expect("error event");
        assert!(matches!(
            &events[error_index].payload,
            EventPayload::Error { advisor: Some(Advisor::Analyst), fatal: false, message }
                if message.contains("overloaded")
        ));
        assert!(matches!(
            events[error_index + 1].payload,
            EventPayload::AgentComplete {
                advisor: Advisor::Analyst,
                success: false,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_empty_response_counts_as_failure() {
        let client = ScriptedClient::new(vec![Reply::Empty, text("A"), text("K")]);
        let mut s = session(three());
        let (result, _) = run(client, &mut s, DebateParams::default()).await;
        assert_eq!(result.unwrap().failed, vec![Advisor::Strategist]);
    }

    #[tokio::test]
    async fn test_too_few_successes_is_fatal() {
        let client = ScriptedClient::new(vec![text("Only me."), fail("x"), fail("y")]);
        let mut s = session(three());
        let (result, _) = run(client, &mut s, DebateParams::default()).await;
        assert!(matches!(
            result,
            Err(RunDebateError::InsufficientResponses {
                succeeded: 1,
                required: 2
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_a_failed_turn() {
        let client = ScriptedClient::new(vec![Reply::Hang, text("A"), text("K")]);
        let mut s = session(three());
        let params = DebateParams::default().with_call_timeout(Duration::from_secs(3));
        let (result, sink) = run(client, &mut s, params).await;

        assert_eq!(result.unwrap().failed, vec![Advisor::Strategist]);
        assert!(sink.events().iter().any(|e| matches!(
            &e.payload,
            EventPayload::Error { message, .. } if message.contains("timed out after 3s")
        )));
    }

    #[tokio::test]
    async fn test_cancelled_round_stops() {
        let client = ScriptedClient::new(vec![text("S"), text("A"), text("K")]);
        let mut s = session(three());
        let sink = CollectingSink::new();
        let token = CancellationToken::new();
        token.cancel();
        let events = EventEmitter::new(&sink, &NoConversationLogger, &token);

        let result = RoundExecutor::new(client.clone(), DebateParams::default())
            .run_round(&mut s, &events, &token)
            .await;
        assert!(matches!(result, Err(RunDebateError::Cancelled)));
        assert!(sink.events().is_empty());
    }
}
