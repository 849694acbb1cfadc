//! Debate lifecycle events.
//!
//! [`StreamEvent`] is the externally observable unit of progress. Events are
//! emitted in execution order; callers rebuild "who is speaking" from that
//! order alone, so it must never be shuffled or batched.
//!
//! Serialized as a flat JSON object with a snake_case `type` tag and a
//! `timestamp`, e.g. `{"type":"agent_start","advisor":"analyst","round":1,...}`.

use crate::consensus::ConsensusVerdict;
use crate::persona::Advisor;
use crate::research::ResearchSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cost::CostEstimate;

/// Kind-specific payload of a [`StreamEvent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    /// Emitted once, before any model call.
    CostEstimate(CostEstimate),
    ResearchStart {
        query: String,
    },
    ResearchResults {
        sources: Vec<ResearchSource>,
    },
    ResearchComplete {
        source_count: usize,
    },
    AgentStart {
        advisor: Advisor,
        round: u32,
    },
    /// One streamed text chunk of the advisor currently speaking.
    AgentResponse {
        advisor: Advisor,
        chunk: String,
    },
    AgentComplete {
        advisor: Advisor,
        round: u32,
        success: bool,
    },
    ModeratorAnalysis {
        message: String,
    },
    ConsensusCheck {
        round: u32,
    },
    ConsensusResult(ConsensusVerdict),
    ClarificationNeeded {
        questions: Vec<String>,
    },
    FinalAnswer {
        content: String,
        consensus_reached: bool,
    },
    Status {
        message: String,
    },
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        advisor: Option<Advisor>,
        fatal: bool,
    },
}

/// A timestamped debate event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl StreamEvent {
    /// Stamp a payload with the current time.
    pub fn now(payload: EventPayload) -> Self {
        Self {
            timestamp: Utc::now(),
            payload,
        }
    }

    /// The snake_case kind tag, as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match &self.payload {
            EventPayload::CostEstimate(_) => "cost_estimate",
            EventPayload::ResearchStart { .. } => "research_start",
            EventPayload::ResearchResults { .. } => "research_results",
            EventPayload::ResearchComplete { .. } => "research_complete",
            EventPayload::AgentStart { .. } => "agent_start",
            EventPayload::AgentResponse { .. } => "agent_response",
            EventPayload::AgentComplete { .. } => "agent_complete",
            EventPayload::ModeratorAnalysis { .. } => "moderator_analysis",
            EventPayload::ConsensusCheck { .. } => "consensus_check",
            EventPayload::ConsensusResult(_) => "consensus_result",
            EventPayload::ClarificationNeeded { .. } => "clarification_needed",
            EventPayload::FinalAnswer { .. } => "final_answer",
            EventPayload::Status { .. } => "status",
            EventPayload::Error { .. } => "error",
        }
    }

    pub fn status(message: impl Into<String>) -> Self {
        Self::now(EventPayload::Status {
            message: message.into(),
        })
    }

    pub fn moderator_analysis(message: impl Into<String>) -> Self {
        Self::now(EventPayload::ModeratorAnalysis {
            message: message.into(),
        })
    }

    /// A failure that the debate survives.
    pub fn warning(message: impl Into<String>, advisor: Option<Advisor>) -> Self {
        Self::now(EventPayload::Error {
            message: message.into(),
            advisor,
            fatal: false,
        })
    }

    /// A failure that ends the debate.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::now(EventPayload::Error {
            message: message.into(),
            advisor: None,
            fatal: true,
        })
    }

    /// Whether this event ends the stream (final answer or fatal error).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.payload,
            EventPayload::FinalAnswer { .. }
                | EventPayload::ClarificationNeeded { .. }
                | EventPayload::Error { fatal: true, .. }
        )
    }
}
