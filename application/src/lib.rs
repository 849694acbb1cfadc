//! Application layer for advisor-council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DebateParams;
pub use ports::{
    clarification::{ClarificationPolicy, NoClarification},
    completion::{CompletionClient, CompletionRequest, GatewayError, RequestKind, StreamHandle},
    conversation_logger::{ConversationLogger, NoConversationLogger},
    event_sink::{ChannelEventSink, CollectingSink, EventSink, NoEvents},
    search::{SearchClient, SearchError},
};
pub use use_cases::consensus_analyzer::{ConsensusAnalysisError, ConsensusAnalyzer};
pub use use_cases::research_gate::ResearchGate;
pub use use_cases::round_executor::{MIN_SUCCESSFUL_TURNS, RoundExecutor, RoundSummary};
pub use use_cases::run_debate::{
    DebateHandle, DebateOptions, DebateOutcome, RunDebateError, RunDebateInput, RunDebateUseCase,
};
