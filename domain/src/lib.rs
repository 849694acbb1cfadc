//! Domain layer for advisor-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A question is put to a small council of [`Advisor`] personas. Each advisor
//! speaks once per round, in a fixed order, and from round 2 on sees what the
//! others said last.
//!
//! ## Consensus
//!
//! After every round from the second on, a moderator judges agreement and
//! returns a [`ConsensusVerdict`]. The debate ends on consensus or when the
//! [`DebateMode`] round budget runs out; the moderator then writes the final
//! answer.

pub mod completion;
pub mod config;
pub mod consensus;
pub mod core;
pub mod debate;
pub mod persona;
pub mod prompt;
pub mod research;

// Re-export commonly used types
pub use completion::{CompletionEvent, Message, Role};
pub use config::OutputFormat;
pub use consensus::{ConsensusVerdict, MIN_RESPONSES_FOR_CONSENSUS, parse_consensus_response};
pub use core::{error::DomainError, question::Question};
pub use debate::{
    CostEstimate, DebateMode, DebateSession, EventPayload, MAX_ADVISORS, MIN_ADVISORS, Speaker,
    StreamEvent, Turn, validate_advisors,
};
pub use persona::{Advisor, Persona, PersonaDisplay, moderator};
pub use prompt::PromptTemplate;
pub use research::{MAX_RESEARCH_RESULTS, ResearchSource, research_query, should_research};
