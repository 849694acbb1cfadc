//! Consensus domain
//!
//! A [`ConsensusVerdict`] is the moderator's judgement of agreement among the
//! advisors' latest responses. [`parsing`] turns the moderator's free-text
//! reply into a verdict, one field at a time.

pub mod parsing;
pub mod verdict;

/// Minimum number of non-empty advisor responses worth analysing.
pub const MIN_RESPONSES_FOR_CONSENSUS: usize = 3;

pub use parsing::parse_consensus_response;
pub use verdict::ConsensusVerdict;
