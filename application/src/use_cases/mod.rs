//! Use cases
//!
//! Application-level operations that orchestrate domain logic.
//!
//! [`run_debate`] is the entry point; the research gate, round executor and
//! consensus analyzer are its steps.

pub mod consensus_analyzer;
pub mod research_gate;
pub mod round_executor;
pub mod run_debate;
pub(crate) mod shared;

#[cfg(test)]
pub(crate) mod testing;
