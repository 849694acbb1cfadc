//! Application-level configuration.
//!
//! - [`DebateParams`]: call control for a debate (timeouts, token budgets, search breadth)

pub mod debate_params;

pub use debate_params::DebateParams;
