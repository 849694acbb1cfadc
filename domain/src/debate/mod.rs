//! Debate domain
//!
//! - [`DebateSession`]: the aggregate one orchestrator run owns and mutates
//! - [`DebateMode`]: round budget selection
//! - [`StreamEvent`]: lifecycle events emitted to the caller
//! - [`CostEstimate`]: up-front token and price estimate

pub mod cost;
pub mod event;
pub mod mode;
pub mod session;

pub use cost::CostEstimate;
pub use event::{EventPayload, StreamEvent};
pub use mode::DebateMode;
pub use session::{DebateSession, MAX_ADVISORS, MIN_ADVISORS, Speaker, Turn, validate_advisors};
