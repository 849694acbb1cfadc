//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod clarification;
pub mod completion;
pub mod conversation_logger;
pub mod event_sink;
pub mod search;
