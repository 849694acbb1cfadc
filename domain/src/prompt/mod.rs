//! Prompt domain
//!
//! Templates for every completion the debate makes: advisor turns, the
//! moderator's consensus analysis and the final synthesis. System prompts
//! come from the [`persona`](crate::persona) registry.

mod template;

pub use template::{OTHER_ADVISORS_HEADING, PromptTemplate, RESEARCH_HEADING};
