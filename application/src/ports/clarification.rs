//! Clarification policy port
//!
//! Before any model is called, a policy may decide the question is too vague
//! to debate and hand clarifying questions back to the user.

use async_trait::async_trait;
use council_domain::Question;

/// Decides whether a question needs clarification first.
#[async_trait]
pub trait ClarificationPolicy: Send + Sync {
    /// Clarifying questions for the user; empty when the question can be
    /// debated as is.
    async fn clarifying_questions(
        &self,
        question: &Question,
        prior_conversation: Option<&str>,
    ) -> Vec<String>;
}

/// Policy that never asks.
pub struct NoClarification;

#[async_trait]
impl ClarificationPolicy for NoClarification {
    async fn clarifying_questions(
        &self,
        _question: &Question,
        _prior_conversation: Option<&str>,
    ) -> Vec<String> {
        Vec::new()
    }
}
