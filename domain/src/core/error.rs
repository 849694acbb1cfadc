//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Unknown advisor: {0}")]
    UnknownAdvisor(String),

    #[error("Unknown debate mode: {0}")]
    UnknownMode(String),

    #[error("Unknown output format: {0}")]
    UnknownOutputFormat(String),

    #[error("A debate needs between {min} and {max} advisors, got {actual}")]
    AdvisorCount {
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Advisor selected more than once: {0}")]
    DuplicateAdvisor(String),

    #[error("Advisor {0} is not part of this debate")]
    AdvisorNotSelected(String),

    #[error("Round budget exhausted ({0} rounds)")]
    RoundBudgetExhausted(u32),

    #[error("Advisor {advisor} already responded in round {round}")]
    DuplicateTurn { advisor: String, round: u32 },

    #[error("No round in progress")]
    NoRoundInProgress,

    #[error("Research results can only be attached once, before round 1")]
    ResearchAlreadyAttached,

    #[error("Debate session already terminated")]
    AlreadyTerminated,
}

impl DomainError {
    /// Whether this error was caused by caller input rather than protocol state.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidQuestion(_)
                | DomainError::UnknownAdvisor(_)
                | DomainError::UnknownMode(_)
                | DomainError::UnknownOutputFormat(_)
                | DomainError::AdvisorCount { .. }
                | DomainError::DuplicateAdvisor(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisor_count_display() {
        let error = DomainError::AdvisorCount {
            min: 2,
            max: 5,
            actual: 1,
        };
        assert_eq!(
            error.to_string(),
            "A debate needs between 2 and 5 advisors, got 1"
        );
    }

    #[test]
    fn test_is_input_error() {
        assert!(DomainError::UnknownAdvisor("bob".to_string()).is_input_error());
        assert!(DomainError::InvalidQuestion("empty".to_string()).is_input_error());
        assert!(!DomainError::AlreadyTerminated.is_input_error());
        assert!(!DomainError::RoundBudgetExhausted(2).is_input_error());
    }
}
