//! Debate session aggregate

use crate::consensus::ConsensusVerdict;
use crate::core::error::DomainError;
use crate::core::question::Question;
use crate::persona::Advisor;
use crate::research::ResearchSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::mode::DebateMode;

/// Fewest advisors a debate may seat.
pub const MIN_ADVISORS: usize = 2;
/// Most advisors a debate may seat.
pub const MAX_ADVISORS: usize = 5;

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Advisor(Advisor),
    Moderator,
}

/// One entry of the append-only transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub content: String,
    /// Round the turn belongs to; the question is round 0.
    pub round: u32,
    pub timestamp: DateTime<Utc>,
}

/// State of one debate (Aggregate Root)
///
/// Owned by exactly one orchestrator invocation. All mutation goes through
/// methods that keep the invariants:
///
/// - `current_round <= max_rounds`
/// - every advisor has at most `current_round` responses
/// - research is attached at most once, before round 1
/// - `final_answer` is set exactly once, and a session with a final answer
///   is terminated and accepts no further changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateSession {
    id: String,
    question: Question,
    #[serde(skip_serializing_if = "Option::is_none")]
    prior_conversation: Option<String>,
    mode: DebateMode,
    advisors: Vec<Advisor>,
    transcript: Vec<Turn>,
    current_round: u32,
    max_rounds: u32,
    advisor_responses: BTreeMap<Advisor, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    research_results: Option<Vec<ResearchSource>>,
    consensus_reached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_verdict: Option<ConsensusVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    final_answer: Option<String>,
    created_at: DateTime<Utc>,
}

impl DebateSession {
    /// Create a session, validating the advisor selection.
    ///
    /// The selection must hold between [`MIN_ADVISORS`] and [`MAX_ADVISORS`]
    /// distinct advisors; its order is the speaking order of every round.
    pub fn new(
        question: Question,
        prior_conversation: Option<String>,
        mode: DebateMode,
        advisors: Vec<Advisor>,
    ) -> Result<Self, DomainError> {
        validate_advisors(&advisors)?;

        let created_at = Utc::now();
        let transcript = vec![Turn {
            speaker: Speaker::User,
            content: question.content().to_string(),
            round: 0,
            timestamp: created_at,
        }];

        Ok(Self {
            id: format!("debate-{}", created_at.format("%Y%m%d-%H%M%S%3f")),
            question,
            prior_conversation: prior_conversation.filter(|p| !p.trim().is_empty()),
            mode,
            advisor_responses: advisors.iter().map(|a| (*a, Vec::new())).collect(),
            advisors,
            transcript,
            current_round: 0,
            max_rounds: mode.max_rounds(),
            research_results: None,
            consensus_reached: false,
            last_verdict: None,
            final_answer: None,
            created_at,
        })
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn prior_conversation(&self) -> Option<&str> {
        self.prior_conversation.as_deref()
    }

    pub fn mode(&self) -> DebateMode {
        self.mode
    }

    /// Selected advisors in speaking order.
    pub fn advisors(&self) -> &[Advisor] {
        &self.advisors
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Attached research, or an empty slice when none was found or requested.
    pub fn research_results(&self) -> &[ResearchSource] {
        self.research_results.as_deref().unwrap_or(&[])
    }

    pub fn consensus_reached(&self) -> bool {
        self.consensus_reached
    }

    pub fn last_verdict(&self) -> Option<&ConsensusVerdict> {
        self.last_verdict.as_ref()
    }

    pub fn final_answer(&self) -> Option<&str> {
        self.final_answer.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_terminated(&self) -> bool {
        self.final_answer.is_some()
    }

    /// Whether another round fits in the budget.
    pub fn has_rounds_remaining(&self) -> bool {
        self.current_round < self.max_rounds
    }

    /// Every utterance of an advisor, in round order.
    pub fn responses_of(&self, advisor: Advisor) -> &[String] {
        self.advisor_responses
            .get(&advisor)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The advisor's most recent utterance, if any.
    pub fn latest_response(&self, advisor: Advisor) -> Option<&str> {
        self.responses_of(advisor).last().map(String::as_str)
    }

    /// Latest non-empty utterance of every advisor, in speaking order.
    pub fn latest_responses(&self) -> Vec<(Advisor, &str)> {
        self.advisors
            .iter()
            .filter_map(|a| {
                self.latest_response(*a)
                    .filter(|r| !r.trim().is_empty())
                    .map(|r| (*a, r))
            })
            .collect()
    }

    /// Latest utterances of every advisor except `advisor`.
    ///
    /// Read at the moment a turn begins, so advisors that already spoke in
    /// the current round contribute their answer from this round.
    pub fn other_latest_responses(&self, advisor: Advisor) -> Vec<(Advisor, &str)> {
        self.latest_responses()
            .into_iter()
            .filter(|(a, _)| *a != advisor)
            .collect()
    }

    /// Whether the advisor already has a response for the current round.
    pub fn has_responded_this_round(&self, advisor: Advisor) -> bool {
        self.current_round > 0
            && self
                .transcript
                .iter()
                .rev()
                .take_while(|t| t.round == self.current_round)
                .any(|t| t.speaker == Speaker::Advisor(advisor))
    }

    // ==================== Mutators ====================

    /// Attach research findings. Allowed once, before round 1.
    pub fn attach_research(&mut self, results: Vec<ResearchSource>) -> Result<(), DomainError> {
        self.ensure_active()?;
        if self.research_results.is_some() || self.current_round > 0 {
            return Err(DomainError::ResearchAlreadyAttached);
        }
        self.research_results = Some(results);
        Ok(())
    }

    /// Start the next round and return its number (1-based).
    pub fn begin_round(&mut self) -> Result<u32, DomainError> {
        self.ensure_active()?;
        if !self.has_rounds_remaining() {
            return Err(DomainError::RoundBudgetExhausted(self.max_rounds));
        }
        self.current_round += 1;
        Ok(self.current_round)
    }

    /// Append an advisor's utterance for the current round.
    pub fn record_response(
        &mut self,
        advisor: Advisor,
        content: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.ensure_active()?;
        if self.current_round == 0 {
            return Err(DomainError::NoRoundInProgress);
        }
        if self.has_responded_this_round(advisor) {
            return Err(DomainError::DuplicateTurn {
                advisor: advisor.to_string(),
                round: self.current_round,
            });
        }
        let responses = self
            .advisor_responses
            .get_mut(&advisor)
            .ok_or_else(|| DomainError::AdvisorNotSelected(advisor.to_string()))?;

        let content = content.into();
        responses.push(content.clone());
        self.transcript.push(Turn {
            speaker: Speaker::Advisor(advisor),
            content,
            round: self.current_round,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Remember the latest consensus verdict.
    pub fn record_verdict(&mut self, verdict: ConsensusVerdict) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.consensus_reached = verdict.reached;
        self.last_verdict = Some(verdict);
        Ok(())
    }

    /// Set the final answer and terminate the session.
    pub fn finalize(&mut self, answer: impl Into<String>) -> Result<(), DomainError> {
        self.ensure_active()?;
        let answer = answer.into();
        self.transcript.push(Turn {
            speaker: Speaker::Moderator,
            content: answer.clone(),
            round: self.current_round,
            timestamp: Utc::now(),
        });
        self.final_answer = Some(answer);
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), DomainError> {
        if self.is_terminated() {
            return Err(DomainError::AlreadyTerminated);
        }
        Ok(())
    }
}

/// Check an advisor selection for size and duplicates.
pub fn validate_advisors(advisors: &[Advisor]) -> Result<(), DomainError> {
    if !(MIN_ADVISORS..=MAX_ADVISORS).contains(&advisors.len()) {
        return Err(DomainError::AdvisorCount {
            min: MIN_ADVISORS,
            max: MAX_ADVISORS,
            actual: advisors.len(),
        });
    }
    for (i, advisor) in advisors.iter().enumerate() {
        if advisors[..i].contains(advisor) {
            return Err(DomainError::DuplicateAdvisor(advisor.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(mode: DebateMode, advisors: Vec<Advisor>) -> DebateSession {
        DebateSession::new(
            Question::try_new("Should we open an office in Berlin?").unwrap(),
            None,
            mode,
            advisors,
        )
        .unwrap()
    }

    fn trio() -> Vec<Advisor> {
        vec![Advisor::Strategist, Advisor::Analyst, Advisor::Skeptic]
    }

    #[test]
    fn test_new_session_state() {
        let s = session(DebateMode::Standard, trio());
        assert_eq!(s.current_round(), 0);
        assert_eq!(s.max_rounds(), 2);
        assert!(!s.is_terminated());
        assert!(!s.consensus_reached());
        assert!(s.research_results().is_empty());
        assert_eq!(s.transcript().len(), 1);
        assert_eq!(s.transcript()[0].speaker, Speaker::User);
    }

    #[test]
    fn test_advisor_count_validation() {
        let q = Question::try_new("q").unwrap();
        let one = DebateSession::new(q.clone(), None, DebateMode::Quick, vec![Advisor::Analyst]);
        assert!(matches!(one, Err(DomainError::AdvisorCount { actual: 1, .. })));

        let six = {
            let mut v = Advisor::ALL.to_vec();
            v.push(Advisor::Analyst);
            v
        };
        let too_many = DebateSession::new(q.clone(), None, DebateMode::Quick, six);
        assert!(matches!(too_many, Err(DomainError::AdvisorCount { actual: 6, .. })));

        let five = DebateSession::new(q, None, DebateMode::Quick, Advisor::ALL.to_vec());
        assert!(five.is_ok());
    }

    #[test]
    fn test_duplicate_advisor_rejected() {
        let result = validate_advisors(&[Advisor::Analyst, Advisor::Skeptic, Advisor::Analyst]);
        assert_eq!(
            result,
            Err(DomainError::DuplicateAdvisor("analyst".to_string()))
        );
    }

    #[test]
    fn test_round_budget_is_enforced() {
        let mut s = session(DebateMode::Quick, trio());
        assert_eq!(s.begin_round().unwrap(), 1);
        assert_eq!(s.begin_round(), Err(DomainError::RoundBudgetExhausted(1)));
        assert_eq!(s.current_round(), 1);
    }

    #[test]
    fn test_record_response_requires_round() {
        let mut s = session(DebateMode::Standard, trio());
        assert_eq!(
            s.record_response(Advisor::Analyst, "hi"),
            Err(DomainError::NoRoundInProgress)
        );
    }

    #[test]
    fn test_one_response_per_round() {
        let mut s = session(DebateMode::Standard, trio());
        s.begin_round().unwrap();
        s.record_response(Advisor::Analyst, "first").unwrap();
        assert!(matches!(
            s.record_response(Advisor::Analyst, "again"),
            Err(DomainError::DuplicateTurn { round: 1, .. })
        ));
        s.begin_round().unwrap();
        s.record_response(Advisor::Analyst, "second").unwrap();
        assert_eq!(s.responses_of(Advisor::Analyst), ["first", "second"]);
        assert_eq!(s.latest_response(Advisor::Analyst), Some("second"));
    }

    #[test]
    fn test_duplicate_after_missed_round() {
        let mut s = session(DebateMode::Deep, trio());
        s.begin_round().unwrap();
        s.record_response(Advisor::Strategist, "strategist one").unwrap();
        s.begin_round().unwrap();
        assert!(!s.has_responded_this_round(Advisor::Analyst));
        s.record_response(Advisor::Analyst, "analyst two").unwrap();
        assert!(s.has_responded_this_round(Advisor::Analyst));
        assert!(matches!(
            s.record_response(Advisor::Analyst, "analyst again"),
            Err(DomainError::DuplicateTurn { round: 2, .. })
        ));
        assert_eq!(s.responses_of(Advisor::Analyst), ["analyst two"]);
    }

    #[test]
    fn test_unselected_advisor_rejected() {
        let mut s = session(DebateMode::Standard, trio());
        s.begin_round().unwrap();
        assert_eq!(
            s.record_response(Advisor::Innovator, "hello"),
            Err(DomainError::AdvisorNotSelected("innovator".to_string()))
        );
    }

    #[test]
    fn test_other_latest_responses_sees_current_round() {
        let mut s = session(DebateMode::Standard, trio());
        s.begin_round().unwrap();
        for a in trio() {
            s.record_response(a, format!("{a} round one")).unwrap();
        }
        s.begin_round().unwrap();
        s.record_response(Advisor::Strategist, "strategist round two")
            .unwrap();

        let others = s.other_latest_responses(Advisor::Analyst);
        assert_eq!(
            others,
            vec![
                (Advisor::Strategist, "strategist round two"),
                (Advisor::Skeptic, "skeptic round one"),
            ]
        );
    }

    #[test]
    fn test_latest_responses_skips_empty() {
        let mut s = session(DebateMode::Standard, trio());
        s.begin_round().unwrap();
        s.record_response(Advisor::Strategist, "   ").unwrap();
        s.record_response(Advisor::Analyst, "content").unwrap();
        assert_eq!(s.latest_responses(), vec![(Advisor::Analyst, "content")]);
    }

    #[test]
    fn test_research_attached_once_before_round_one() {
        let mut s = session(DebateMode::Standard, trio());
        s.attach_research(vec![ResearchSource::new("t", "https://x", "s")])
            .unwrap();
        assert_eq!(s.research_results().len(), 1);
        assert_eq!(
            s.attach_research(vec![]),
            Err(DomainError::ResearchAlreadyAttached)
        );

        let mut late = session(DebateMode::Standard, trio());
        late.begin_round().unwrap();
        assert_eq!(
            late.attach_research(vec![]),
            Err(DomainError::ResearchAlreadyAttached)
        );
    }

    #[test]
    fn test_finalize_terminates() {
        let mut s = session(DebateMode::Quick, trio());
        s.begin_round().unwrap();
        s.finalize("Go to Berlin.").unwrap();
        assert!(s.is_terminated());
        assert_eq!(s.final_answer(), Some("Go to Berlin."));
        assert_eq!(s.finalize("again"), Err(DomainError::AlreadyTerminated));
        assert_eq!(s.begin_round(), Err(DomainError::AlreadyTerminated));
        assert_eq!(
            s.transcript().last().map(|t| t.speaker),
            Some(Speaker::Moderator)
        );
    }

    #[test]
    fn test_record_verdict_sets_flag() {
        let mut s = session(DebateMode::Standard, trio());
        let verdict = ConsensusVerdict {
            reached: true,
            agreement_level: 0.9,
            ..Default::default()
        };
        s.record_verdict(verdict).unwrap();
        assert!(s.consensus_reached());
        assert_eq!(s.last_verdict().map(|v| v.agreement_level), Some(0.9));
    }

    #[test]
    fn test_blank_prior_conversation_is_dropped() {
        let s = DebateSession::new(
            Question::try_new("q").unwrap(),
            Some("   ".to_string()),
            DebateMode::Quick,
            trio(),
        )
        .unwrap();
        assert!(s.prior_conversation().is_none());
    }

    #[test]
    fn test_session_serializes() {
        let s = session(DebateMode::Deep, trio());
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["mode"], "deep");
        assert_eq!(json["max_rounds"], 3);
        assert!(json["advisor_responses"]["analyst"].is_array());
    }
}
