//! Up-front cost estimate for a debate.
//!
//! Pure arithmetic over static per-message token averages. The numbers are
//! intentionally coarse: they tell the user roughly what a deep five-advisor
//! debate costs compared to a quick one, nothing more.

use serde::{Deserialize, Serialize};

use super::mode::DebateMode;

/// Average prompt tokens of an advisor turn (persona + question + context).
pub const AVG_ADVISOR_INPUT_TOKENS: u64 = 1_200;
/// Extra prompt tokens per other advisor quoted in later rounds.
pub const AVG_QUOTED_RESPONSE_TOKENS: u64 = 350;
/// Average completion tokens of an advisor turn.
pub const AVG_ADVISOR_OUTPUT_TOKENS: u64 = 400;
/// Average prompt tokens of the consensus analysis, per advisor quoted.
pub const AVG_CONSENSUS_INPUT_TOKENS_PER_ADVISOR: u64 = 450;
/// Average completion tokens of the consensus analysis.
pub const AVG_CONSENSUS_OUTPUT_TOKENS: u64 = 300;
/// Average completion tokens of the final synthesis.
pub const AVG_SYNTHESIS_OUTPUT_TOKENS: u64 = 800;

/// USD per million prompt tokens.
pub const INPUT_PRICE_PER_MTOK: f64 = 3.0;
/// USD per million completion tokens.
pub const OUTPUT_PRICE_PER_MTOK: f64 = 15.0;

/// Estimated size and price of a debate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Upper bound on completion calls (every round runs, every check runs).
    pub completion_calls: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub estimated_usd: f64,
}

impl CostEstimate {
    /// Worst-case estimate: every round of the budget is played.
    pub fn for_debate(mode: DebateMode, advisor_count: usize) -> Self {
        let rounds = u64::from(mode.max_rounds());
        let advisors = advisor_count as u64;
        let quoted = advisors.saturating_sub(1);

        let advisor_calls = rounds * advisors;
        let consensus_checks = rounds.saturating_sub(1);

        let mut input_tokens = advisor_calls * AVG_ADVISOR_INPUT_TOKENS;
        // Round 1 is unconditioned; later rounds quote every other advisor.
        input_tokens += rounds.saturating_sub(1) * advisors * quoted * AVG_QUOTED_RESPONSE_TOKENS;
        input_tokens += consensus_checks * advisors * AVG_CONSENSUS_INPUT_TOKENS_PER_ADVISOR;
        // Synthesis sees every advisor's full transcript.
        input_tokens += advisors * rounds * AVG_ADVISOR_OUTPUT_TOKENS;

        let output_tokens = advisor_calls * AVG_ADVISOR_OUTPUT_TOKENS
            + consensus_checks * AVG_CONSENSUS_OUTPUT_TOKENS
            + AVG_SYNTHESIS_OUTPUT_TOKENS;

        let estimated_usd = input_tokens as f64 / 1_000_000.0 * INPUT_PRICE_PER_MTOK
            + output_tokens as f64 / 1_000_000.0 * OUTPUT_PRICE_PER_MTOK;

        Self {
            completion_calls: (advisor_calls + consensus_checks + 1) as u32,
            input_tokens,
            output_tokens,
            estimated_usd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_debate_has_no_consensus_calls() {
        let estimate = CostEstimate::for_debate(DebateMode::Quick, 3);
        // 3 advisor turns + synthesis
        assert_eq!(estimate.completion_calls, 4);
        assert_eq!(
            estimate.output_tokens,
            3 * AVG_ADVISOR_OUTPUT_TOKENS + AVG_SYNTHESIS_OUTPUT_TOKENS
        );
    }

    #[test]
    fn test_deep_debate_call_count() {
        let estimate = CostEstimate::for_debate(DebateMode::Deep, 5);
        // 15 advisor turns + 2 consensus checks + synthesis
        assert_eq!(estimate.completion_calls, 18);
    }

    #[test]
    fn test_cost_grows_with_mode_and_advisors() {
        let quick = CostEstimate::for_debate(DebateMode::Quick, 2);
        let standard = CostEstimate::for_debate(DebateMode::Standard, 2);
        let deep_five = CostEstimate::for_debate(DebateMode::Deep, 5);
        assert!(quick.estimated_usd < standard.estimated_usd);
        assert!(standard.estimated_usd < deep_five.estimated_usd);
        assert!(quick.estimated_usd > 0.0);
    }
}
