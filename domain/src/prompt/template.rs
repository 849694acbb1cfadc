//! Prompt templates for the debate flow

use crate::consensus::ConsensusVerdict;
use crate::consensus::parsing::{
    LABEL_AGREEMENT_LEVEL, LABEL_AGREEMENT_POINTS, LABEL_CONSENSUS, LABEL_DISAGREEMENT_POINTS,
    LABEL_MAJORITY_VIEW, LABEL_MINORITY_VIEW,
};
use crate::debate::{DebateSession, Speaker};
use crate::persona::Advisor;
use crate::research::ResearchSource;

/// Heading of the research section in advisor prompts.
pub const RESEARCH_HEADING: &str = "RESEARCH FINDINGS";

/// Heading of the cross-exposure section in advisor prompts.
pub const OTHER_ADVISORS_HEADING: &str = "OTHER ADVISORS' LATEST POSITIONS";

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// User prompt for one advisor turn.
    ///
    /// Round 1 is the advisor's unconditioned opening position. From round 2
    /// on the prompt quotes the latest position of every other advisor as of
    /// the moment this turn starts.
    pub fn advisor_turn(session: &DebateSession, advisor: Advisor) -> String {
        let round = session.current_round();
        let mut prompt = String::new();

        if let Some(prior) = session.prior_conversation() {
            prompt.push_str("EARLIER CONVERSATION (for context):\n");
            prompt.push_str(prior);
            prompt.push_str("\n\n");
        }

        prompt.push_str(&format!("QUESTION:\n{}\n", session.question()));

        let research = session.research_results();
        if !research.is_empty() {
            prompt.push('\n');
            prompt.push_str(&Self::research_section(research));
        }

        let others = session.other_latest_responses(advisor);
        if round > 1 && !others.is_empty() {
            prompt.push_str(&format!("\n{}:\n", OTHER_ADVISORS_HEADING));
            for (other, content) in &others {
                prompt.push_str(&format!("\n--- {} ---\n{}\n", other.name(), content));
            }
        }

        prompt.push_str(&format!(
            "\nThis is round {} of {}.\n",
            round,
            session.max_rounds()
        ));

        if round <= 1 {
            prompt.push_str(
                "Give your initial position on the question from your own perspective. \
State a clear recommendation.",
            );
        } else {
            prompt.push_str(
                "React to the other advisors. Say where you agree, where you disagree and why, \
and refine your recommendation. Do not repeat points already made unless you are changing them.",
            );
        }

        if !research.is_empty() {
            prompt.push_str(
                "\nCite research findings by their number, e.g. [1], when you rely on them.",
            );
        }

        prompt
    }

    /// Numbered citation block for research findings.
    pub fn research_section(sources: &[ResearchSource]) -> String {
        let mut section = format!("{}:\n", RESEARCH_HEADING);
        for (i, source) in sources.iter().enumerate() {
            section.push_str(&format!(
                "[{}] {} ({})\n    {}\n",
                i + 1,
                source.title,
                source.url,
                source.snippet
            ));
        }
        section
    }

    /// User prompt asking the moderator to judge agreement.
    pub fn consensus_prompt(session: &DebateSession) -> String {
        let mut prompt = format!(
            "QUESTION:\n{}\n\nLATEST ADVISOR POSITIONS (round {}):\n",
            session.question(),
            session.current_round()
        );

        for (advisor, content) in session.latest_responses() {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", advisor.name(), content));
        }

        prompt.push_str(&format!(
            r#"
Judge whether the advisors agree on the core recommendation. Minor differences in emphasis still count as consensus; a different recommendation does not.

Answer in exactly this format, each label on its own line:

{LABEL_CONSENSUS}: YES or NO
{LABEL_AGREEMENT_LEVEL}: a number from 0 to 100
{LABEL_AGREEMENT_POINTS}:
- point
{LABEL_DISAGREEMENT_POINTS}:
- point
{LABEL_MAJORITY_VIEW}: one sentence
{LABEL_MINORITY_VIEW}: one sentence, or NONE"#
        ));

        prompt
    }

    /// User prompt for the final answer.
    ///
    /// With a reached verdict the moderator writes up the agreed position;
    /// otherwise it frames the answer around the majority view and names the
    /// open disagreements.
    pub fn synthesis_prompt(session: &DebateSession, verdict: Option<&ConsensusVerdict>) -> String {
        let mut prompt = String::new();

        if let Some(prior) = session.prior_conversation() {
            prompt.push_str("EARLIER CONVERSATION (for context):\n");
            prompt.push_str(prior);
            prompt.push_str("\n\n");
        }

        prompt.push_str(&format!("QUESTION:\n{}\n", session.question()));

        let research = session.research_results();
        if !research.is_empty() {
            prompt.push('\n');
            prompt.push_str(&Self::research_section(research));
        }

        prompt.push_str("\nFULL DEBATE:\n");
        for advisor in session.advisors() {
            let turns = session
                .transcript()
                .iter()
                .filter(|t| t.speaker == Speaker::Advisor(*advisor));
            for turn in turns {
                prompt.push_str(&format!(
                    "\n--- {} (round {}) ---\n{}\n",
                    advisor.name(),
                    turn.round,
                    turn.content
                ));
            }
        }

        match verdict {
            Some(v) if v.reached => {
                prompt.push_str(&format!(
                    "\nThe council reached consensus ({}% agreement).\n",
                    v.agreement_percent()
                ));
                Self::push_points(&mut prompt, "Agreed points", &v.agreement_points);
                prompt.push_str(
                    "\nWrite the final answer as the council's shared recommendation. \
Lead with the recommendation, then the reasoning, then concrete next steps.",
                );
            }
            Some(v) => {
                prompt.push_str(&format!(
                    "\nThe council did not reach consensus ({}% agreement).\n",
                    v.agreement_percent()
                ));
                if !v.majority_view.is_empty() {
                    prompt.push_str(&format!("Majority view: {}\n", v.majority_view));
                }
                if let Some(minority) = &v.minority_view {
                    prompt.push_str(&format!("Minority view: {}\n", minority));
                }
                Self::push_points(&mut prompt, "Open disagreements", &v.disagreement_points);
                prompt.push_str(Self::MAJORITY_INSTRUCTION);
            }
            None => prompt.push_str(Self::MAJORITY_INSTRUCTION),
        }

        prompt
    }

    const MAJORITY_INSTRUCTION: &'static str = "\nWrite the final answer around the position most \
advisors support. Be explicit about where advisors still disagree and what would settle it. \
Lead with the recommendation, then the reasoning, then concrete next steps.";

    fn push_points(prompt: &mut String, heading: &str, points: &[String]) {
        if points.is_empty() {
            return;
        }
        prompt.push_str(&format!("{}:\n", heading));
        for point in points {
            prompt.push_str(&format!("- {}\n", point));
        }
    }
}
