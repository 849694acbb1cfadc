//! Console output formatter for debate results

use colored::Colorize;
use council_domain::{Advisor, DebateSession, OutputFormat, Speaker, moderator};

/// Formats concluded debates for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a concluded session in the requested format
    pub fn render(session: &DebateSession, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(session),
            OutputFormat::Answer => Self::format_answer_only(session),
            OutputFormat::Json => Self::format_json(session),
        }
    }

    /// Format the complete debate transcript
    pub fn format(session: &DebateSession) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Advisor Council"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            session.question()
        ));

        output.push_str(&format!(
            "{} {}\n",
            "Advisors:".cyan().bold(),
            Self::advisor_names(session.advisors())
        ));
        output.push_str(&format!(
            "{} {} ({} of {} rounds played)\n",
            "Mode:".cyan().bold(),
            session.mode(),
            session.current_round(),
            session.max_rounds()
        ));

        if !session.research_results().is_empty() {
            output.push_str(&Self::section_header("Research"));
            for (i, source) in session.research_results().iter().enumerate() {
                output.push_str(&format!(
                    "[{}] {} {}\n",
                    i + 1,
                    source.title.bold(),
                    source.url.dimmed()
                ));
            }
        }

        for round in 1..=session.current_round() {
            output.push_str(&Self::section_header(&format!("Round {}", round)));
            for turn in session.transcript().iter().filter(|t| t.round == round) {
                if let Speaker::Advisor(advisor) = turn.speaker {
                    output.push_str(&format!(
                        "\n{}\n{}\n",
                        Self::advisor_heading(advisor),
                        turn.content
                    ));
                }
            }
        }

        if let Some(verdict) = session.last_verdict() {
            output.push_str(&Self::section_header("Consensus"));
            let status = if verdict.reached {
                format!("Reached ({}% agreement)", verdict.agreement_percent()).green()
            } else {
                format!("Not reached ({}% agreement)", verdict.agreement_percent()).yellow()
            };
            output.push_str(&format!("{}\n", status.bold()));

            if !verdict.agreement_points.is_empty() {
                output.push_str(&format!("\n{}\n", "Areas of Agreement:".green().bold()));
                for point in &verdict.agreement_points {
                    output.push_str(&format!("  * {}\n", point));
                }
            }
            if !verdict.disagreement_points.is_empty() {
                output.push_str(&format!("\n{}\n", "Disagreements:".yellow().bold()));
                for point in &verdict.disagreement_points {
                    output.push_str(&format!("  * {}\n", point));
                }
            }
        }

        output.push_str(&Self::section_header("Final Answer"));
        let persona = moderator();
        output.push_str(&format!(
            "\n{}\n\n{}\n",
            format!("{} {}", persona.display.emoji, persona.name)
                .color(persona.display.color)
                .bold(),
            session.final_answer().unwrap_or_default()
        ));

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(session: &DebateSession) -> String {
        serde_json::to_string_pretty(session).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final answer only (concise output)
    pub fn format_answer_only(session: &DebateSession) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Council Answer ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n\n", "Q:".bold(), session.question()));

        let consensus = if session.consensus_reached() {
            "consensus reached".green()
        } else {
            "no consensus".yellow()
        };
        output.push_str(&format!(
            "{} {} ({})\n\n",
            "Advisors consulted:".dimmed(),
            Self::advisor_names(session.advisors()),
            consensus
        ));

        output.push_str(session.final_answer().unwrap_or_default());
        output.push('\n');
        output
    }

    /// Questions the council needs answered before it can debate
    pub fn format_clarification(questions: &[String]) -> String {
        let mut output = format!(
            "{}\n",
            "The council needs more detail before debating:".yellow().bold()
        );
        for (i, question) in questions.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, question));
        }
        output
    }

    /// Table of every advisor that can be seated
    pub fn format_advisor_list() -> String {
        let mut output = format!("{}\n", "Available advisors:".cyan().bold());
        for advisor in Advisor::ALL {
            let persona = advisor.persona();
            let default_mark = if Advisor::default_council().contains(&advisor) {
                " (default)".dimmed().to_string()
            } else {
                String::new()
            };
            output.push_str(&format!(
                "  {} {:<11} {:<16} {}{}\n",
                persona.display.emoji,
                advisor.as_str().bold(),
                persona.name.color(persona.display.color),
                persona.display.title.dimmed(),
                default_mark
            ));
        }
        output
    }

    fn advisor_heading(advisor: Advisor) -> String {
        let persona = advisor.persona();
        format!(
            "── {} {} ──",
            persona.display.emoji, persona.name
        )
        .color(persona.display.color)
        .bold()
        .to_string()
    }

    fn advisor_names(advisors: &[Advisor]) -> String {
        advisors
            .iter()
            .map(|a| a.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{ConsensusVerdict, DebateMode, Question, ResearchSource};

    fn concluded() -> DebateSession {
        let mut session = DebateSession::new(
            Question::try_new("Should we open a Berlin office?").unwrap(),
            None,
            DebateMode::Standard,
            vec![Advisor::Strategist, Advisor::Skeptic],
        )
        .unwrap();
        session
            .attach_research(vec![ResearchSource::new(
                "Berlin startup scene",
                "https://example.com/berlin",
                "Growing talent pool.",
            )])
            .unwrap();
        session.begin_round().unwrap();
        session
            .record_response(Advisor::Strategist, "Open it in Q3.")
            .unwrap();
        session
            .record_response(Advisor::Skeptic, "Hiring will be slow.")
            .unwrap();
        session.begin_round().unwrap();
        session
            .record_response(Advisor::Strategist, "Q3, with a hiring partner.")
            .unwrap();
        session
            .record_response(Advisor::Skeptic, "Agreed, with a partner.")
            .unwrap();
        session
            .record_verdict(ConsensusVerdict {
                reached: true,
                agreement_level: 0.8,
                agreement_points: vec!["Use a hiring partner".to_string()],
                ..Default::default()
            })
            .unwrap();
        session.finalize("Open the Berlin office in Q3.").unwrap();
        session
    }

    #[test]
    fn test_full_format_lists_rounds_and_verdict() {
        let output = ConsoleFormatter::render(&concluded(), OutputFormat::Full);
        assert!(output.contains("Should we open a Berlin office?"));
        assert!(output.contains("Round 1"));
        assert!(output.contains("Round 2"));
        assert!(output.contains("Hiring will be slow."));
        assert!(output.contains("Agreed, with a partner."));
        assert!(output.contains("Reached (80% agreement)"));
        assert!(output.contains("Use a hiring partner"));
        assert!(output.contains("Berlin startup scene"));
        assert!(output.contains("Open the Berlin office in Q3."));
    }

    #[test]
    fn test_answer_format_is_concise() {
        let output = ConsoleFormatter::render(&concluded(), OutputFormat::Answer);
        assert!(output.contains("Open the Berlin office in Q3."));
        assert!(output.contains("The Strategist, The Skeptic"));
        assert!(output.contains("consensus reached"));
        assert!(!output.contains("Hiring will be slow."));
    }

    #[test]
    fn test_json_format_is_valid_json() {
        let output = ConsoleFormatter::render(&concluded(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["final_answer"], "Open the Berlin office in Q3.");
        assert_eq!(value["consensus_reached"], true);
    }

    #[test]
    fn test_advisor_list_names_every_advisor() {
        let output = ConsoleFormatter::format_advisor_list();
        for advisor in Advisor::ALL {
            assert!(output.contains(advisor.as_str()));
        }
    }

    #[test]
    fn test_clarification_numbers_questions() {
        let output = ConsoleFormatter::format_clarification(&[
            "Which market?".to_string(),
            "What budget?".to_string(),
        ]);
        assert!(output.contains("1. Which market?"));
        assert!(output.contains("2. What budget?"));
    }
}
