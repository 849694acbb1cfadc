//! Live rendering of debate events
//!
//! [`LiveRenderer`] consumes [`StreamEvent`]s in emission order. Advisor
//! text is printed inline as it streams; waits on research, consensus and
//! synthesis get a spinner.

use colored::Colorize;
use council_domain::{Advisor, EventPayload, StreamEvent, moderator};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

/// Renders debate events to a terminal (or any writer).
pub struct LiveRenderer<W: Write> {
    out: W,
    spinners: bool,
    spinner: Option<ProgressBar>,
    /// Whether the last write left the cursor mid-line.
    mid_line: bool,
}

impl<W: Write> LiveRenderer<W> {
    pub fn new(out: W, spinners: bool) -> Self {
        Self {
            out,
            spinners,
            spinner: None,
            mid_line: false,
        }
    }

    /// Clear any spinner and finish the current line.
    pub fn finish(&mut self) -> io::Result<()> {
        self.stop_spinner();
        self.end_line()?;
        self.out.flush()
    }

    /// Consume the renderer and return the writer.
    pub fn into_inner(mut self) -> W {
        self.stop_spinner();
        self.out
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start_spinner(&mut self, message: String) {
        self.stop_spinner();
        if !self.spinners {
            return;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    fn stop_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn end_line(&mut self) -> io::Result<()> {
        if self.mid_line {
            writeln!(self.out)?;
            self.mid_line = false;
        }
        Ok(())
    }

    /// Render one event.
    pub fn render(&mut self, event: &StreamEvent) -> io::Result<()> {
        // Chunks continue the current line; everything else starts fresh
        if let EventPayload::AgentResponse { chunk, .. } = &event.payload {
            write!(self.out, "{}", chunk)?;
            self.mid_line = !chunk.ends_with('\n');
            return self.out.flush();
        }

        self.stop_spinner();
        self.end_line()?;

        match &event.payload {
            EventPayload::CostEstimate(estimate) => {
                writeln!(
                    self.out,
                    "{}",
                    format!(
                        "Estimated cost: up to ${:.3} ({} calls, ~{} input / ~{} output tokens)",
                        estimate.estimated_usd,
                        estimate.completion_calls,
                        estimate.input_tokens,
                        estimate.output_tokens
                    )
                    .dimmed()
                )?;
            }
            EventPayload::ResearchStart { query } => {
                self.start_spinner(format!("Researching: {}", query));
            }
            EventPayload::ResearchResults { sources } => {
                writeln!(self.out, "{}", "Research findings:".cyan().bold())?;
                for (i, source) in sources.iter().enumerate() {
                    writeln!(
                        self.out,
                        "  [{}] {} {}",
                        i + 1,
                        source.title,
                        source.url.dimmed()
                    )?;
                }
            }
            EventPayload::ResearchComplete { source_count } => {
                writeln!(
                    self.out,
                    "{}",
                    format!("Research complete: {} sources", source_count).dimmed()
                )?;
            }
            EventPayload::Status { message } => {
                if message.starts_with("Round ") {
                    writeln!(self.out, "\n{}", format!("━━ {} ━━", message).bold())?;
                } else {
                    writeln!(self.out, "{} {}", "»".cyan(), message)?;
                }
            }
            EventPayload::AgentStart { advisor, round } => {
                writeln!(self.out, "\n{}", Self::speaker_header(*advisor, *round))?;
            }
            EventPayload::AgentResponse { .. } => {}
            EventPayload::AgentComplete { success, .. } => {
                if !success {
                    writeln!(self.out, "{}", "(no response)".red())?;
                }
            }
            EventPayload::ModeratorAnalysis { message } => {
                let persona = moderator();
                self.start_spinner(format!(
                    "{} {}",
                    persona.name.color(persona.display.color).bold(),
                    message
                ));
            }
            EventPayload::ConsensusCheck { round } => {
                self.start_spinner(format!("Checking consensus after round {}", round));
            }
            EventPayload::ConsensusResult(verdict) => {
                let line = if verdict.reached {
                    format!("✓ Consensus reached ({}%)", verdict.agreement_percent()).green()
                } else {
                    format!("✗ No consensus yet ({}%)", verdict.agreement_percent()).yellow()
                };
                writeln!(self.out, "{}", line.bold())?;
                if !verdict.reached && !verdict.majority_view.is_empty() {
                    writeln!(
                        self.out,
                        "  {} {}",
                        "Majority:".dimmed(),
                        verdict.majority_view
                    )?;
                }
            }
            EventPayload::ClarificationNeeded { questions } => {
                writeln!(
                    self.out,
                    "{}",
                    format!("{} clarifying questions", questions.len()).yellow()
                )?;
            }
            // The final answer is printed by the output formatter
            EventPayload::FinalAnswer { .. } => {}
            EventPayload::Error {
                message,
                advisor,
                fatal,
            } => {
                let label = if *fatal {
                    "error:".red().bold()
                } else {
                    "warning:".yellow().bold()
                };
                match advisor {
                    Some(a) => writeln!(self.out, "{} [{}] {}", label, a.as_str(), message)?,
                    None => writeln!(self.out, "{} {}", label, message)?,
                }
            }
        }
        self.out.flush()
    }

    fn speaker_header(advisor: Advisor, round: u32) -> String {
        let persona = advisor.persona();
        format!(
            "{} {} {}",
            persona.display.emoji,
            persona.name.color(persona.display.color).bold(),
            format!("· {} · round {}", persona.display.title, round).dimmed()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{ConsensusVerdict, ResearchSource};

    fn render_all(events: &[StreamEvent]) -> String {
        let mut renderer = LiveRenderer::new(Vec::new(), false);
        for event in events {
            renderer.render(event).unwrap();
        }
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_chunks_stream_inline_under_header() {
        let output = render_all(&[
            StreamEvent::now(EventPayload::AgentStart {
                advisor: Advisor::Skeptic,
                round: 2,
            }),
            StreamEvent::now(EventPayload::AgentResponse {
                advisor: Advisor::Skeptic,
                chunk: "Not ".to_string(),
            }),
            StreamEvent::now(EventPayload::AgentResponse {
                advisor: Advisor::Skeptic,
                chunk: "so fast.".to_string(),
            }),
            StreamEvent::now(EventPayload::AgentComplete {
                advisor: Advisor::Skeptic,
                round: 2,
                success: true,
            }),
            StreamEvent::status("Round 3 of 3"),
        ]);

        assert!(output.contains("The Skeptic"));
        assert!(output.contains("round 2"));
        assert!(output.contains("Not so fast.\n"));
        assert!(output.contains("Round 3 of 3"));
    }

    #[test]
    fn test_failed_turn_and_warnings() {
        let output = render_all(&[
            StreamEvent::warning("The Analyst failed: timed out", Some(Advisor::Analyst)),
            StreamEvent::now(EventPayload::AgentComplete {
                advisor: Advisor::Analyst,
                round: 1,
                success: false,
            }),
            StreamEvent::fatal("Session timed out after 5s"),
        ]);
        assert!(output.contains("[analyst] The Analyst failed: timed out"));
        assert!(output.contains("(no response)"));
        assert!(output.contains("Session timed out after 5s"));
    }

    #[test]
    fn test_research_and_consensus_lines() {
        let output = render_all(&[
            StreamEvent::now(EventPayload::ResearchStart {
                query: "battery trends".to_string(),
            }),
            StreamEvent::now(EventPayload::ResearchResults {
                sources: vec![ResearchSource::new("Grid storage", "https://x.example", "s")],
            }),
            StreamEvent::now(EventPayload::ConsensusCheck { round: 2 }),
            StreamEvent::now(EventPayload::ConsensusResult(ConsensusVerdict {
                majority_view: "Wait for prices to drop".to_string(),
                agreement_level: 0.4,
                ..Default::default()
            })),
        ]);
        assert!(output.contains("[1] Grid storage"));
        assert!(output.contains("No consensus yet (40%)"));
        assert!(output.contains("Wait for prices to drop"));
    }

    #[test]
    fn test_final_answer_is_left_to_formatter() {
        let output = render_all(&[StreamEvent::now(EventPayload::FinalAnswer {
            content: "Do it.".to_string(),
            consensus_reached: true,
        })]);
        assert!(output.is_empty());
    }
}
