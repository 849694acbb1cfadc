//! CLI command definitions

use clap::Parser;
use council_domain::{Advisor, DebateMode, OutputFormat};
use std::path::PathBuf;

/// CLI arguments for advisor-council
#[derive(Parser, Debug)]
#[command(name = "advisor-council")]
#[command(author, version, about = "Advisor Council - AI personas debate your question and reach a verdict")]
#[command(long_about = r#"
Advisor Council puts your question to a small council of AI advisors.

Each advisor answers from its own perspective, then reacts to the others
over several rounds. After every round from the second on a moderator checks
for consensus; the debate stops early when the council agrees. The moderator
then writes the final answer.

Advisors: strategist, analyst, skeptic, innovator, pragmatist
Modes:    quick (1 round), standard (2 rounds), deep (3 rounds)

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/advisor-council/config.toml   Global config

Example:
  advisor-council "Should we expand into the EU market next year?"
  advisor-council -a skeptic -a innovator --mode deep "Rewrite or refactor?"
  advisor-council --research -o full "Latest trends in battery storage"
"#)]
pub struct Cli {
    /// The question to put to the council
    pub question: Option<String>,

    /// Advisors to seat, in speaking order (can be specified multiple times)
    #[arg(short, long = "advisor", value_name = "ADVISOR")]
    pub advisors: Vec<Advisor>,

    /// Debate length: quick, standard or deep
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<DebateMode>,

    /// Research the question on the web even without a research keyword
    #[arg(short, long)]
    pub research: bool,

    /// File with an earlier conversation to continue from
    #[arg(long, value_name = "PATH")]
    pub context_file: Option<PathBuf>,

    /// Output format: full, answer or json
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress live debate output and spinners
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// List the available advisors and exit
    #[arg(long)]
    pub list_advisors: bool,

    /// Record every debate event as a JSON line in this file
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,

    /// Write diagnostic logs to daily files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}
