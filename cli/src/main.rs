//! CLI entrypoint for Advisor Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;
use council_application::{
    DebateHandle, DebateOptions, DebateOutcome, RunDebateError, RunDebateInput, RunDebateUseCase,
};
use council_domain::OutputFormat;
use council_infrastructure::{
    AnthropicCompletionClient, AnthropicSettings, ConfigLoader, DuckDuckGoSearch, FileConfig,
    JsonlConversationLogger,
};
use council_presentation::{Cli, ConsoleFormatter, LiveRenderer};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit status after Ctrl-C, as shells report SIGINT.
const EXIT_CANCELLED: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Held until exit so buffered file logs are flushed
    let log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    info!("Starting Advisor Council");

    if cli.list_advisors {
        print!("{}", ConsoleFormatter::format_advisor_list());
        return Ok(());
    }

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    let Some(question) = cli.question.clone() else {
        bail!("Question is required. Run with --help for usage.");
    };

    let options = apply_cli_overrides(config.debate_options()?, &cli);
    let mut input = RunDebateInput::new(question);
    input.options = options;
    if let Some(path) = &cli.context_file {
        let prior = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read context file {}", path.display()))?;
        input = input.with_prior_conversation(prior);
    }

    let use_case = Arc::new(build_use_case(&config, cli.event_log.as_deref())?);

    let format = cli.output.or(config.output.format).unwrap_or_default();
    let show_progress = !cli.quiet && config.output.show_progress;

    let DebateHandle {
        mut events,
        cancel,
        join,
    } = use_case.spawn(input);

    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let mut renderer = show_progress.then(|| {
        // Keep stdout clean for machine-readable output
        let out: Box<dyn Write> = if format == OutputFormat::Json {
            Box::new(io::stderr())
        } else {
            Box::new(io::stdout())
        };
        LiveRenderer::new(out, true)
    });

    while let Some(event) = events.recv().await {
        if let Some(renderer) = renderer.as_mut() {
            renderer.render(&event)?;
        }
    }
    if let Some(renderer) = renderer.as_mut() {
        renderer.finish()?;
        println!();
    }

    match join.await? {
        Ok(DebateOutcome::Concluded(session)) => {
            println!("{}", ConsoleFormatter::render(&session, format));
            Ok(())
        }
        Ok(DebateOutcome::NeedsClarification { questions }) => {
            print!("{}", ConsoleFormatter::format_clarification(&questions));
            Ok(())
        }
        Err(RunDebateError::Cancelled) => {
            eprintln!("{}", "Debate cancelled.".yellow());
            drop(log_guard);
            std::process::exit(EXIT_CANCELLED);
        }
        Err(e) => Err(e.into()),
    }
}

/// Log filter for a `-v` count.
fn log_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    }
}

/// Console logging on stderr, plus daily-rolling files when `log_dir` is set.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "advisor-council.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(log_filter(verbose))
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

/// CLI flags win over configured options.
fn apply_cli_overrides(mut options: DebateOptions, cli: &Cli) -> DebateOptions {
    if !cli.advisors.is_empty() {
        options.advisors = cli.advisors.clone();
    }
    if let Some(mode) = cli.mode {
        options.mode = mode;
    }
    options.research_enabled |= cli.research;
    options
}

/// Wire adapters into the use case.
fn build_use_case(
    config: &FileConfig,
    event_log: Option<&Path>,
) -> Result<RunDebateUseCase<AnthropicCompletionClient>> {
    let provider = &config.provider;
    let api_key = provider.resolve_api_key().ok_or_else(|| {
        anyhow!(
            "API key not found: set the {} environment variable",
            provider.api_key_env
        )
    })?;

    let client = AnthropicCompletionClient::new(AnthropicSettings {
        api_key,
        base_url: provider.base_url.clone(),
        api_version: provider.api_version.clone(),
        advisor_model: provider.model.clone(),
        moderator_model: provider.moderator_model().to_string(),
        idle_timeout: Duration::from_secs(provider.stream_idle_timeout_seconds),
    })?;

    let mut use_case = RunDebateUseCase::new(Arc::new(client)).with_params(config.debate_params());

    if config.search.enabled {
        let search = DuckDuckGoSearch::new(Duration::from_secs(config.search.timeout_seconds))?;
        use_case = use_case.with_search(Arc::new(search));
    }

    if let Some(path) = event_log {
        match JsonlConversationLogger::new(path) {
            Some(logger) => {
                info!("Recording debate events to {}", logger.path().display());
                use_case = use_case.with_conversation_logger(Arc::new(logger));
            }
            None => warn!("Event log disabled: could not open {}", path.display()),
        }
    }

    Ok(use_case)
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{Advisor, DebateMode};

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::try_parse_from([
            "advisor-council",
            "-a",
            "pragmatist",
            "-a",
            "skeptic",
            "--mode",
            "quick",
            "--research",
            "Q?",
        ])
        .unwrap();
        let options = apply_cli_overrides(DebateOptions::default(), &cli);
        assert_eq!(options.advisors, vec![Advisor::Pragmatist, Advisor::Skeptic]);
        assert_eq!(options.mode, DebateMode::Quick);
        assert!(options.research_enabled);
    }

    #[test]
    fn test_config_kept_without_flags() {
        let cli = Cli::try_parse_from(["advisor-council", "Q?"]).unwrap();
        let configured = DebateOptions {
            mode: DebateMode::Deep,
            research_enabled: true,
            ..Default::default()
        };
        let options = apply_cli_overrides(configured, &cli);
        assert_eq!(options.mode, DebateMode::Deep);
        assert_eq!(options.advisors, Advisor::default_council());
        assert!(options.research_enabled);
    }

    #[test]
    fn test_missing_api_key_is_reported() {
        let mut config = FileConfig::default();
        config.provider.api_key_env = "COUNCIL_TEST_UNSET_MAIN_KEY".to_string();
        let err = build_use_case(&config, None).err().unwrap();
        assert!(err.to_string().contains("COUNCIL_TEST_UNSET_MAIN_KEY"));
    }
}
