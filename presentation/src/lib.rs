//! Presentation layer for advisor-council
//!
//! This crate contains CLI definitions, output formatters and the live
//! renderer for debate events.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
pub use progress::renderer::LiveRenderer;
