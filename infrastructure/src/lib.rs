//! Infrastructure layer for advisor-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Anthropic completion client, DuckDuckGo
//! search, the JSONL event logger and configuration file loading.

pub mod anthropic;
pub mod config;
pub mod logging;
pub mod search;

// Re-export commonly used types
pub use anthropic::{AnthropicCompletionClient, AnthropicError, AnthropicSettings};
pub use config::{
    ConfigLoader, ConfigValidationError, FileBehaviorConfig, FileConfig, FileCouncilConfig,
    FileOutputConfig, FileProviderConfig, FileSearchConfig,
};
pub use logging::JsonlConversationLogger;
pub use search::DuckDuckGoSearch;
