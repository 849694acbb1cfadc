//! Anthropic Messages API adapter
//!
//! Implements [`CompletionClient`](council_application::CompletionClient)
//! over HTTPS, streaming advisor text via server-sent events.

mod client;
pub mod error;
pub mod protocol;
pub mod sse;

pub use client::{AnthropicCompletionClient, AnthropicSettings};
pub use error::AnthropicError;
