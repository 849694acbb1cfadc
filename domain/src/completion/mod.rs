//! Completion service value types.
//!
//! - [`Message`] / [`Role`]: conversation turns sent to the model
//! - [`CompletionEvent`]: one event of a streamed completion

pub mod message;
pub mod stream;

pub use message::{Message, Role};
pub use stream::CompletionEvent;
