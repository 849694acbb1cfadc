//! Web search adapters

mod duckduckgo;

pub use duckduckgo::{DDG_API_URL, DuckDuckGoSearch, parse_instant_answer};
