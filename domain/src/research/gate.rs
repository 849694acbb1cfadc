//! Research gate decision logic.
//!
//! Pure keyword matching; the search call itself lives in the application
//! layer behind the search port.

use crate::core::string::truncate_str;

/// Phrases that signal a question wants external grounding.
pub const RESEARCH_KEYWORDS: &[&str] = &[
    "research",
    "latest data",
    "latest news",
    "verify",
    "statistics",
    "fact check",
    "current data",
    "recent studies",
    "sources",
    "evidence",
];

/// Maximum number of sources attached to a debate.
pub const MAX_RESEARCH_RESULTS: usize = 3;

/// Longest query sent to the search service, in bytes.
const MAX_QUERY_LEN: usize = 200;

/// Decide whether a question should trigger a web search.
///
/// Never researches without a search service. Otherwise an explicit opt-in
/// always wins, and failing that any keyword hit (case-insensitive
/// substring) does.
pub fn should_research(question: &str, research_enabled: bool, search_available: bool) -> bool {
    if !search_available {
        return false;
    }
    if research_enabled {
        return true;
    }
    let lowered = question.to_lowercase();
    RESEARCH_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// Build the search query for a question.
pub fn research_query(question: &str) -> String {
    truncate_str(question.trim(), MAX_QUERY_LEN).to_string()
}
