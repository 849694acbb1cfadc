//! Research source value object

use crate::core::string::{collapse_whitespace, truncate};
use serde::{Deserialize, Serialize};

/// Longest snippet kept per source.
const MAX_SNIPPET_LEN: usize = 500;

/// One web-search hit used to ground the debate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchSource {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl ResearchSource {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }

    /// Normalize a raw search hit into the fixed result shape.
    ///
    /// Collapses whitespace, bounds the snippet length and falls back to the
    /// URL when the title is blank. Returns `None` for hits without a URL or
    /// snippet, which are useless as citations.
    pub fn normalized(self) -> Option<Self> {
        let url = self.url.trim().to_string();
        let snippet = collapse_whitespace(&self.snippet);
        if url.is_empty() || snippet.is_empty() {
            return None;
        }
        let title = collapse_whitespace(&self.title);
        let title = if title.is_empty() { url.clone() } else { title };
        Some(Self {
            title,
            url,
            snippet: truncate(&snippet, MAX_SNIPPET_LEN),
        })
    }
}
