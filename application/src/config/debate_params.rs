//! Debate parameters: use case call control.
//!
//! [`DebateParams`] groups the static parameters that bound the calls a
//! debate makes: timeouts, token budgets and search breadth. These are
//! application-layer concerns, not domain policy.

use council_domain::MAX_RESEARCH_RESULTS;
use std::time::Duration;

/// Call control parameters for one debate.
#[derive(Debug, Clone, PartialEq)]
pub struct DebateParams {
    /// Maximum time for any single external call.
    pub call_timeout: Duration,
    /// Maximum time for the whole debate; `None` for no ceiling.
    pub session_timeout: Option<Duration>,
    /// Token budget of one advisor turn.
    pub advisor_max_tokens: u32,
    /// Token budget of the consensus analysis.
    pub consensus_max_tokens: u32,
    /// Token budget of the final synthesis.
    pub synthesis_max_tokens: u32,
    /// Ask the provider to cache persona system prompts.
    pub cache_system_prompt: bool,
    /// Number of search results requested; capped at
    /// [`MAX_RESEARCH_RESULTS`].
    pub search_max_results: usize,
}

impl Default for DebateParams {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(120),
            session_timeout: None,
            advisor_max_tokens: 1024,
            consensus_max_tokens: 1024,
            synthesis_max_tokens: 2048,
            cache_system_prompt: true,
            search_max_results: MAX_RESEARCH_RESULTS,
        }
    }
}

impl DebateParams {
    // ==================== Builder Methods ====================

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_session_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.session_timeout = timeout;
        self
    }

    pub fn with_advisor_max_tokens(mut self, max: u32) -> Self {
        self.advisor_max_tokens = max;
        self
    }

    pub fn with_consensus_max_tokens(mut self, max: u32) -> Self {
        self.consensus_max_tokens = max;
        self
    }

    pub fn with_synthesis_max_tokens(mut self, max: u32) -> Self {
        self.synthesis_max_tokens = max;
        self
    }

    pub fn with_cache_system_prompt(mut self, cache: bool) -> Self {
        self.cache_system_prompt = cache;
        self
    }

    pub fn with_search_max_results(mut self, max: usize) -> Self {
        self.search_max_results = max;
        self
    }

    /// Search results actually requested.
    pub fn effective_search_results(&self) -> usize {
        self.search_max_results.clamp(1, MAX_RESEARCH_RESULTS)
    }
}
