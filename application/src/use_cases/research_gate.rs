//! Research gate
//!
//! Decides whether a question warrants a web search and, if so, runs it.
//! Search trouble never stops a debate: it degrades to "no research" with a
//! status event.

use crate::config::DebateParams;
use crate::ports::search::SearchClient;
use crate::use_cases::run_debate::RunDebateError;
use crate::use_cases::shared::{EventEmitter, Interrupted, guarded};
use council_domain::{MAX_RESEARCH_RESULTS, ResearchSource, StreamEvent, should_research};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Research step of a debate.
pub struct ResearchGate {
    search: Option<Arc<dyn SearchClient>>,
    params: DebateParams,
}

impl ResearchGate {
    pub fn new(search: Option<Arc<dyn SearchClient>>, params: DebateParams) -> Self {
        Self { search, params }
    }

    /// Whether a search collaborator is configured at all.
    pub fn is_available(&self) -> bool {
        self.search.is_some()
    }

    /// Whether this question should be researched.
    pub fn should_research(&self, question: &str, research_enabled: bool) -> bool {
        should_research(question, research_enabled, self.is_available())
    }

    /// Search for `query` and return at most [`MAX_RESEARCH_RESULTS`]
    /// normalized sources.
    ///
    /// Failures and timeouts yield an empty list. Only cancellation is an
    /// error.
    pub(crate) async fn perform_research(
        &self,
        query: &str,
        events: &EventEmitter<'_>,
        token: &CancellationToken,
    ) -> Result<Vec<ResearchSource>, RunDebateError> {
        let Some(search) = &self.search else {
            debug!("No search client configured, skipping research");
            return Ok(Vec::new());
        };

        let limit = self.params.effective_search_results();
        info!(query = %query, limit, "Running research");

        let outcome = guarded(
            search.search(query, limit),
            self.params.call_timeout,
            token,
        )
        .await;

        let failure = match outcome {
            Ok(Ok(sources)) => {
                let sources: Vec<ResearchSource> = sources
                    .into_iter()
                    .filter_map(ResearchSource::normalized)
                    .take(limit.min(MAX_RESEARCH_RESULTS))
                    .collect();
                info!(count = sources.len(), "Research finished");
                return Ok(sources);
            }
            Ok(Err(e)) => e.to_string(),
            Err(Interrupted::TimedOut(after)) => {
                format!("search timed out after {}s", after.as_secs())
            }
            Err(Interrupted::Cancelled) => return Err(RunDebateError::Cancelled),
        };

        warn!(error = %failure, "Research failed, continuing without it");
        events.emit(StreamEvent::status(format!(
            "Research unavailable ({}); continuing without it",
            failure
        )));
        Ok(Vec::new())
    }
}
