//! Web search port
//!
//! Defines the interface the research gate uses to ground a debate in
//! search results.

use async_trait::async_trait;
use council_domain::ResearchSource;
use thiserror::Error;

/// Errors that can occur during a search
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid search response: {0}")]
    InvalidResponse(String),

    #[error("Search timed out")]
    Timeout,
}

/// Search collaborator.
///
/// May fail or return nothing; callers treat both as "no research".
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<ResearchSource>, SearchError>;
}
