//! Consensus analyzer
//!
//! Asks the moderator whether the advisors' latest positions agree and
//! parses the reply into a [`ConsensusVerdict`]. Parsing never fails; only
//! the call itself can.

use crate::config::DebateParams;
use crate::ports::completion::{CompletionClient, CompletionRequest, GatewayError, RequestKind};
use crate::use_cases::shared::{Interrupted, guarded};
use council_domain::{
    ConsensusVerdict, DebateSession, MIN_RESPONSES_FOR_CONSENSUS, PromptTemplate,
    moderator, parse_consensus_response,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Errors from the moderator call behind an analysis
#[derive(Error, Debug)]
pub enum ConsensusAnalysisError {
    #[error("Consensus analysis failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Consensus analysis timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("Operation cancelled")]
    Cancelled,
}

/// Moderator-backed consensus analysis.
pub struct ConsensusAnalyzer<C: CompletionClient + ?Sized> {
    client: Arc<C>,
    params: DebateParams,
}

impl<C: CompletionClient + ?Sized> ConsensusAnalyzer<C> {
    pub fn new(client: Arc<C>, params: DebateParams) -> Self {
        Self { client, params }
    }

    /// Judge agreement among the advisors' latest responses.
    ///
    /// With fewer than [`MIN_RESPONSES_FOR_CONSENSUS`] non-empty responses
    /// the conservative default verdict is returned without a call.
    pub async fn analyze(
        &self,
        session: &DebateSession,
        token: &CancellationToken,
    ) -> Result<ConsensusVerdict, ConsensusAnalysisError> {
        let responses = session.latest_responses().len();
        if responses < MIN_RESPONSES_FOR_CONSENSUS {
            debug!(
                responses,
                "Too few responses for consensus analysis, assuming none"
            );
            return Ok(ConsensusVerdict::no_consensus());
        }

        let request = CompletionRequest::new(
            RequestKind::ConsensusAnalysis,
            moderator().system_prompt,
            PromptTemplate::consensus_prompt(session),
        )
        .with_max_tokens(self.params.consensus_max_tokens)
        .with_cache_system_prompt(self.params.cache_system_prompt);

        let reply = match guarded(
            self.client.complete(&request),
            self.params.call_timeout,
            token,
        )
        .await
        {
            Ok(reply) => reply?,
            Err(Interrupted::TimedOut(after)) => {
                return Err(ConsensusAnalysisError::TimedOut(after));
            }
            Err(Interrupted::Cancelled) => return Err(ConsensusAnalysisError::Cancelled),
        };

        let verdict = parse_consensus_response(&reply);
        info!(
            round = session.current_round(),
            reached = verdict.reached,
            agreement = verdict.agreement_percent(),
            "Consensus analysed"
        );
        Ok(verdict)
    }
}
