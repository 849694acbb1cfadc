//! Run Debate use case
//!
//! Orchestrates the full council debate: optional clarification, optional
//! research, the round loop with consensus checks, and the moderator's final
//! synthesis. Every transition is reported as a [`StreamEvent`].

use crate::config::DebateParams;
use crate::ports::clarification::{ClarificationPolicy, NoClarification};
use crate::ports::completion::{CompletionClient, CompletionRequest, RequestKind};
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::event_sink::{ChannelEventSink, EventSink};
use crate::ports::search::SearchClient;
use crate::use_cases::consensus_analyzer::{ConsensusAnalysisError, ConsensusAnalyzer};
use crate::use_cases::research_gate::ResearchGate;
use crate::use_cases::round_executor::RoundExecutor;
use crate::use_cases::shared::{EventEmitter, Interrupted, check_cancelled, guarded};
use council_domain::{
    Advisor, ConsensusVerdict, CostEstimate, DebateMode, DebateSession, DomainError,
    EventPayload, PromptTemplate, Question, StreamEvent, moderator, research_query,
    validate_advisors,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that end a debate without a final answer
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("Invalid input: {0}")]
    InvalidInput(DomainError),

    #[error("Only {succeeded} advisor(s) responded; at least {required} are needed")]
    InsufficientResponses { succeeded: usize, required: usize },

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Session timed out after {}s", .0.as_secs())]
    SessionTimeout(Duration),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Debate state error: {0}")]
    Domain(DomainError),
}

impl From<DomainError> for RunDebateError {
    fn from(error: DomainError) -> Self {
        if error.is_input_error() {
            RunDebateError::InvalidInput(error)
        } else {
            RunDebateError::Domain(error)
        }
    }
}

/// Per-debate options chosen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct DebateOptions {
    pub mode: DebateMode,
    /// Selected advisors, in speaking order.
    pub advisors: Vec<Advisor>,
    /// Research even without a keyword hit.
    pub research_enabled: bool,
    /// Consult the clarification policy before debating.
    pub clarification_enabled: bool,
}

impl Default for DebateOptions {
    fn default() -> Self {
        Self {
            mode: DebateMode::default(),
            advisors: Advisor::default_council(),
            research_enabled: false,
            clarification_enabled: false,
        }
    }
}

/// Input for the RunDebate use case
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    /// The question, as typed by the user
    pub question: String,
    /// Earlier exchange to continue from
    pub prior_conversation: Option<String>,
    pub options: DebateOptions,
}

impl RunDebateInput {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            prior_conversation: None,
            options: DebateOptions::default(),
        }
    }

    pub fn with_prior_conversation(mut self, prior: impl Into<String>) -> Self {
        self.prior_conversation = Some(prior.into());
        self
    }

    pub fn with_mode(mut self, mode: DebateMode) -> Self {
        self.options.mode = mode;
        self
    }

    pub fn with_advisors(mut self, advisors: Vec<Advisor>) -> Self {
        self.options.advisors = advisors;
        self
    }

    pub fn with_research(mut self, enabled: bool) -> Self {
        self.options.research_enabled = enabled;
        self
    }

    pub fn with_clarification(mut self, enabled: bool) -> Self {
        self.options.clarification_enabled = enabled;
        self
    }
}

/// How a debate ended, when it ended well.
#[derive(Debug)]
pub enum DebateOutcome {
    /// The debate ran to a final answer.
    Concluded(Box<DebateSession>),
    /// The question needs clarifying before a debate makes sense.
    NeedsClarification { questions: Vec<String> },
}

impl DebateOutcome {
    pub fn session(&self) -> Option<&DebateSession> {
        match self {
            DebateOutcome::Concluded(session) => Some(session),
            DebateOutcome::NeedsClarification { .. } => None,
        }
    }

    pub fn into_session(self) -> Option<DebateSession> {
        match self {
            DebateOutcome::Concluded(session) => Some(*session),
            DebateOutcome::NeedsClarification { .. } => None,
        }
    }
}

/// A debate running on its own task.
pub struct DebateHandle {
    /// Events in emission order; closes when the debate ends.
    pub events: mpsc::UnboundedReceiver<StreamEvent>,
    /// Cancels the debate; no events follow a cancel.
    pub cancel: CancellationToken,
    pub join: JoinHandle<Result<DebateOutcome, RunDebateError>>,
}

/// Use case for running a council debate
pub struct RunDebateUseCase<C: CompletionClient + 'static> {
    client: Arc<C>,
    search: Option<Arc<dyn SearchClient>>,
    clarification: Arc<dyn ClarificationPolicy>,
    logger: Arc<dyn ConversationLogger>,
    params: DebateParams,
}

impl<C: CompletionClient + 'static> RunDebateUseCase<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            search: None,
            clarification: Arc::new(NoClarification),
            logger: Arc::new(NoConversationLogger),
            params: DebateParams::default(),
        }
    }

    pub fn with_search(mut self, search: Arc<dyn SearchClient>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_clarification(mut self, policy: Arc<dyn ClarificationPolicy>) -> Self {
        self.clarification = policy;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_params(mut self, params: DebateParams) -> Self {
        self.params = params;
        self
    }

    /// Run a debate to the end, reporting to `sink`.
    ///
    /// Every error except cancellation is also reported as one fatal `error`
    /// event. After cancellation nothing more is emitted.
    pub async fn execute(
        &self,
        input: RunDebateInput,
        sink: &dyn EventSink,
        cancel: CancellationToken,
    ) -> Result<DebateOutcome, RunDebateError> {
        let events = EventEmitter::new(sink, self.logger.as_ref(), &cancel);

        let result = match self.params.session_timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(input, &events, &cancel))
                .await
                .unwrap_or(Err(RunDebateError::SessionTimeout(limit))),
            None => self.run(input, &events, &cancel).await,
        };

        match &result {
            Ok(_) => {}
            Err(RunDebateError::Cancelled) => info!("Debate cancelled"),
            Err(e) => {
                warn!(error = %e, "Debate failed");
                events.emit(StreamEvent::fatal(e.to_string()));
            }
        }
        result
    }

    /// Run a debate on a new task and hand back its event stream.
    pub fn spawn(self: &Arc<Self>, input: RunDebateInput) -> DebateHandle {
        let (sink, events) = ChannelEventSink::channel();
        let cancel = CancellationToken::new();

        let use_case = Arc::clone(self);
        let token = cancel.clone();
        let join = tokio::spawn(async move { use_case.execute(input, &sink, token).await });

        DebateHandle {
            events,
            cancel,
            join,
        }
    }

    async fn run(
        &self,
        input: RunDebateInput,
        events: &EventEmitter<'_>,
        token: &CancellationToken,
    ) -> Result<DebateOutcome, RunDebateError> {
        let RunDebateInput {
            question,
            prior_conversation,
            options,
        } = input;

        let question = Question::try_new(question)?;
        validate_advisors(&options.advisors)?;

        if options.clarification_enabled {
            let questions = guarded(
                self.clarification
                    .clarifying_questions(&question, prior_conversation.as_deref()),
                self.params.call_timeout,
                token,
            )
            .await;
            match questions {
                Ok(questions) if !questions.is_empty() => {
                    info!(count = questions.len(), "Question needs clarification");
                    events.payload(EventPayload::ClarificationNeeded {
                        questions: questions.clone(),
                    });
                    return Ok(DebateOutcome::NeedsClarification { questions });
                }
                Ok(_) => {}
                Err(Interrupted::Cancelled) => return Err(RunDebateError::Cancelled),
                Err(Interrupted::TimedOut(_)) => {
                    warn!("Clarification check timed out, debating as asked");
                }
            }
        }

        let mut session = DebateSession::new(
            question,
            prior_conversation,
            options.mode,
            options.advisors,
        )?;
        info!(
            id = session.id(),
            mode = %session.mode(),
            advisors = session.advisors().len(),
            "Starting debate"
        );

        events.payload(EventPayload::CostEstimate(CostEstimate::for_debate(
            session.mode(),
            session.advisors().len(),
        )));

        self.research_phase(&mut session, options.research_enabled, events, token)
            .await?;

        let rounds = RoundExecutor::new(Arc::clone(&self.client), self.params.clone());
        let analyzer = ConsensusAnalyzer::new(Arc::clone(&self.client), self.params.clone());

        loop {
            check_cancelled(token)?;
            let round = session.begin_round()?;
            events.emit(StreamEvent::status(format!(
                "Round {} of {}",
                round,
                session.max_rounds()
            )));

            let summary = rounds.run_round(&mut session, events, token).await?;
            debug!(
                round,
                succeeded = summary.succeeded.len(),
                failed = summary.failed.len(),
                "Round finished"
            );

            if round >= 2 {
                let verdict = self
                    .consensus_check(&session, &analyzer, events, token)
                    .await?;
                let reached = verdict.reached;
                session.record_verdict(verdict)?;
                if reached {
                    info!(round, "Consensus reached");
                    break;
                }
            }

            if !session.has_rounds_remaining() {
                break;
            }
        }

        self.synthesize(&mut session, events, token).await?;
        Ok(DebateOutcome::Concluded(Box::new(session)))
    }

    async fn research_phase(
        &self,
        session: &mut DebateSession,
        research_enabled: bool,
        events: &EventEmitter<'_>,
        token: &CancellationToken,
    ) -> Result<(), RunDebateError> {
        let gate = ResearchGate::new(self.search.clone(), self.params.clone());
        if !gate.should_research(session.question().content(), research_enabled) {
            return Ok(());
        }

        let query = research_query(session.question().content());
        events.payload(EventPayload::ResearchStart {
            query: query.clone(),
        });

        let sources = gate.perform_research(&query, events, token).await?;

        events.payload(EventPayload::ResearchResults {
            sources: sources.clone(),
        });
        events.payload(EventPayload::ResearchComplete {
            source_count: sources.len(),
        });
        session.attach_research(sources)?;
        Ok(())
    }

    async fn consensus_check(
        &self,
        session: &DebateSession,
        analyzer: &ConsensusAnalyzer<C>,
        events: &EventEmitter<'_>,
        token: &CancellationToken,
    ) -> Result<ConsensusVerdict, RunDebateError> {
        let round = session.current_round();
        events.payload(EventPayload::ConsensusCheck { round });

        let verdict = match analyzer.analyze(session, token).await {
            Ok(verdict) => verdict,
            Err(ConsensusAnalysisError::Cancelled) => return Err(RunDebateError::Cancelled),
            Err(e) => {
                warn!(round, error = %e, "Consensus analysis failed, assuming no consensus");
                events.emit(StreamEvent::warning(e.to_string(), None));
                ConsensusVerdict::no_consensus()
            }
        };

        events.payload(EventPayload::ConsensusResult(verdict.clone()));
        Ok(verdict)
    }

    async fn synthesize(
        &self,
        session: &mut DebateSession,
        events: &EventEmitter<'_>,
        token: &CancellationToken,
    ) -> Result<(), RunDebateError> {
        let consensus = session.consensus_reached();
        events.emit(StreamEvent::moderator_analysis(if consensus {
            "The council agrees. Writing up the shared recommendation."
        } else {
            "No full consensus. Writing up the majority view and open disagreements."
        }));

        let request = CompletionRequest::new(
            RequestKind::Synthesis,
            moderator().system_prompt,
            PromptTemplate::synthesis_prompt(session, session.last_verdict()),
        )
        .with_max_tokens(self.params.synthesis_max_tokens)
        .with_cache_system_prompt(self.params.cache_system_prompt);

        let answer = match guarded(
            self.client.complete(&request),
            self.params.call_timeout,
            token,
        )
        .await
        {
            Ok(Ok(answer)) if !answer.trim().is_empty() => answer,
            Ok(Ok(_)) => return Err(RunDebateError::SynthesisFailed("empty response".into())),
            Ok(Err(e)) => return Err(RunDebateError::SynthesisFailed(e.to_string())),
            Err(Interrupted::TimedOut(after)) => {
                return Err(RunDebateError::SynthesisFailed(format!(
                    "timed out after {}s",
                    after.as_secs()
                )));
            }
            Err(Interrupted::Cancelled) => return Err(RunDebateError::Cancelled),
        };

        session.finalize(answer.clone())?;
        info!(id = session.id(), consensus, "Debate concluded");
        events.payload(EventPayload::FinalAnswer {
            content: answer,
            consensus_reached: consensus,
        });
        Ok(())
    }
}
