//! Session Controller
//!
//! Drives one interactive session as an explicit state machine:
//!
//! ```text
//! AwaitingProposalId ──q──────────────────────────────────────────► Terminated
//!   │  ▲ non-numeric / count 0 / count > max_results
//!   ▼  │
//! CountingResults ──► AwaitingInspectConfirm ──no──► AwaitingProposalId
//!                       │ yes
//!                       ▼
//!                     FullQuery ──no timed records──► AwaitingProposalId
//!                       ▼
//!                     Summarizing ──size overflow──► AwaitingProposalId
//!                       ▼
//!                     AwaitingDownloadConfirm ──(download if yes)──► AwaitingRepeatConfirm
//!                                                                      │ yes → AwaitingProposalId
//!                                                                      │ no  → Terminated
//! ```
//!
//! Query, selection and product resolution run strictly one after another;
//! only the download step fans out.

pub mod config;
pub mod operator;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::app::client::ArchiveService;
use crate::app::download::{DownloadEngine, DownloadReport};
use crate::app::models::ObservationRecord;
use crate::app::products::{summarize_products, ProductSet};
use crate::app::query::{count_observations, fetch_observations, ProposalId};
use crate::app::selector::{select_latest, ObservationSummary};
use crate::errors::{ProductError, QueryError, Result};

pub use config::SessionConfig;
pub use operator::Operator;

const PROPOSAL_PROMPT: &str = "Enter a Proposal ID to check: ";
const NO_FILES_PROMPT: &str = "No files found!  Try a different proposal: ";
const TOO_MANY_PROMPT: &str = "Too many results returned!  Try a different proposal: ";
const NOT_AN_INTEGER: &str = "Proposal ID must be an integer!";
const NO_TIMING: &str =
    "Data entries do not contain timing information!  (could be planned observations)";
const STARTING_OVER: &str = "Starting over...";
const SIZE_TOO_LARGE: &str = "Total file size too large!";
const DOWNLOAD_PROMPT: &str = "Download these files? [y/n] ";
const REPEAT_PROMPT: &str = "Check another Proposal ID? [y/n] ";

/// States of an interactive session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Waiting for a proposal identifier, showing `prompt`
    AwaitingProposalId { prompt: &'static str },
    /// Running the count query
    CountingResults { proposal_id: ProposalId },
    /// Asking whether to inspect the latest observation
    AwaitingInspectConfirm { proposal_id: ProposalId, count: u64 },
    /// Running the full query and selecting the latest observation
    FullQuery { proposal_id: ProposalId },
    /// Resolving products of the selected observation
    Summarizing { observation: ObservationRecord },
    /// Asking whether to download the resolved products
    AwaitingDownloadConfirm { products: ProductSet },
    /// Asking whether to check another proposal
    AwaitingRepeatConfirm,
    /// Session is over
    Terminated,
}

impl SessionState {
    /// Initial state of every cycle
    pub fn start() -> Self {
        Self::AwaitingProposalId {
            prompt: PROPOSAL_PROMPT,
        }
    }

    /// Short state name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitingProposalId { .. } => "AwaitingProposalId",
            Self::CountingResults { .. } => "CountingResults",
            Self::AwaitingInspectConfirm { .. } => "AwaitingInspectConfirm",
            Self::FullQuery { .. } => "FullQuery",
            Self::Summarizing { .. } => "Summarizing",
            Self::AwaitingDownloadConfirm { .. } => "AwaitingDownloadConfirm",
            Self::AwaitingRepeatConfirm => "AwaitingRepeatConfirm",
            Self::Terminated => "Terminated",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happened over a whole session
#[derive(Debug, Clone, Default)]
pub struct SessionSummary {
    /// Count queries submitted
    pub proposals_checked: usize,
    /// Cycles restarted because of missing timing data or oversize totals
    pub restarts: usize,
    /// One report per confirmed download
    pub downloads: Vec<DownloadReport>,
}

/// Orchestrates query, selection, resolution and download
pub struct SessionController {
    service: Arc<dyn ArchiveService>,
    engine: DownloadEngine,
    config: SessionConfig,
}

impl SessionController {
    /// Create a controller over a service and download engine
    pub fn new(
        service: Arc<dyn ArchiveService>,
        engine: DownloadEngine,
        config: SessionConfig,
    ) -> Self {
        Self {
            service,
            engine,
            config,
        }
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run the session until the operator quits
    ///
    /// # Errors
    ///
    /// Operator I/O failures and transport-level faults (connection errors,
    /// server errors, malformed JSON) end the session with an error.
    pub async fn run(&self, operator: &mut dyn Operator) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        let mut state = SessionState::start();

        loop {
            debug!("Session state: {}", state);
            if state == SessionState::Terminated {
                break;
            }
            state = self.step(state, operator, &mut summary).await?;
        }

        info!(
            "Session terminated after {} proposals and {} downloads",
            summary.proposals_checked,
            summary.downloads.len()
        );
        Ok(summary)
    }

    /// Perform one transition
    pub async fn step(
        &self,
        state: SessionState,
        operator: &mut dyn Operator,
        summary: &mut SessionSummary,
    ) -> Result<SessionState> {
        let next = match state {
            SessionState::AwaitingProposalId { prompt } => {
                let input = operator.prompt(prompt)?;
                match ProposalId::parse(&input) {
                    Ok(proposal_id) => SessionState::CountingResults { proposal_id },
                    Err(QueryError::QuitRequested) => SessionState::Terminated,
                    Err(e) => {
                        debug!("Rejected proposal input: {}", e);
                        operator.report(NOT_AN_INTEGER);
                        SessionState::start()
                    }
                }
            }

            SessionState::CountingResults { proposal_id } => {
                summary.proposals_checked += 1;

                operator.busy(&format!("Counting observations for {}...", proposal_id));
                let result =
                    count_observations(self.service.as_ref(), &self.config.telescope, &proposal_id)
                        .await;
                operator.idle();

                let count = match result {
                    Ok(count) => count,
                    Err(QueryError::EmptyCount) => 0,
                    Err(e) => return Err(e.into()),
                };
                info!("Proposal {} has {} observations", proposal_id, count);

                if count == 0 {
                    SessionState::AwaitingProposalId {
                        prompt: NO_FILES_PROMPT,
                    }
                } else if !self.config.accepts_count(count) {
                    SessionState::AwaitingProposalId {
                        prompt: TOO_MANY_PROMPT,
                    }
                } else {
                    SessionState::AwaitingInspectConfirm { proposal_id, count }
                }
            }

            SessionState::AwaitingInspectConfirm { proposal_id, count } => {
                let question = format!(
                    "Found {} observations for {}.  Inspect the latest observation? [y/n] ",
                    count, proposal_id
                );
                if operator.confirm(&question)? {
                    SessionState::FullQuery { proposal_id }
                } else {
                    SessionState::start()
                }
            }

            SessionState::FullQuery { proposal_id } => {
                operator.busy(&format!("Fetching observations for {}...", proposal_id));
                let result =
                    fetch_observations(self.service.as_ref(), &self.config.telescope, &proposal_id)
                        .await;
                operator.idle();
                let records = result?;

                match select_latest(&records) {
                    Ok(latest) => {
                        for line in ObservationSummary::from_record(latest).lines() {
                            operator.report(&line);
                        }
                        SessionState::Summarizing {
                            observation: latest.clone(),
                        }
                    }
                    Err(e) => {
                        info!("Proposal {}: {}", proposal_id, e);
                        operator.report(NO_TIMING);
                        operator.report(STARTING_OVER);
                        summary.restarts += 1;
                        SessionState::start()
                    }
                }
            }

            SessionState::Summarizing { observation } => {
                operator.busy(&format!("Listing products of {}...", observation.obsid));
                let result = summarize_products(
                    self.service.as_ref(),
                    &observation.obsid,
                    self.config.product_page_size,
                )
                .await;
                operator.idle();

                match result {
                    Ok(products) => {
                        operator.report(&products.summary_line());
                        SessionState::AwaitingDownloadConfirm { products }
                    }
                    Err(ProductError::SizeOverflow { total_bytes }) => {
                        warn!(
                            "Observation {} totals {} bytes, beyond displayable range",
                            observation.obsid, total_bytes
                        );
                        operator.report(SIZE_TOO_LARGE);
                        summary.restarts += 1;
                        SessionState::start()
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            SessionState::AwaitingDownloadConfirm { products } => {
                if operator.confirm(DOWNLOAD_PROMPT)? {
                    let report = self.download(&products, operator).await;
                    summary.downloads.push(report);
                }
                SessionState::AwaitingRepeatConfirm
            }

            SessionState::AwaitingRepeatConfirm => {
                if operator.confirm(REPEAT_PROMPT)? {
                    SessionState::start()
                } else {
                    SessionState::Terminated
                }
            }

            SessionState::Terminated => SessionState::Terminated,
        };

        Ok(next)
    }

    /// Run the download engine and report per-file and aggregate results
    async fn download(&self, products: &ProductSet, operator: &mut dyn Operator) -> DownloadReport {
        operator.busy(&format!("Downloading {} files...", products.len()));
        let report = self.engine.download_all(&products.products).await;
        operator.idle();

        for outcome in &report.outcomes {
            operator.report(&outcome.status_line());
        }
        operator.report(&report.summary_line());
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::download::EngineConfig;
    use crate::app::query::SearchRequest;
    use crate::errors::{DownloadResult, QueryResult, SessionResult};
    use async_trait::async_trait;
    use std::collections::VecDeque;

    struct CountOnly(u64);

    #[async_trait]
    impl ArchiveService for CountOnly {
        async fn submit(&self, _request: &SearchRequest) -> QueryResult<String> {
            Ok(format!(r#"{{"data":[{{"Column1":{}}}]}}"#, self.0))
        }

        async fn fetch_file(&self, _uri: &str) -> DownloadResult<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    struct Script {
        answers: VecDeque<&'static str>,
        prompts: Vec<String>,
        lines: Vec<String>,
    }

    impl Script {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                prompts: Vec::new(),
                lines: Vec::new(),
            }
        }
    }

    impl Operator for Script {
        fn prompt(&mut self, message: &str) -> SessionResult<String> {
            self.prompts.push(message.to_string());
            self.answers
                .pop_front()
                .map(str::to_string)
                .ok_or(crate::errors::SessionError::InputClosed)
        }

        fn report(&mut self, line: &str) {
            self.lines.push(line.to_string());
        }
    }

    fn controller(count: u64) -> SessionController {
        let service: Arc<dyn ArchiveService> = Arc::new(CountOnly(count));
        let engine = DownloadEngine::new(Arc::clone(&service), EngineConfig::default());
        SessionController::new(service, engine, SessionConfig::default())
    }

    #[tokio::test]
    async fn test_quit_terminates_immediately() {
        let mut operator = Script::new(&["q"]);
        let summary = controller(3).run(&mut operator).await.unwrap();

        assert_eq!(summary.proposals_checked, 0);
        assert_eq!(operator.prompts, vec![PROPOSAL_PROMPT.to_string()]);
    }

    #[tokio::test]
    async fn test_non_numeric_reprompts() {
        // Test that bad input loops back without querying
        let mut operator = Script::new(&["abc", "Q"]);
        let summary = controller(3).run(&mut operator).await.unwrap();

        assert_eq!(summary.proposals_checked, 0);
        assert_eq!(operator.lines, vec![NOT_AN_INTEGER.to_string()]);
        assert_eq!(operator.prompts.len(), 2);
    }

    #[tokio::test]
    async fn test_oversize_count_reprompts() {
        let mut operator = Script::new(&["1234", "q"]);
        let summary = controller(50_001).run(&mut operator).await.unwrap();

        assert_eq!(summary.proposals_checked, 1);
        assert_eq!(operator.prompts[1], TOO_MANY_PROMPT);
    }

    #[tokio::test]
    async fn test_declined_inspect_restarts() {
        let mut operator = Script::new(&["1234", "n", "q"]);
        controller(3).run(&mut operator).await.unwrap();

        assert!(operator.prompts[1].starts_with("Found 3 observations for 1234."));
        assert_eq!(operator.prompts[2], PROPOSAL_PROMPT);
    }

    #[tokio::test]
    async fn test_closed_input_is_an_error() {
        let mut operator = Script::new(&[]);
        assert!(controller(3).run(&mut operator).await.is_err());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(SessionState::start().name(), "AwaitingProposalId");
        assert_eq!(SessionState::Terminated.to_string(), "Terminated");
    }
}
