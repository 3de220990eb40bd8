//! Query Client for MAST filtered searches
//!
//! Validates proposal identifiers, builds [`SearchRequest`]s, submits them
//! through an [`ArchiveService`] and parses the JSON answer into either a
//! scalar count or a list of [`ObservationRecord`]s.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mast_fetcher::app::{query, MastClient, QueryMode, QueryOutcome};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MastClient::new()?;
//! match query(&client, "JWST", "1234", QueryMode::Count).await? {
//!     QueryOutcome::Count(n) => println!("{} observations", n),
//!     QueryOutcome::Records(_) => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```

pub mod request;

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::app::client::ArchiveService;
use crate::app::models::ObservationRecord;
use crate::constants::{limits, services};
use crate::errors::{QueryError, QueryResult};

pub use request::{ColumnSelector, Filter, RequestParams, SearchRequest};

/// A syntactically valid (integer) proposal identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProposalId(String);

impl ProposalId {
    /// Validate operator input as a proposal identifier
    ///
    /// Surrounding whitespace is ignored. The quit sentinel is reported as
    /// [`QueryError::QuitRequested`]; anything that is not an integer is
    /// [`QueryError::InvalidProposalId`].
    pub fn parse(input: &str) -> QueryResult<Self> {
        let trimmed = input.trim();

        if trimmed.eq_ignore_ascii_case(limits::QUIT_SENTINEL) {
            return Err(QueryError::QuitRequested);
        }

        if !is_integer_literal(trimmed) {
            return Err(QueryError::InvalidProposalId {
                input: trimmed.to_string(),
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Identifier text sent in the proposal filter
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Optional sign followed by at least one ASCII digit, of any length
fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a query asks for a count or for full records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Count of matching observations only
    Count,
    /// Every matching observation row
    Full,
}

impl QueryMode {
    fn columns(self) -> ColumnSelector {
        match self {
            Self::Count => ColumnSelector::Count,
            Self::Full => ColumnSelector::All,
        }
    }
}

/// Result of a filtered search
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Count-mode answer
    Count(u64),
    /// Full-mode answer, in server order
    Records(Vec<ObservationRecord>),
}

/// Validate raw input and run a filtered search in the requested mode
///
/// Input validation happens before any network call.
pub async fn query(
    service: &dyn ArchiveService,
    telescope: &str,
    proposal_input: &str,
    mode: QueryMode,
) -> QueryResult<QueryOutcome> {
    let proposal_id = ProposalId::parse(proposal_input)?;
    let request = SearchRequest::filtered(telescope, &proposal_id, mode.columns());

    debug!(
        "Querying {} proposal {} ({:?} mode)",
        telescope, proposal_id, mode
    );
    let body = service.submit(&request).await?;

    match mode {
        QueryMode::Count => parse_count(&body).map(QueryOutcome::Count),
        QueryMode::Full => parse_rows(&body).map(QueryOutcome::Records),
    }
}

/// Count the observations of a proposal within a collection
pub async fn count_observations(
    service: &dyn ArchiveService,
    telescope: &str,
    proposal_id: &ProposalId,
) -> QueryResult<u64> {
    let request = SearchRequest::filtered(telescope, proposal_id, ColumnSelector::Count);
    let body = service.submit(&request).await?;
    parse_count(&body)
}

/// Fetch every observation of a proposal within a collection
pub async fn fetch_observations(
    service: &dyn ArchiveService,
    telescope: &str,
    proposal_id: &ProposalId,
) -> QueryResult<Vec<ObservationRecord>> {
    let request = SearchRequest::filtered(telescope, proposal_id, ColumnSelector::All);
    let body = service.submit(&request).await?;
    let records: Vec<ObservationRecord> = parse_rows(&body)?;
    debug!("Proposal {} returned {} observations", proposal_id, records.len());
    Ok(records)
}

/// Extract the top-level `data` array of a response
fn data_rows(body: &str) -> QueryResult<Vec<Value>> {
    let mut response: Value = serde_json::from_str(body)?;
    match response.get_mut(services::DATA_KEY).map(Value::take) {
        Some(Value::Array(rows)) => Ok(rows),
        _ => Err(QueryError::MissingData {
            key: services::DATA_KEY.to_string(),
        }),
    }
}

/// Read the count cell from the first row of a count-mode response
pub fn parse_count(body: &str) -> QueryResult<u64> {
    let rows = data_rows(body)?;
    let first = rows.first().ok_or(QueryError::EmptyCount)?;
    let cell = first
        .get(services::COUNT_COLUMN_KEY)
        .ok_or(QueryError::EmptyCount)?;

    let count = match cell {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    count.ok_or_else(|| QueryError::InvalidCount {
        value: cell.to_string(),
    })
}

/// Deserialize every row of a response's `data` array
pub fn parse_rows<T: DeserializeOwned>(body: &str) -> QueryResult<Vec<T>> {
    data_rows(body)?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(QueryError::from))
        .collect()
}
