//! Core application logic for MAST Fetcher
//!
//! This module contains the reusable core: the archive client, the query
//! client, observation selection, product resolution, the concurrent
//! download engine and the session state machine that ties them together.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mast_fetcher::app::{
//!     count_observations, select_latest, fetch_observations, summarize_products,
//!     ArchiveService, DownloadEngine, EngineConfig, MastClient, ProposalId,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client: Arc<dyn ArchiveService> = Arc::new(MastClient::new()?);
//! let proposal = ProposalId::parse("1234")?;
//!
//! let count = count_observations(client.as_ref(), "JWST", &proposal).await?;
//! println!("{} observations", count);
//!
//! let records = fetch_observations(client.as_ref(), "JWST", &proposal).await?;
//! let latest = select_latest(&records)?;
//! let products = summarize_products(client.as_ref(), &latest.obsid, 100).await?;
//! println!("{}", products.summary_line());
//!
//! let engine = DownloadEngine::new(client, EngineConfig::default());
//! let report = engine.download_all(&products.products).await;
//! println!("{}", report.summary_line());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod download;
pub mod models;
pub mod products;
pub mod query;
pub mod selector;
pub mod session;

// Re-export main public API
pub use client::{ArchiveService, ClientConfig, MastClient};
pub use download::{DownloadEngine, DownloadOutcome, DownloadReport, EngineConfig};
pub use models::{total_size, ObservationRecord, ProductRecord};
pub use products::{resolve_products, summarize_products, DisplaySize, ProductSet, SizeUnit};
pub use query::{
    count_observations, fetch_observations, query, ColumnSelector, ProposalId, QueryMode,
    QueryOutcome, RequestParams, SearchRequest,
};
pub use selector::{mjd_to_isot, select_latest, ObservationSummary};
pub use session::{Operator, SessionConfig, SessionController, SessionState, SessionSummary};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Ensure public API is accessible
        let config = ClientConfig::default();
        assert!(config.tcp_nodelay);
        assert_eq!(SessionConfig::default().telescope, "JWST");
    }
}
