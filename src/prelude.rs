//! Prelude module for MAST Fetcher Library
//!
//! This module re-exports the most commonly used items from the library,
//! providing a convenient way to import everything needed for typical usage
//! with a single `use mast_fetcher::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use mast_fetcher::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // All common types are now available
//!     let service: Arc<dyn ArchiveService> = Arc::new(MastClient::new()?);
//!     let engine = DownloadEngine::new(Arc::clone(&service), EngineConfig::default());
//!     let controller = SessionController::new(service, engine, SessionConfig::default());
//!
//!     // Continue with an Operator implementation...
//!     let _ = controller;
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Essential app components that are used in most integrations
pub use crate::app::{
    // Transport
    ArchiveService,
    ClientConfig,
    MastClient,

    // Session orchestration
    Operator,
    SessionConfig,
    SessionController,
    SessionSummary,

    // Downloading
    DownloadEngine,
    DownloadReport,
    EngineConfig,

    // Data types
    ObservationRecord,
    ProductRecord,
    ProductSet,
    ProposalId,

    // Pipeline functions
    count_observations,
    fetch_observations,
    select_latest,
    summarize_products,
};

// Configuration
pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{DEFAULT_MAX_RESULTS, DEFAULT_SERVER, DEFAULT_TELESCOPE, USER_AGENT};

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;

// Common external crate re-exports for convenience
pub use tokio;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        // Verify that all essential types are available through prelude
        let _client_config = ClientConfig::default();
        let _engine_config = EngineConfig::default();
        let session_config = SessionConfig::default();
        let _app_config = AppConfig::default();

        // Test that constants are available
        assert_eq!(session_config.max_results, DEFAULT_MAX_RESULTS);
        assert_eq!(DEFAULT_TELESCOPE, "JWST");
        assert!(USER_AGENT.contains("MAST-Fetcher"));
    }

    #[test]
    fn test_prelude_integration_pattern() {
        // Test that the common integration pattern works with prelude imports
        let service: Arc<dyn ArchiveService> = Arc::new(MastClient::new().unwrap());
        let engine = DownloadEngine::new(Arc::clone(&service), EngineConfig::default());
        let controller = SessionController::new(service, engine, SessionConfig::default());

        assert_eq!(controller.config().product_page_size, 100);
    }

    #[test]
    fn test_std_reexports() {
        // Test that standard library re-exports work
        let _path = PathBuf::from("/tmp/test");

        // Arc should be available for shared ownership patterns
        let data = Arc::new(42);
        assert_eq!(*data, 42);
    }
}
