//! MAST Fetcher Library
//!
//! A Rust library for finding the most recent observation of a proposal in the
//! Mikulski Archive for Space Telescopes and downloading its data products.
//! Provides typed archive queries, observation selection, product resolution
//! and concurrent downloading behind an interactive session state machine.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        // Test that our constants are accessible
        assert_eq!(DEFAULT_MAX_RESULTS, 50_000);
        assert_eq!(ENV_TELESCOPE, "MAST_TELESCOPE");
        assert!(USER_AGENT.contains("MAST-Fetcher"));
    }

    #[test]
    fn test_error_types() {
        // Test that our error types work correctly
        let query_error = errors::QueryError::InvalidProposalId {
            input: "abc".to_string(),
        };
        let app_error = AppError::Query(query_error);

        assert_eq!(app_error.category(), "query");
        assert!(!app_error.is_recoverable());
    }
}
