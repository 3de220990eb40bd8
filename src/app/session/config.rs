//! Session controller configuration

use serde::{Deserialize, Serialize};

use crate::constants::{limits, mast};

/// Configuration for the session controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Collection (telescope/mission) searched for every proposal
    pub telescope: String,
    /// Largest count-query result accepted before re-prompting
    pub max_results: u64,
    /// Rows requested from the products service
    pub product_page_size: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            telescope: mast::DEFAULT_TELESCOPE.to_string(),
            max_results: limits::DEFAULT_MAX_RESULTS,
            product_page_size: limits::PRODUCT_PAGE_SIZE,
        }
    }
}

impl SessionConfig {
    /// Search a different collection
    pub fn with_telescope(mut self, telescope: impl Into<String>) -> Self {
        self.telescope = telescope.into();
        self
    }

    /// Change the accepted result bound
    pub fn with_max_results(mut self, max_results: u64) -> Self {
        self.max_results = max_results;
        self
    }

    /// Whether a count-query result can be inspected
    pub fn accepts_count(&self, count: u64) -> bool {
        count > 0 && count <= self.max_results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_count_range() {
        let config = SessionConfig::default();
        assert!(!config.accepts_count(0));
        assert!(config.accepts_count(1));
        assert!(config.accepts_count(50_000));
        assert!(!config.accepts_count(50_001));
    }

    #[test]
    fn test_custom_bound() {
        let config = SessionConfig::default()
            .with_telescope("HST")
            .with_max_results(10);
        assert_eq!(config.telescope, "HST");
        assert!(config.accepts_count(10));
        assert!(!config.accepts_count(11));
    }
}
