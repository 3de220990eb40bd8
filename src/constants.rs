//! Application constants for MAST Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

/// Environment variable names for configuration overrides
pub mod env {
    /// Telescope/mission collection to search
    pub const TELESCOPE: &str = "MAST_TELESCOPE";

    /// Archive server host
    pub const SERVER: &str = "MAST_SERVER";

    /// Root directory for downloaded products
    pub const OUTPUT_DIR: &str = "MAST_OUTPUT_DIR";

    /// Upper bound on acceptable count-query results
    pub const MAX_RESULTS: &str = "MAST_MAX_RESULTS";
}

/// MAST archive endpoints and defaults
pub mod mast {
    /// Default telescope/mission collection
    pub const DEFAULT_TELESCOPE: &str = "JWST";

    /// Default archive server host
    pub const DEFAULT_SERVER: &str = "masttest.stsci.edu";

    /// Path of the query invocation endpoint
    pub const INVOKE_PATH: &str = "/api/v0/invoke";

    /// Path of the file download endpoint (takes a `uri` query parameter)
    pub const DOWNLOAD_PATH: &str = "/api/v0/download/file";

    /// Form field carrying the URL-escaped JSON request
    pub const REQUEST_FIELD: &str = "request";
}

/// Service names and request shapes understood by the query endpoint
pub mod services {
    /// Filtered observation search
    pub const FILTERED: &str = "Mast.Caom.Filtered";

    /// Products attached to a single observation
    pub const PRODUCTS: &str = "Mast.Caom.Products";

    /// Response format requested from every service
    pub const FORMAT_JSON: &str = "json";

    /// Column selector for count-only queries
    pub const COUNT_COLUMNS: &str = "COUNT_BIG(*)";

    /// Column selector for full record queries
    pub const ALL_COLUMNS: &str = "*";

    /// Filter name for the collection (telescope/mission)
    pub const COLLECTION_FILTER: &str = "obs_collection";

    /// Filter name for the proposal identifier
    pub const PROPOSAL_FILTER: &str = "proposal_id";

    /// Key of the single cell returned by a count query
    pub const COUNT_COLUMN_KEY: &str = "Column1";

    /// Top-level array holding result rows
    pub const DATA_KEY: &str = "data";
}

/// HTTP client configuration constants
pub mod http {
    /// Identifying user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("MAST-Fetcher/", env!("CARGO_PKG_VERSION"));

    /// Content type of query submissions
    pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

    /// Accept header of query submissions
    pub const ACCEPT_TEXT: &str = "text/plain";
}

/// Session limits
pub mod limits {
    /// Largest count-query result accepted before re-prompting
    pub const DEFAULT_MAX_RESULTS: u64 = 50_000;

    /// Rows requested from the products service (single page only)
    pub const PRODUCT_PAGE_SIZE: u32 = 100;

    /// Input that ends the session at the proposal-id prompt
    pub const QUIT_SENTINEL: &str = "q";
}

/// File operation constants
pub mod files {
    /// Default root directory for downloaded products
    pub const DEFAULT_OUTPUT_ROOT: &str = "mastFiles";

    /// Project-local configuration file name
    pub const LOCAL_CONFIG_FILE: &str = "mast-fetcher.toml";

    /// Directory under the user config dir holding the config file
    pub const CONFIG_DIR_NAME: &str = "mast-fetcher";
}

/// Size display constants
pub mod size {
    /// Divisor between adjacent display units
    pub const UNIT_STEP: u64 = 1000;

    /// Largest value (in the current unit) shown without another division
    pub const MAX_DISPLAY_DIGITS: usize = 3;
}

// Re-export commonly used constants at the top level for convenience
pub use env::{MAX_RESULTS as ENV_MAX_RESULTS, SERVER as ENV_SERVER, TELESCOPE as ENV_TELESCOPE};
pub use http::USER_AGENT;
pub use limits::{DEFAULT_MAX_RESULTS, PRODUCT_PAGE_SIZE, QUIT_SENTINEL};
pub use mast::{DEFAULT_SERVER, DEFAULT_TELESCOPE};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths_are_absolute() {
        assert!(mast::INVOKE_PATH.starts_with('/'));
        assert!(mast::DOWNLOAD_PATH.starts_with('/'));
    }

    #[test]
    fn test_user_agent_identifies_tool() {
        assert!(USER_AGENT.starts_with("MAST-Fetcher/"));
        assert!(USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_default_limits() {
        assert_eq!(DEFAULT_MAX_RESULTS, 50_000);
        assert_eq!(PRODUCT_PAGE_SIZE, 100);
        assert_eq!(QUIT_SENTINEL, "q");
    }
}
