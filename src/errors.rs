//! Error types for MAST Fetcher
//!
//! This module defines the error types for all components of the application.
//! Conditions the session recovers from locally (bad input, empty result sets,
//! missing timing data, oversize downloads) are modelled here so the core can
//! name them, but the session controller turns them into state transitions
//! rather than propagating them.

use std::path::PathBuf;
use thiserror::Error;

/// Query Client errors
#[derive(Error, Debug)]
pub enum QueryError {
    /// Proposal identifier is not an integer
    #[error("Proposal ID must be an integer, got '{input}'")]
    InvalidProposalId { input: String },

    /// Operator entered the quit sentinel
    #[error("Quit requested")]
    QuitRequested,

    /// HTTP request failed
    #[error("Query request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned error status
    #[error("Query server error: HTTP {status}")]
    ServerError { status: u16 },

    /// Invalid URL for the query endpoint
    #[error("Invalid query URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Response body was not valid JSON (or a row had an unexpected shape)
    #[error("Failed to parse query response: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Response JSON lacked the top-level data array
    #[error("Query response has no '{key}' array")]
    MissingData { key: String },

    /// Count query returned no rows
    #[error("Count query returned an empty result set")]
    EmptyCount,

    /// Count cell could not be read as a non-negative integer
    #[error("Count query returned a non-numeric count: {value}")]
    InvalidCount { value: String },
}

/// Observation Selector errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// None of the matched observations carries a start time
    #[error("Data entries do not contain timing information! ({records} records without t_min)")]
    NoTimingInformation { records: usize },
}

/// Product Resolver errors
#[derive(Error, Debug)]
pub enum ProductError {
    /// Products query failed
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Total size needs more reductions than there are unit labels
    #[error("Total file size too large! ({total_bytes} bytes)")]
    SizeOverflow { total_bytes: u64 },
}

/// Download Engine errors (per file)
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error during file operations
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid URL provided
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Server returned error status
    #[error("Server error: HTTP {status}")]
    ServerError { status: u16 },

    /// Write completed but the file is not on disk
    #[error("File missing after write: {path}")]
    MissingAfterWrite { path: PathBuf },

    /// Worker task panicked or was cancelled
    #[error("Download worker terminated unexpectedly: {reason}")]
    WorkerFailed { reason: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be rendered as TOML
    #[error("Failed to serialize configuration")]
    Serialize(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Could not determine the user configuration directory
    #[error("Could not determine user config directory")]
    NoConfigDir,

    /// I/O error reading or writing configuration
    #[error("Configuration file I/O error: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Session Controller errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// Reading or writing to the operator failed
    #[error("Operator I/O failed")]
    Input(#[source] std::io::Error),

    /// Operator input stream ended
    #[error("Operator input closed")]
    InputClosed,
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Query error
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Product resolution error
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable (transient)
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Query(QueryError::Http(_))
            | AppError::Query(QueryError::ServerError { .. })
            | AppError::Product(ProductError::Query(QueryError::Http(_)))
            | AppError::Product(ProductError::Query(QueryError::ServerError { .. }))
            | AppError::Download(DownloadError::Http(_))
            | AppError::Download(DownloadError::ServerError { .. }) => true,

            AppError::Query(QueryError::JsonParse(_))
            | AppError::Config(_)
            | AppError::Session(_) => false,

            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Query(_) => "query",
            AppError::Product(_) => "products",
            AppError::Download(_) => "download",
            AppError::Config(_) => "config",
            AppError::Session(_) => "session",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Query result type alias
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Product result type alias
pub type ProductResult<T> = std::result::Result<T, ProductError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Session result type alias
pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        // Test that each wrapped error reports its category
        let query = AppError::from(QueryError::EmptyCount);
        assert_eq!(query.category(), "query");

        let product = AppError::from(ProductError::SizeOverflow {
            total_bytes: 1_000_000_000_000,
        });
        assert_eq!(product.category(), "products");

        let session = AppError::from(SessionError::InputClosed);
        assert_eq!(session.category(), "session");
    }

    #[test]
    fn test_recoverability() {
        // Server-side failures are transient, malformed data is not
        let server = AppError::from(QueryError::ServerError { status: 503 });
        assert!(server.is_recoverable());

        let invalid = AppError::from(QueryError::InvalidCount {
            value: "\"abc\"".to_string(),
        });
        assert!(!invalid.is_recoverable());

        let config = AppError::from(ConfigError::NoConfigDir);
        assert!(!config.is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = QueryError::InvalidProposalId {
            input: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Proposal ID must be an integer, got 'abc'");

        let err = SelectionError::NoTimingInformation { records: 2 };
        assert!(err.to_string().contains("timing information"));

        let err = ProductError::SizeOverflow {
            total_bytes: 1_000_000_000_000,
        };
        assert!(err.to_string().starts_with("Total file size too large!"));
    }
}
