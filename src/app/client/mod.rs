//! HTTP client implementation for MAST archive interaction
//!
//! The core never talks to reqwest directly. It goes through the
//! [`ArchiveService`] trait, which has exactly the two remote operations the
//! fetcher needs: submitting a search request and fetching one file.
//! [`MastClient`] is the production implementation.
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: Core HTTP operations (single attempt, no timeout)

use async_trait::async_trait;
use url::Url;

use crate::app::query::SearchRequest;
use crate::errors::{DownloadResult, QueryResult};

// Module declarations
pub mod config;
pub mod http;

pub use config::ClientConfig;

use http::HttpHandler;

/// Remote operations offered by the archive
#[async_trait]
pub trait ArchiveService: Send + Sync {
    /// Submit a search request and return the raw JSON response text
    async fn submit(&self, request: &SearchRequest) -> QueryResult<String>;

    /// Fetch the bytes of the file identified by an archive URI
    async fn fetch_file(&self, uri: &str) -> DownloadResult<Vec<u8>>;
}

/// HTTP client for the MAST archive
#[derive(Debug, Clone)]
pub struct MastClient {
    http_handler: HttpHandler,
    base_url: Url,
}

impl MastClient {
    /// Creates a client with default configuration
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the server URL is invalid or the HTTP client
    /// cannot be built
    pub fn new() -> QueryResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration
    pub fn with_config(config: ClientConfig) -> QueryResult<Self> {
        let client = config.build_http_client()?;
        let base_url = config.base_url()?;
        let http_handler = HttpHandler::new(client, base_url.clone());

        tracing::info!("Created MAST client for {}", base_url);

        Ok(Self {
            http_handler,
            base_url,
        })
    }

    /// Get the base URL of the archive server
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl ArchiveService for MastClient {
    async fn submit(&self, request: &SearchRequest) -> QueryResult<String> {
        tracing::debug!("Submitting {} request", request.service());
        let body = request.to_form_body()?;
        self.http_handler.post_form(body).await
    }

    async fn fetch_file(&self, uri: &str) -> DownloadResult<Vec<u8>> {
        self.http_handler.get_file(uri).await
    }
}
