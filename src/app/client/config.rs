//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of the HTTP client
//! used for both the query endpoint and the download endpoint.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{http, mast};
use crate::errors::{QueryError, QueryResult};

/// Configuration for the archive HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Archive server host (e.g. "mast.stsci.edu")
    pub server: String,
    /// Use HTTPS (disable only for local test servers)
    pub use_tls: bool,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
    /// Connect timeout (None = wait indefinitely)
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: mast::DEFAULT_SERVER.to_string(),
            use_tls: true,
            tcp_nodelay: true,
            connect_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Configuration pointed at a different server host
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Base URL of the archive server
    pub fn base_url(&self) -> QueryResult<Url> {
        let scheme = if self.use_tls { "https" } else { "http" };
        let raw = format!("{}://{}", scheme, self.server);
        Url::parse(&raw).map_err(|e| QueryError::InvalidUrl {
            url: raw,
            error: e.to_string(),
        })
    }

    /// Builds the HTTP client with the specified configuration
    ///
    /// No request timeout is set: a slow server stalls the caller (or the
    /// single download worker) until it answers.
    pub fn build_http_client(&self) -> QueryResult<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(http::ACCEPT_TEXT));

        let mut client_builder = Client::builder()
            .user_agent(http::USER_AGENT)
            .default_headers(headers)
            .tcp_nodelay(self.tcp_nodelay)
            .pool_max_idle_per_host(0);

        if let Some(timeout) = self.connect_timeout {
            client_builder = client_builder.connect_timeout(timeout);
        }

        client_builder.build().map_err(QueryError::Http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.server, mast::DEFAULT_SERVER);
        assert!(config.use_tls);
        assert!(config.connect_timeout.is_none());
    }

    #[test]
    fn test_base_url_scheme() {
        // Test that the scheme follows the TLS flag
        let config = ClientConfig::default().with_server("mast.stsci.edu");
        let url = config.base_url().unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("mast.stsci.edu"));

        let local = ClientConfig {
            use_tls: false,
            ..ClientConfig::default().with_server("127.0.0.1:8080")
        };
        let url = local.base_url().unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn test_base_url_rejects_garbage() {
        let config = ClientConfig::default().with_server("not a host");
        assert!(matches!(
            config.base_url(),
            Err(QueryError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_http_client_creation() {
        let config = ClientConfig {
            connect_timeout: Some(Duration::from_secs(10)),
            ..Default::default()
        };
        assert!(config.build_http_client().is_ok());
    }
}
