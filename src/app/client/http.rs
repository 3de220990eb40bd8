//! Core HTTP operations against the MAST server
//!
//! Every call is a single attempt: there is no retry, no backoff and no
//! request timeout. Failures are surfaced to the caller as typed errors.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

use crate::constants::{http, mast};
use crate::errors::{DownloadError, DownloadResult, QueryError, QueryResult};

/// HTTP operations handler
#[derive(Debug, Clone)]
pub struct HttpHandler {
    client: Client,
    base_url: Url,
}

impl HttpHandler {
    /// Creates a new HttpHandler for the given server base URL
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// URL of the query invocation endpoint
    pub fn invoke_url(&self) -> QueryResult<Url> {
        self.base_url
            .join(mast::INVOKE_PATH)
            .map_err(|e| QueryError::InvalidUrl {
                url: format!("{}{}", self.base_url, mast::INVOKE_PATH),
                error: e.to_string(),
            })
    }

    /// URL of the download endpoint for an archive URI
    ///
    /// The URI is appended verbatim as the `uri` query parameter.
    pub fn download_url(&self, uri: &str) -> DownloadResult<Url> {
        let raw = format!(
            "{}{}?uri={}",
            self.base_url.as_str().trim_end_matches('/'),
            mast::DOWNLOAD_PATH,
            uri
        );
        Url::parse(&raw).map_err(|e| DownloadError::InvalidUrl {
            url: raw,
            error: e.to_string(),
        })
    }

    /// POST a form body to the invocation endpoint and return the response text
    pub async fn post_form(&self, body: String) -> QueryResult<String> {
        let url = self.invoke_url()?;
        tracing::debug!("POST {} ({} bytes)", url, body.len());

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, http::FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QueryError::ServerError {
                status: response.status().as_u16(),
            });
        }

        let text = response.text().await?;
        tracing::debug!("Query response received ({} bytes)", text.len());
        Ok(text)
    }

    /// GET a file from the download endpoint and return its bytes
    pub async fn get_file(&self, uri: &str) -> DownloadResult<Vec<u8>> {
        let url = self.download_url(uri)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(DownloadError::ServerError {
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::client::config::ClientConfig;

    fn handler() -> HttpHandler {
        let config = ClientConfig::default().with_server("mast.stsci.edu");
        HttpHandler::new(
            config.build_http_client().unwrap(),
            config.base_url().unwrap(),
        )
    }

    #[test]
    fn test_invoke_url() {
        let url = handler().invoke_url().unwrap();
        assert_eq!(url.as_str(), "https://mast.stsci.edu/api/v0/invoke");
    }

    #[test]
    fn test_download_url_keeps_uri_verbatim() {
        // Test that the archive URI lands unchanged in the query string
        let url = handler()
            .download_url("mast:JWST/product/jw01234_cal.fits")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://mast.stsci.edu/api/v0/download/file?uri=mast:JWST/product/jw01234_cal.fits"
        );
        assert_eq!(url.path(), mast::DOWNLOAD_PATH);
    }
}
