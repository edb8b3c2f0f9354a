//! Static HTTP fetcher
//!
//! Handles any HTTP/HTTPS URL with a single GET and no script execution.
//! This is the fallback fetcher for URLs not matched by the browser fetcher.

use crate::client::ScrapeOptions;
use crate::error::ScrapeError;
use crate::fetchers::Fetcher;
use crate::types::{FetchedPage, PageSource};
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Static HTTP fetcher
///
/// Issues a GET with a browser-like User-Agent and a bounded total timeout.
/// Any non-2xx status is a failure.
pub struct HttpFetcher {
    user_agent: String,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher
    pub fn new(options: &ScrapeOptions) -> Self {
        Self {
            user_agent: options.user_agent().to_string(),
            timeout: options.static_timeout,
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"),
        );
        headers
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(&ScrapeOptions::default())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    fn source(&self) -> PageSource {
        PageSource::Static
    }

    fn matches(&self, url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, ScrapeError> {
        let client = reqwest::Client::builder()
            .default_headers(self.headers())
            .timeout(self.timeout)
            .build()
            .map_err(ScrapeError::ClientBuildError)?;

        let response = client
            .get(url.as_str())
            .send()
            .await
            .map_err(ScrapeError::from_reqwest)?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "Received response");
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let html = response.text().await.map_err(ScrapeError::from_reqwest)?;
        if html.trim().is_empty() {
            return Err(ScrapeError::EmptyContent);
        }

        Ok(FetchedPage {
            url: url.to_string(),
            source: PageSource::Static,
            status_code: Some(status.as_u16()),
            html,
        })
    }
}
