//! Error types for PageScrape

use thiserror::Error;

/// Errors that can occur while scraping a single page or writing output
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// URL has invalid scheme or does not parse
    #[error("Invalid URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request did not complete within the static fetch timeout
    #[error("Request timed out")]
    Timeout,

    /// Failed to connect to server
    #[error("Failed to connect to server: {0}")]
    ConnectError(#[source] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTP error: {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Headless browser could not be started
    #[error("Headless browser launch failed: {0}")]
    BrowserLaunch(String),

    /// Page navigation or rendering failed in the headless browser
    #[error("Browser navigation failed: {0}")]
    Navigation(String),

    /// Closing the headless browser session failed
    #[error("Error closing headless browser: {0}")]
    BrowserClose(String),

    /// Fetch succeeded but produced no HTML
    #[error("Failed to retrieve page content")]
    EmptyContent,

    /// HTML to markdown conversion failed
    #[error("Markdown conversion failed: {0}")]
    Conversion(String),

    /// Writing the output file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScrapeError::Timeout
        } else if err.is_connect() {
            ScrapeError::ConnectError(err)
        } else if let Some(status) = err.status() {
            ScrapeError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            }
        } else {
            ScrapeError::RequestError(err.to_string())
        }
    }

    /// True for failures of the plain HTTP path (transport or status)
    pub fn is_http(&self) -> bool {
        matches!(
            self,
            ScrapeError::ClientBuildError(_)
                | ScrapeError::Timeout
                | ScrapeError::ConnectError(_)
                | ScrapeError::HttpStatus { .. }
                | ScrapeError::RequestError(_)
        )
    }
}
