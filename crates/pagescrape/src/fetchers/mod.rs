//! Fetcher system for retrieving raw page HTML
//!
//! Design: Each fetcher handles specific URL patterns with its own transport.
//! FetcherRegistry dispatches to the first matching fetcher.

mod browser;
mod http;

pub use browser::BrowserFetcher;
pub use http::HttpFetcher;

use crate::client::ScrapeOptions;
use crate::error::ScrapeError;
use crate::types::{FetchedPage, PageSource};
use async_trait::async_trait;
use url::Url;

/// Trait for page fetchers
///
/// Each fetcher declares what URLs it can handle via `matches()` and
/// retrieves the page HTML via `fetch()`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Unique identifier for this fetcher (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Path pages fetched by this fetcher are reported under
    fn source(&self) -> PageSource;

    /// Returns true if this fetcher can handle the given URL
    ///
    /// More specific fetchers should be registered before generic ones.
    fn matches(&self, url: &Url) -> bool;

    /// Fetch the raw HTML of the URL
    ///
    /// Called only if `matches()` returned true.
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, ScrapeError>;

    /// Release any resources held across fetches
    async fn shutdown(&self) -> Result<(), ScrapeError> {
        Ok(())
    }
}

/// Registry of fetchers that dispatches to the appropriate handler
///
/// Maintains an ordered list of fetchers. When fetching a URL, iterates
/// through fetchers and uses the first one that matches.
pub struct FetcherRegistry {
    fetchers: Vec<Box<dyn Fetcher>>,
}

impl Default for FetcherRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FetcherRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            fetchers: Vec::new(),
        }
    }

    /// Create a registry with the built-in fetchers configured from `options`
    ///
    /// Includes (in order of priority):
    /// 1. BrowserFetcher - hosts that need script execution
    /// 2. HttpFetcher - every other HTTP/HTTPS URL
    pub fn with_defaults(options: &ScrapeOptions) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(BrowserFetcher::new(options)));
        registry.register(Box::new(HttpFetcher::new(options)));
        registry
    }

    /// Register a fetcher
    ///
    /// Fetchers are checked in registration order.
    pub fn register(&mut self, fetcher: Box<dyn Fetcher>) {
        self.fetchers.push(fetcher);
    }

    /// Validate `url` and find the fetcher that handles it
    pub fn route(&self, url: &str) -> Result<(Url, &dyn Fetcher), ScrapeError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ScrapeError::InvalidUrlScheme);
        }
        let parsed = Url::parse(url).map_err(|_| ScrapeError::InvalidUrlScheme)?;

        let fetcher = self
            .fetchers
            .iter()
            .find(|f| f.matches(&parsed))
            .ok_or_else(|| ScrapeError::RequestError("No fetcher available for URL".to_string()))?;

        tracing::debug!(fetcher = fetcher.name(), url = %url, "Using fetcher");
        Ok((parsed, fetcher.as_ref()))
    }

    /// Fetch a URL using the appropriate fetcher
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, ScrapeError> {
        let (parsed, fetcher) = self.route(url)?;
        fetcher.fetch(&parsed).await
    }

    /// Shut down every registered fetcher, collecting failures
    pub async fn shutdown(&self) -> Vec<ScrapeError> {
        let mut errors = Vec::new();
        for fetcher in &self.fetchers {
            if let Err(e) = fetcher.shutdown().await {
                tracing::warn!(fetcher = fetcher.name(), error = %e, "Fetcher shutdown failed");
                errors.push(e);
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_with_defaults() {
        let registry = FetcherRegistry::with_defaults(&ScrapeOptions::default());
        assert_eq!(registry.fetchers.len(), 2);
        assert_eq!(registry.fetchers[0].name(), "browser");
        assert_eq!(registry.fetchers[1].name(), "http");
    }

    #[test]
    fn test_empty_registry() {
        let registry = FetcherRegistry::new();
        assert!(registry.fetchers.is_empty());
        assert!(matches!(
            registry.route("https://example.com"),
            Err(ScrapeError::RequestError(_))
        ));
    }

    #[test]
    fn test_route_dispatch() {
        let registry = FetcherRegistry::with_defaults(&ScrapeOptions::default());

        let (_, fetcher) = registry
            .route("https://www.reddit.com/r/rust/comments/abc")
            .unwrap();
        assert_eq!(fetcher.source(), PageSource::Dynamic);

        let (url, fetcher) = registry.route("https://example.com/page").unwrap();
        assert_eq!(fetcher.source(), PageSource::Static);
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_route_rejects_bad_scheme() {
        let registry = FetcherRegistry::with_defaults(&ScrapeOptions::default());
        assert!(matches!(
            registry.route("ftp://example.com"),
            Err(ScrapeError::InvalidUrlScheme)
        ));
        assert!(matches!(
            registry.route("not a url"),
            Err(ScrapeError::InvalidUrlScheme)
        ));
        assert!(matches!(
            registry.route("http://"),
            Err(ScrapeError::InvalidUrlScheme)
        ));
    }
}
