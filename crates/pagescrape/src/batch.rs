//! Scraper builder and batch driver

use crate::client::ScrapeOptions;
use crate::error::ScrapeError;
use crate::extract::extract_markdown;
use crate::fetchers::FetcherRegistry;
use crate::types::{OutcomeKind, PageOutcome, PageSource, ScrapeReport};
use crate::writer::{generate_unique_filename, save_content};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Hint appended to launch failure blocks
const LAUNCH_HINT: &str = "Ensure Chrome or Chromium is installed and can be started.";

/// Status update during a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeStatus {
    /// Current phase ("fetch", "convert", "complete")
    pub phase: String,
    /// URL being processed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Zero-based position of the URL in the batch
    pub index: usize,
    /// Number of URLs in the batch
    pub total: usize,
}

impl ScrapeStatus {
    /// Create a new status with phase and position
    pub fn new(phase: impl Into<String>, index: usize, total: usize) -> Self {
        Self {
            phase: phase.into(),
            url: None,
            index,
            total,
        }
    }

    /// Set URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Builder for configuring a [`Scraper`]
#[derive(Debug, Clone, Default)]
pub struct ScraperBuilder {
    options: ScrapeOptions,
}

impl ScraperBuilder {
    /// Create a new builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.options.user_agent = Some(ua.into());
        self
    }

    /// Set the static-path request timeout
    pub fn static_timeout(mut self, timeout: Duration) -> Self {
        self.options.static_timeout = timeout;
        self
    }

    /// Set the dynamic-path navigation timeout
    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.options.navigation_timeout = timeout;
        self
    }

    /// Set the number of scroll steps per dynamic page
    pub fn scroll_steps(mut self, steps: u32) -> Self {
        self.options.scroll_steps = steps;
        self
    }

    /// Set the delay after each scroll step
    pub fn scroll_delay(mut self, delay: Duration) -> Self {
        self.options.scroll_delay = delay;
        self
    }

    /// Replace the hostname substrings that select the dynamic path
    pub fn dynamic_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.dynamic_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Add a hostname substring that selects the dynamic path
    pub fn dynamic_host(mut self, host: impl Into<String>) -> Self {
        self.options.dynamic_hosts.push(host.into());
        self
    }

    /// Use a specific Chrome/Chromium binary
    pub fn chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.chrome_executable = Some(path.into());
        self
    }

    /// Set the directory output files are written to
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.output_dir = dir.into();
        self
    }

    /// Build the scraper
    pub fn build(self) -> Scraper {
        Scraper::with_options(self.options)
    }
}

/// Configured scraper
///
/// Each batch gets its own fetcher registry, so at most one browser session
/// lives per call to [`Scraper::scrape`].
#[derive(Debug, Clone, Default)]
pub struct Scraper {
    options: ScrapeOptions,
}

impl Scraper {
    /// Create a new scraper builder
    pub fn builder() -> ScraperBuilder {
        ScraperBuilder::new()
    }

    /// Create a scraper from resolved options
    pub fn with_options(options: ScrapeOptions) -> Self {
        Self { options }
    }

    /// Options this scraper runs with
    pub fn options(&self) -> &ScrapeOptions {
        &self.options
    }

    /// Scrape every URL in order, producing exactly one outcome per URL
    pub async fn scrape<S: AsRef<str>>(&self, urls: &[S]) -> ScrapeReport {
        self.scrape_with_status(urls, |_| {}).await
    }

    /// Scrape every URL in order with status updates
    pub async fn scrape_with_status<S, F>(&self, urls: &[S], mut status_callback: F) -> ScrapeReport
    where
        S: AsRef<str>,
        F: FnMut(ScrapeStatus),
    {
        let registry = FetcherRegistry::with_defaults(&self.options);
        let mut report = ScrapeReport::default();
        let total = urls.len();

        for (index, url) in urls.iter().enumerate() {
            let url = url.as_ref();
            info!(url, "Scraping");
            status_callback(ScrapeStatus::new("fetch", index, total).with_url(url));

            let fetched = match registry.route(url) {
                Ok((parsed, fetcher)) => fetcher
                    .fetch(&parsed)
                    .await
                    .map_err(|e| (Some(fetcher.source()), e)),
                Err(e) => Err((None, e)),
            };

            let outcome = match fetched {
                Ok(page) => {
                    info!(
                        url = %page.url,
                        source = %page.source,
                        status = ?page.status_code,
                        bytes = page.html.len(),
                        "Fetched page"
                    );
                    status_callback(ScrapeStatus::new("convert", index, total).with_url(url));
                    match extract_markdown(&page.html, page.source) {
                        Ok(markdown) => PageOutcome::content(url, page.source, markdown),
                        Err(e) => record_failure(&mut report, url, Some(page.source), e),
                    }
                }
                Err((source, e)) => record_failure(&mut report, url, source, e),
            };
            report.pages.push(outcome);
        }

        for e in registry.shutdown().await {
            report.errors.push(e.to_string());
        }

        status_callback(ScrapeStatus::new("complete", total, total));
        info!(
            pages = report.pages.len(),
            failed = report.error_count(),
            "Batch complete"
        );
        report
    }

    /// Write the combined markdown of `report` to a timestamped file
    ///
    /// Returns `None` without writing when the report has no markdown.
    pub async fn save_report(
        &self,
        report: &ScrapeReport,
        base_name: Option<&str>,
    ) -> Result<Option<PathBuf>, ScrapeError> {
        let markdown = report.markdown();
        if markdown.trim().is_empty() {
            return Ok(None);
        }
        let filename = generate_unique_filename(base_name);
        let path = save_content(&self.options.output_dir, &filename, &markdown).await?;
        Ok(Some(path))
    }

    /// Scrape the batch and save it in one step
    pub async fn scrape_to_file<S: AsRef<str>>(
        &self,
        urls: &[S],
        base_name: Option<&str>,
    ) -> Result<(ScrapeReport, Option<PathBuf>), ScrapeError> {
        let report = self.scrape(urls).await;
        let path = self.save_report(&report, base_name).await?;
        Ok((report, path))
    }
}

fn classify(err: &ScrapeError) -> OutcomeKind {
    match err {
        ScrapeError::BrowserLaunch(_) => OutcomeKind::LaunchFailed,
        ScrapeError::InvalidUrlScheme => OutcomeKind::HttpError,
        e if e.is_http() => OutcomeKind::HttpError,
        _ => OutcomeKind::Unexpected,
    }
}

/// Log a per-URL failure, add it to the error list and build its block
fn record_failure(
    report: &mut ScrapeReport,
    url: &str,
    source: Option<PageSource>,
    err: ScrapeError,
) -> PageOutcome {
    let kind = classify(&err);
    let body = match kind {
        OutcomeKind::LaunchFailed => {
            // One entry per batch; every dynamic URL shares the same cause.
            let message = err.to_string();
            if !report.errors.contains(&message) {
                report.errors.push(message);
            }
            format!("{}. {}", err, LAUNCH_HINT)
        }
        OutcomeKind::HttpError => {
            report.errors.push(format!("Error scraping {}: {}", url, err));
            err.to_string()
        }
        _ => {
            report.errors.push(format!(
                "An unexpected error occurred while processing {}: {}",
                url, err
            ));
            err.to_string()
        }
    };
    warn!(url, error = %err, "Failed to scrape page");
    PageOutcome::failure(url, source, kind, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scraper_builder() {
        let scraper = Scraper::builder()
            .user_agent("TestAgent/1.0")
            .scroll_steps(2)
            .scroll_delay(Duration::from_millis(10))
            .dynamic_hosts(["spa.test"])
            .dynamic_host("app.test")
            .chrome_executable("/opt/chrome")
            .output_dir("/tmp/out")
            .build();

        let options = scraper.options();
        assert_eq!(options.user_agent(), "TestAgent/1.0");
        assert_eq!(options.scroll_steps, 2);
        assert_eq!(options.scroll_delay, Duration::from_millis(10));
        assert_eq!(options.dynamic_hosts, vec!["spa.test", "app.test"]);
        assert_eq!(options.chrome_executable, Some(PathBuf::from("/opt/chrome")));
        assert_eq!(options.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify(&ScrapeError::BrowserLaunch("x".into())),
            OutcomeKind::LaunchFailed
        );
        assert_eq!(
            classify(&ScrapeError::HttpStatus {
                status: 404,
                reason: "Not Found".into()
            }),
            OutcomeKind::HttpError
        );
        assert_eq!(classify(&ScrapeError::InvalidUrlScheme), OutcomeKind::HttpError);
        assert_eq!(
            classify(&ScrapeError::Navigation("x".into())),
            OutcomeKind::Unexpected
        );
        assert_eq!(classify(&ScrapeError::EmptyContent), OutcomeKind::Unexpected);
    }

    #[test]
    fn test_launch_failure_recorded_once() {
        let mut report = ScrapeReport::default();
        for url in ["https://www.reddit.com/a", "https://www.reddit.com/b"] {
            let outcome = record_failure(
                &mut report,
                url,
                Some(PageSource::Dynamic),
                ScrapeError::BrowserLaunch("no chrome".into()),
            );
            assert_eq!(outcome.kind, OutcomeKind::LaunchFailed);
            assert!(outcome.body.contains("Headless browser launch failed"));
            report.pages.push(outcome);
        }
        assert_eq!(report.errors, vec!["Headless browser launch failed: no chrome"]);
        assert_eq!(report.pages.len(), 2);
    }

    #[test]
    fn test_scrape_status() {
        let status = ScrapeStatus::new("fetch", 1, 3).with_url("https://example.com");
        assert_eq!(status.phase, "fetch");
        assert_eq!(status.url.as_deref(), Some("https://example.com"));
        assert_eq!(status.index, 1);
        assert_eq!(status.total, 3);
    }

    #[tokio::test]
    async fn test_save_report_skips_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let scraper = Scraper::builder().output_dir(tmp.path()).build();
        let path = scraper
            .save_report(&ScrapeReport::default(), Some("empty"))
            .await
            .unwrap();
        assert!(path.is_none());
        assert!(std::fs::read_dir(tmp.path()).unwrap().next().is_none());
    }
}
