//! Scrape options and convenience entry points
//!
//! The batch logic lives in [`Scraper`](crate::Scraper); the functions here
//! build one with default or caller-supplied options.

use crate::batch::Scraper;
use crate::types::ScrapeReport;
use crate::writer::DEFAULT_OUTPUT_DIR;
use crate::DEFAULT_USER_AGENT;
use std::path::PathBuf;
use std::time::Duration;

/// Total timeout for a static-path request
pub const STATIC_TIMEOUT: Duration = Duration::from_secs(15);

/// Navigation timeout for a dynamic-path page
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Number of scroll-to-bottom steps on dynamic pages
pub const SCROLL_STEPS: u32 = 5;

/// Delay after each scroll step
pub const SCROLL_DELAY: Duration = Duration::from_secs(3);

/// Hostname substrings routed to the headless browser by default
pub const DEFAULT_DYNAMIC_HOSTS: &[&str] = &["reddit.com"];

/// Options shared by the fetchers and the writer
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Custom User-Agent for both fetch paths
    pub user_agent: Option<String>,
    /// Total timeout for static fetches
    pub static_timeout: Duration,
    /// Navigation timeout for dynamic fetches
    pub navigation_timeout: Duration,
    /// Scroll-to-bottom steps per dynamic page
    pub scroll_steps: u32,
    /// Delay after each scroll step
    pub scroll_delay: Duration,
    /// Hostname substrings that select the dynamic path
    pub dynamic_hosts: Vec<String>,
    /// Chrome/Chromium binary; auto-detected when unset
    pub chrome_executable: Option<PathBuf>,
    /// Directory output files are written to
    pub output_dir: PathBuf,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            static_timeout: STATIC_TIMEOUT,
            navigation_timeout: NAVIGATION_TIMEOUT,
            scroll_steps: SCROLL_STEPS,
            scroll_delay: SCROLL_DELAY,
            dynamic_hosts: DEFAULT_DYNAMIC_HOSTS
                .iter()
                .map(|h| h.to_string())
                .collect(),
            chrome_executable: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl ScrapeOptions {
    /// Effective User-Agent
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

/// Scrape a batch of URLs with default options
///
/// For custom options, use [`scrape_with_options`] or [`Scraper::builder`].
pub async fn scrape<S: AsRef<str>>(urls: &[S]) -> ScrapeReport {
    scrape_with_options(urls, ScrapeOptions::default()).await
}

/// Scrape a batch of URLs with custom options
pub async fn scrape_with_options<S: AsRef<str>>(
    urls: &[S],
    options: ScrapeOptions,
) -> ScrapeReport {
    Scraper::with_options(options).scrape(urls).await
}
