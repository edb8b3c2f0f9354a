//! PageScrape - web page to markdown scraping library
//!
//! This crate fetches web pages, selects their primary content region and
//! converts it to markdown, combining a batch of URLs into one document.
//!
//! ## Fetcher System
//!
//! Pages are retrieved through a pluggable fetcher system. The
//! [`FetcherRegistry`] dispatches each URL to the first fetcher that
//! matches it.
//!
//! Built-in fetchers:
//! - [`BrowserFetcher`] - headless Chrome for hosts that render client-side
//! - [`HttpFetcher`] - plain HTTP GET for everything else
//!
//! Every URL in a batch yields exactly one block in the output, whether it
//! succeeded or failed. Per-URL failures never abort the batch.

mod batch;
pub mod client;
mod convert;
mod error;
pub mod extract;
pub mod fetchers;
mod types;
pub mod writer;

pub use batch::{ScrapeStatus, Scraper, ScraperBuilder};
pub use client::{scrape, scrape_with_options, ScrapeOptions};
pub use convert::html_to_markdown;
pub use error::ScrapeError;
pub use extract::{extract_markdown, select_content};
pub use fetchers::{BrowserFetcher, Fetcher, FetcherRegistry, HttpFetcher};
pub use types::{FetchedPage, OutcomeKind, PageOutcome, PageSource, ScrapeReport};
pub use writer::{generate_filename_at, generate_unique_filename, save_content};

/// Default User-Agent string, matching a desktop Chrome browser
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
