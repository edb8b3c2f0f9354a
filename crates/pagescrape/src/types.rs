//! Core types for PageScrape

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator line written after every block
pub const BLOCK_SEPARATOR: &str = "---";

/// Path a page was fetched through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSource {
    /// Plain HTTP GET, no script execution
    Static,
    /// Rendered by a headless browser
    Dynamic,
}

impl fmt::Display for PageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSource::Static => write!(f, "static"),
            PageSource::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// Raw HTML returned by a fetcher
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The requested URL
    pub url: String,
    /// Which path produced the HTML
    pub source: PageSource,
    /// HTTP status code (static path only)
    pub status_code: Option<u16>,
    /// The page HTML
    pub html: String,
}

/// Classification of a per-URL outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Markdown was extracted
    Content,
    /// Static-path transport or status failure
    HttpError,
    /// Headless browser could not be launched
    LaunchFailed,
    /// Any other failure
    Unexpected,
}

/// Result for one URL of a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageOutcome {
    /// The requested URL
    pub url: String,
    /// Fetch path chosen for the URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PageSource>,
    /// Outcome classification
    pub kind: OutcomeKind,
    /// Markdown on success, error message otherwise
    pub body: String,
}

impl PageOutcome {
    /// Successful outcome with converted markdown
    pub fn content(
        url: impl Into<String>,
        source: PageSource,
        markdown: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            source: Some(source),
            kind: OutcomeKind::Content,
            body: markdown.into(),
        }
    }

    /// Failed outcome
    pub fn failure(
        url: impl Into<String>,
        source: Option<PageSource>,
        kind: OutcomeKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            source,
            kind,
            body: message.into(),
        }
    }

    /// True if markdown was extracted
    pub fn is_content(&self) -> bool {
        self.kind == OutcomeKind::Content
    }

    /// Render this outcome as a markdown block, including the trailing separator
    pub fn to_block(&self) -> String {
        let heading = match self.kind {
            OutcomeKind::Content => "Content from",
            OutcomeKind::HttpError => "Error scraping",
            OutcomeKind::LaunchFailed => "Error processing",
            OutcomeKind::Unexpected => "Unexpected error processing",
        };
        format!(
            "# {} {}\n\n{}\n\n{}\n\n",
            heading,
            self.url,
            self.body.trim(),
            BLOCK_SEPARATOR
        )
    }
}

/// Aggregated result of a batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapeReport {
    /// One outcome per requested URL, in request order
    pub pages: Vec<PageOutcome>,
    /// Human-readable error messages collected during the batch
    pub errors: Vec<String>,
}

impl ScrapeReport {
    /// Combined markdown of all blocks
    pub fn markdown(&self) -> String {
        self.pages.iter().map(PageOutcome::to_block).collect()
    }

    /// Number of successful pages
    pub fn content_count(&self) -> usize {
        self.pages.iter().filter(|p| p.is_content()).count()
    }

    /// Number of failed pages
    pub fn error_count(&self) -> usize {
        self.pages.len() - self.content_count()
    }
}
