//! Content region selection
//!
//! Picks the DOM subtree that holds a page's primary content before it is
//! converted to markdown. Selection follows a fixed priority list per fetch
//! path; the first selector that matches wins.

use crate::convert::html_to_markdown;
use crate::error::ScrapeError;
use crate::types::PageSource;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Custom element wrapping the main post on script-rendered pages
const POST_ELEMENT: &str = "shreddit-post";

/// Custom element wrapping a single comment
const COMMENT_ELEMENT: &str = "shreddit-comment";

/// Static-path selectors, in priority order
const STATIC_SELECTORS: &[&str] = &["main", "article", r#"div[role="main"]"#];

/// Dynamic-path container used when neither post nor comments are present
const DYNAMIC_FALLBACK_SELECTOR: &str = "div#main-content";

/// Select the content region of `html` and return it as an HTML fragment
pub fn select_content(html: &str, source: PageSource) -> String {
    let document = Html::parse_document(html);
    match source {
        PageSource::Static => select_static(&document).unwrap_or_else(|| html.to_string()),
        PageSource::Dynamic => select_dynamic(&document).unwrap_or_else(|| document.html()),
    }
}

/// Select the content region and convert it to markdown
pub fn extract_markdown(html: &str, source: PageSource) -> Result<String, ScrapeError> {
    let fragment = select_content(html, source);
    html_to_markdown(&fragment)
}

fn select_static(document: &Html) -> Option<String> {
    STATIC_SELECTORS.iter().find_map(|sel| {
        let found = first_match(document, sel)?;
        debug!(selector = *sel, "Matched content region");
        Some(found.html())
    })
}

fn select_dynamic(document: &Html) -> Option<String> {
    let mut fragment = String::new();

    let post = first_match(document, POST_ELEMENT).or_else(|| first_match(document, "article"));
    if let Some(post) = post {
        fragment.push_str(&post.html());
    }

    let comments = top_level_comments(document);
    debug!(count = comments.len(), "Collected comments");
    for comment in comments {
        fragment.push_str(&comment.html());
    }

    if !fragment.is_empty() {
        return Some(fragment);
    }

    debug!("No post or comments found, trying fallback container");
    first_match(document, DYNAMIC_FALLBACK_SELECTOR).map(|el| el.html())
}

/// All comment elements that are not nested inside another comment
///
/// A nested comment's markup is already part of its ancestor's HTML.
fn top_level_comments(document: &Html) -> Vec<ElementRef<'_>> {
    let Some(selector) = parse_selector(COMMENT_ELEMENT) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter(|comment| {
            !comment.ancestors().any(|node| {
                node.value()
                    .as_element()
                    .is_some_and(|el| el.name() == COMMENT_ELEMENT)
            })
        })
        .collect()
}

fn first_match<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = parse_selector(selector)?;
    document.select(&selector).next()
}

fn parse_selector(selector: &str) -> Option<Selector> {
    Selector::parse(selector).ok()
}
