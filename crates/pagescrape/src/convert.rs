//! HTML to markdown conversion

use crate::error::ScrapeError;
use htmd::options::{HeadingStyle, LinkStyle, Options};
use htmd::HtmlToMarkdown;
use std::sync::OnceLock;

/// Elements dropped entirely during conversion
const SKIP_TAGS: &[&str] = &[
    "head", "script", "style", "noscript", "iframe", "svg", "img", "picture",
];

fn converter() -> &'static HtmlToMarkdown {
    static CONVERTER: OnceLock<HtmlToMarkdown> = OnceLock::new();
    CONVERTER.get_or_init(|| {
        HtmlToMarkdown::builder()
            .options(Options {
                heading_style: HeadingStyle::Atx,
                link_style: LinkStyle::Inlined,
                ..Default::default()
            })
            .skip_tags(SKIP_TAGS.to_vec())
            .build()
    })
}

/// Convert an HTML fragment to markdown
///
/// Images are stripped, links are kept as inline `[text](href)`.
pub fn html_to_markdown(html: &str) -> Result<String, ScrapeError> {
    let markdown = converter()
        .convert(html)
        .map_err(|e| ScrapeError::Conversion(e.to_string()))?;
    Ok(filter_excessive_newlines(&markdown).trim().to_string())
}

/// Filter excessive newlines: keep at most 2 consecutive newlines
pub fn filter_excessive_newlines(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut newline_count = 0;

    for c in s.chars() {
        if c == '\n' {
            newline_count += 1;
            if newline_count <= 2 {
                result.push(c);
            }
        } else {
            newline_count = 0;
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_markdown_headers() {
        let md = html_to_markdown("<h1>Title</h1><h2>Subtitle</h2>").unwrap();
        assert!(md.contains("# Title"));
        assert!(md.contains("## Subtitle"));
    }

    #[test]
    fn test_html_to_markdown_keeps_links() {
        let md = html_to_markdown(r#"<p>See <a href="https://example.com/docs">the docs</a>.</p>"#)
            .unwrap();
        assert!(md.contains("[the docs](https://example.com/docs)"));
    }

    #[test]
    fn test_html_to_markdown_strips_images() {
        let md = html_to_markdown(r#"<p>Before</p><img src="cat.png" alt="a cat"><p>After</p>"#)
            .unwrap();
        assert!(md.contains("Before"));
        assert!(md.contains("After"));
        assert!(!md.contains("cat.png"));
        assert!(!md.contains("a cat"));
    }

    #[test]
    fn test_html_to_markdown_skip_script() {
        let md =
            html_to_markdown("<p>Before</p><script>alert('bad');</script><p>After</p>").unwrap();
        assert!(md.contains("Before"));
        assert!(!md.contains("alert"));
    }

    #[test]
    fn test_html_to_markdown_lists_and_emphasis() {
        let html = "<ul><li>Item 1</li><li>Item 2</li></ul><p><strong>bold</strong></p>";
        let md = html_to_markdown(html).unwrap();
        assert!(md.contains("Item 1"));
        assert!(md.contains("Item 2"));
        assert!(md.contains("**bold**"));
    }

    #[test]
    fn test_html_to_markdown_is_trimmed() {
        let md = html_to_markdown("\n\n<p>Hello</p>\n\n").unwrap();
        assert_eq!(md, "Hello");
    }

    #[test]
    fn test_filter_excessive_newlines() {
        let input = "line1\n\n\n\n\nline2";
        let output = filter_excessive_newlines(input);
        assert_eq!(output, "line1\n\nline2");
    }
}
