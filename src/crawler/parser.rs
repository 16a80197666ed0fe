//! HTML parser for extracting anchor links
//!
//! Hrefs are returned exactly as written in the document. Resolving,
//! filtering and normalizing them is the coordinator's job, because the same
//! raw link must be counted every time it appears.

use scraper::{Html, Selector};

/// Extracts the `href` of every `<a>` element in an HTML document
///
/// # Example
///
/// ```
/// use site_census::crawler::extract_anchor_hrefs;
///
/// let html = r#"<html><body><a href="/about">About</a><a>No href</a></body></html>"#;
/// assert_eq!(extract_anchor_hrefs(html), vec!["/about".to_string()]);
/// ```
pub fn extract_anchor_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
