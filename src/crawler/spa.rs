//! Single-page application detection
//!
//! Client-side rendered sites ship almost no anchors in their HTML, so the
//! crawl checks the root page once up front and gives up early on them.

use crate::crawler::fetcher::Fetcher;
use crate::FetchError;

/// Returns true if the body contains any marker, ignoring case
pub fn looks_like_spa(body: &str, markers: &[String]) -> bool {
    let body = body.to_lowercase();
    markers
        .iter()
        .map(|marker| marker.to_lowercase())
        .any(|marker| !marker.is_empty() && body.contains(&marker))
}

/// Fetches the root page and classifies it
///
/// Only a transport failure is an error. The body is scanned whatever the
/// status code.
pub async fn detect_spa<F>(fetcher: &F, url: &str, markers: &[String]) -> Result<bool, FetchError>
where
    F: Fetcher + ?Sized,
{
    let page = fetcher.get(url).await?;

    if !page.is_success() {
        tracing::warn!("Root page {} answered with status {}", url, page.status);
    }

    Ok(looks_like_spa(&page.body, markers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpaConfig;

    fn markers() -> Vec<String> {
        SpaConfig::default().markers
    }

    #[test]
    fn test_detects_each_default_marker() {
        assert!(looks_like_spa("<script src=\"react.js\"></script>", &markers()));
        assert!(looks_like_spa("<div ng-app>angular</div>", &markers()));
        assert!(looks_like_spa("<div id=app data-vue></div>", &markers()));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(looks_like_spa("Built with React", &markers()));
        assert!(looks_like_spa("ANGULAR", &markers()));
        assert!(looks_like_spa("plain", &["PLAIN".to_string()]));
    }

    #[test]
    fn test_static_page_is_not_spa() {
        let body = "<html><body><a href=\"/about\">About</a></body></html>";
        assert!(!looks_like_spa(body, &markers()));
    }

    #[test]
    fn test_substring_match_is_loose() {
        // "revue" contains "vue"; the check is a plain substring scan.
        assert!(looks_like_spa("<p>Press revue</p>", &markers()));
    }

    #[test]
    fn test_empty_marker_never_matches() {
        assert!(!looks_like_spa("anything", &[String::new()]));
    }
}
