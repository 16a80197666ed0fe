use crate::url::CrawlDomain;
use crate::UrlError;

/// Normalizes a raw link into the key used by the visited set and results
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Resolve the link against the crawl domain (relative, protocol-relative
///    and absolute links all resolve the same way)
/// 3. Remove fragment and query
/// 4. Remove a single trailing slash
/// 5. Reject an empty result
///
/// # Arguments
///
/// * `raw` - The link as found in an `href` attribute
/// * `domain` - The crawl domain used as the resolution base
///
/// # Returns
///
/// * `Ok(String)` - Normalized URL
/// * `Err(UrlError)` - Malformed link, or nothing left after cleaning
///
/// # Examples
///
/// ```
/// use site_census::url::{normalize_url, CrawlDomain};
///
/// let domain = CrawlDomain::parse("example.com").unwrap();
/// let url = normalize_url("/about/?tab=team#people", &domain).unwrap();
/// assert_eq!(url, "https://example.com/about");
/// ```
pub fn normalize_url(raw: &str, domain: &CrawlDomain) -> Result<String, UrlError> {
    let mut url = domain.base().join(raw.trim())?;

    url.set_fragment(None);
    url.set_query(None);

    let serialized = String::from(url);
    let cleaned = serialized.strip_suffix('/').unwrap_or(&serialized);

    if cleaned.is_empty() {
        return Err(UrlError::Empty);
    }

    Ok(cleaned.to_string())
}
