use crate::url::CrawlDomain;
use url::{ParseError, Url};

/// Checks whether a host belongs to the crawl domain
///
/// This is a plain suffix match, compared case-sensitively as given, so that
/// `www.example.com` and `blog.example.com` both match `example.com`.
///
/// Note: the suffix match is not anchored on a label boundary, so
/// `evilexample.com` also matches `example.com`. This is the accepted
/// behavior of the crawler and is kept as-is.
///
/// # Examples
///
/// ```
/// use site_census::url::host_matches;
///
/// assert!(host_matches("example.com", "example.com"));
/// assert!(host_matches("blog.example.com", "example.com"));
/// assert!(!host_matches("other.com", "example.com"));
/// ```
pub fn host_matches(host: &str, domain_host: &str) -> bool {
    host.ends_with(domain_host)
}

/// Checks whether a raw link points into the crawl domain
///
/// Absolute and protocol-relative links are matched on their host exactly as
/// written in the link, so `BLOG.EXAMPLE.COM` does not match `example.com`.
/// Host-relative links (no host but a `/` somewhere) are first resolved onto
/// the crawl domain's scheme and host. Links with neither a host nor a path
/// separator, such as `mailto:` or a bare word, never match.
///
/// # Examples
///
/// ```
/// use site_census::url::{is_same_domain, CrawlDomain};
///
/// let domain = CrawlDomain::parse("example.com").unwrap();
/// assert!(is_same_domain("https://blog.example.com/x", &domain));
/// assert!(is_same_domain("/about", &domain));
/// assert!(!is_same_domain("https://other.com/x", &domain));
/// ```
pub fn is_same_domain(link: &str, domain: &CrawlDomain) -> bool {
    let link = link.trim();

    let resolved = match Url::parse(link) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) if link.contains('/') => {
            match domain.base().join(link) {
                Ok(url) => url,
                Err(_) => return false,
            }
        }
        Err(_) => return false,
    };

    match written_host(link) {
        Some(host) => host_matches(host, domain.hostname()),
        None => resolved
            .host_str()
            .map(|host| host_matches(host, domain.hostname()))
            .unwrap_or(false),
    }
}

/// Host of an absolute or protocol-relative link, before `url` lowercases it
fn written_host(link: &str) -> Option<&str> {
    let start = link.find("//")?;
    let prefix = &link[..start];
    if !prefix.is_empty() && !prefix.ends_with(':') {
        return None;
    }

    let authority = link[start + 2..]
        .split(|c: char| matches!(c, '/' | '?' | '#'))
        .next()?;
    let host_port = authority.rsplit('@').next()?;

    if host_port.starts_with('[') {
        host_port.split_inclusive(']').next()
    } else {
        host_port.split(':').next()
    }
}
