use crate::url::normalize_url;
use crate::{CrawlError, UrlError};
use std::fmt;
use url::Url;

/// The domain a crawl is confined to
///
/// Built once from the user-supplied seed and never changed afterwards. All
/// normalization and same-domain checks are relative to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlDomain {
    base: Url,
    hostname: String,
}

impl CrawlDomain {
    /// Parses and canonicalizes a seed domain
    ///
    /// # Canonicalization Steps
    ///
    /// 1. Trim surrounding whitespace
    /// 2. Default the scheme to `https` when none is given
    /// 3. Reject anything that is not HTTP(S) or has no host
    /// 4. Remove the `www.` prefix from the host
    /// 5. Drop query and fragment
    ///
    /// # Examples
    ///
    /// ```
    /// use site_census::url::CrawlDomain;
    ///
    /// let domain = CrawlDomain::parse("www.example.com").unwrap();
    /// assert_eq!(domain.hostname(), "example.com");
    /// assert_eq!(domain.base().as_str(), "https://example.com/");
    /// ```
    pub fn parse(input: &str) -> Result<Self, CrawlError> {
        let invalid = |reason: String| CrawlError::InvalidDomain {
            domain: input.to_string(),
            reason,
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("domain is empty".to_string()));
        }

        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let mut base = Url::parse(&with_scheme).map_err(|e| invalid(e.to_string()))?;

        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
        }

        let host = base
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("missing host".to_string()))?
            .to_string();

        if let Some(bare) = host.strip_prefix("www.").filter(|b| !b.is_empty()) {
            base.set_host(Some(bare))
                .map_err(|e| invalid(format!("failed to strip www prefix: {}", e)))?;
        }

        base.set_query(None);
        base.set_fragment(None);

        let hostname = base
            .host_str()
            .ok_or_else(|| invalid("missing host".to_string()))?
            .to_string();

        Ok(Self { base, hostname })
    }

    /// The canonical base URL links are resolved against
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Host name (without port) that discovered links are matched against
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// The normalized URL the crawl starts from
    pub fn seed_url(&self) -> Result<String, UrlError> {
        normalize_url(self.base.as_str(), self)
    }
}

impl fmt::Display for CrawlDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base.as_str())
    }
}
