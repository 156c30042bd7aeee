use crate::UrlError;
use url::Url;

/// Normalizes a raw seed string into a crawlable absolute URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Prepend `https://` when no `scheme://` prefix is present
/// 3. Parse; reject if malformed
/// 4. Reject schemes other than HTTP and HTTPS
/// 5. Reject URLs without a host
/// 6. Remove the fragment (everything after `#`)
///
/// An explicit `http://` prefix is preserved so the fetcher can try plain
/// HTTP first for sites that advertise it.
///
/// Normalization is idempotent: feeding the output back in yields the same
/// URL.
///
/// # Arguments
///
/// * `raw` - The seed string as supplied by the caller
///
/// # Returns
///
/// * `Ok(Url)` - Normalized absolute URL
/// * `Err(UrlError)` - The seed cannot be crawled and should be dropped
///
/// # Examples
///
/// ```
/// use leadsift::url::normalize_seed;
///
/// let url = normalize_seed("  example.com/about#team  ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
/// ```
pub fn normalize_seed(raw: &str) -> Result<Url, UrlError> {
    let trimmed = raw.trim();

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}
