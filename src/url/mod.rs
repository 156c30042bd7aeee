//! URL handling module for Leadsift
//!
//! Provides seed normalization and origin helpers. The origin (scheme +
//! host + port) is what scopes "internal" link following: the crawl never
//! leaves the company's own domain.

mod normalize;

pub use normalize::normalize_seed;

use url::Url;

/// Returns the origin of a URL as a URL with the path reset to `/`
///
/// The result is used both as the base for resolving relative links and as
/// the boundary check for same-origin filtering.
pub fn origin_url(url: &Url) -> Url {
    let mut origin = url.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    origin
}

/// Returns true if both URLs share a scheme + host + port origin
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}
