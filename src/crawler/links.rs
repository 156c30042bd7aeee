//! Internal-link discovery and relevance filtering
//!
//! Finds the handful of same-origin pages worth fetching after the
//! homepage: about/services/contact-style pages that concentrate the
//! contact signal this crawler is after.

use crate::url::same_origin;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Path fragments that mark a business-informative page
const RELEVANT_SEGMENTS: &[&str] = &["about", "service", "contact", "project", "gallery", "team"];

/// Link targets that cannot navigate to an HTML page
const SKIPPED_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:", "data:"];

/// Document types unlikely to be HTML
const SKIPPED_EXTENSIONS: &[&str] = &[
    ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".zip", ".doc", ".docx", ".xls",
    ".xlsx",
];

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Discovers up to `max` relevant same-origin links from a page
///
/// Targets are resolved against `origin`, filtered to navigable same-origin
/// HTML pages whose path contains a relevance segment, exact-deduplicated,
/// and returned in first-encountered order.
pub fn discover_links(raw_html: &str, origin: &Url, max: usize) -> Vec<Url> {
    let document = Html::parse_document(raw_html);

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        if links.len() >= max {
            break;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(resolved) = resolve_candidate(href, origin) else {
            continue;
        };

        if seen.insert(resolved.as_str().to_string()) {
            links.push(resolved);
        }
    }

    links
}

/// Resolves one href to an absolute, relevant, same-origin URL
///
/// Returns None when the target should not be followed:
/// - empty hrefs and pure in-page fragments
/// - mailto:/tel:/javascript:/data: targets
/// - WordPress plumbing paths (`wp-`)
/// - cross-origin or non-http(s) resolutions
/// - non-HTML document extensions
/// - paths without a relevance segment
fn resolve_candidate(href: &str, origin: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let href_lower = href.to_lowercase();
    if SKIPPED_SCHEMES
        .iter()
        .any(|scheme| href_lower.starts_with(scheme))
    {
        return None;
    }

    if href_lower.contains("wp-") {
        return None;
    }

    let mut resolved = origin.join(href).ok()?;

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    if !same_origin(&resolved, origin) {
        return None;
    }

    let path = resolved.path().to_lowercase();

    if SKIPPED_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return None;
    }

    if !RELEVANT_SEGMENTS
        .iter()
        .any(|segment| path.contains(segment))
    {
        return None;
    }

    resolved.set_fragment(None);

    Some(resolved)
}
