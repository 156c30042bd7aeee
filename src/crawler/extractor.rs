//! Content extraction from raw HTML
//!
//! Pure functions, no I/O. Malformed markup degrades to best-effort
//! parsing; extraction never fails.
//!
//! Emails and phones are matched on the RAW HTML rather than the cleaned
//! text: contact identifiers routinely hide in `mailto:` hrefs, JSON-LD
//! blobs, and attributes that never render as visible text.

use ego_tree::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node, Selector};
use std::collections::HashSet;

/// Elements whose subtrees never contribute visible text
const NOISE_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "svg", "template"];

/// Phone candidates must contain at least this many digits
const MIN_PHONE_DIGITS: usize = 9;

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

/// Primary content landmarks, tried in order before falling back to body
static CONTENT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("main, article, [role='main'], #content, .content").unwrap());

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?\d[\d\s().-]{8,}\d").unwrap());

/// Signal extracted from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// Document title, trimmed; empty when absent
    pub title: String,

    /// Visible text with whitespace collapsed to single spaces
    pub text: String,

    /// Email-shaped tokens, exact-deduplicated, first-seen order
    pub emails: Vec<String>,

    /// Phone-shaped tokens, exact-deduplicated, first-seen order
    pub phones: Vec<String>,
}

/// Extracts title, visible text, and contact identifiers from raw HTML
///
/// Deterministic for a fixed input: traversal follows document order, so
/// repeated extraction yields identical field values.
pub fn extract(raw_html: &str) -> PageContent {
    let document = Html::parse_document(raw_html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    PageContent {
        title,
        text: visible_text(&document),
        emails: dedup_matches(&EMAIL_RE, raw_html, 0),
        phones: dedup_matches(&PHONE_RE, raw_html, MIN_PHONE_DIGITS),
    }
}

/// Collects whitespace-normalized visible text from the document
///
/// Prefers the first primary content landmark; falls back to `<body>`, and
/// for headless fragments to the whole tree.
fn visible_text(document: &Html) -> String {
    let mut raw = String::new();

    let root = document
        .select(&CONTENT_SELECTOR)
        .next()
        .or_else(|| document.select(&BODY_SELECTOR).next());

    match root {
        Some(element) => push_visible_text(*element, &mut raw),
        None => push_visible_text(document.tree.root(), &mut raw),
    }

    collapse_whitespace(&raw)
}

/// Walks child nodes depth-first, skipping noise-tag subtrees
fn push_visible_text(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(element) if NOISE_TAGS.contains(&element.name()) => {}
            Node::Element(_) => push_visible_text(child, out),
            _ => {}
        }
    }
}

/// Collapses consecutive whitespace to single spaces and trims
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Runs a pattern over the haystack, deduplicating exact matches in order
fn dedup_matches(re: &Regex, haystack: &str, min_digits: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut matches = Vec::new();

    for found in re.find_iter(haystack) {
        let token = found.as_str().to_string();

        if min_digits > 0 {
            let digits = token.chars().filter(|c| c.is_ascii_digit()).count();
            if digits < min_digits {
                continue;
            }
        }

        if seen.insert(token.clone()) {
            matches.push(token);
        }
    }

    matches
}
