//! Per-site crawl orchestration
//!
//! One seed in, exactly one record out. Every failure along the way is
//! converted into data: a malformed seed or an unreachable homepage yields
//! an error record, a dead or parked subpage is skipped, and nothing here
//! ever propagates an error to the scheduler.

use crate::crawler::classifier::is_parked;
use crate::crawler::extractor::extract;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::links::discover_links;
use crate::url::normalize_seed;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// One output record per seed site
///
/// Serializes with a `status` tag into the two wire shapes consumed by the
/// record sink: an `ok` record carrying the merged site signal, or an
/// `error` record naming what went wrong.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SiteRecord {
    Ok {
        company_url: String,
        title: String,
        html: String,
        text: String,
        emails: Vec<String>,
        phones: Vec<String>,
        subpages_scraped: usize,
        scraped_at: DateTime<Utc>,
    },
    Error {
        company_url: String,
        error: String,
        scraped_at: DateTime<Utc>,
    },
}

impl SiteRecord {
    fn error(company_url: &str, error: String) -> Self {
        SiteRecord::Error {
            company_url: company_url.to_string(),
            error,
            scraped_at: Utc::now(),
        }
    }

    /// The seed this record belongs to
    pub fn company_url(&self) -> &str {
        match self {
            SiteRecord::Ok { company_url, .. } => company_url,
            SiteRecord::Error { company_url, .. } => company_url,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, SiteRecord::Ok { .. })
    }

    /// Merged emails; empty for error records
    pub fn emails(&self) -> &[String] {
        match self {
            SiteRecord::Ok { emails, .. } => emails,
            SiteRecord::Error { .. } => &[],
        }
    }

    /// Merged phones; empty for error records
    pub fn phones(&self) -> &[String] {
        match self {
            SiteRecord::Ok { phones, .. } => phones,
            SiteRecord::Error { .. } => &[],
        }
    }
}

/// Crawls one seed site: homepage plus up to `max_subpages` relevant pages
///
/// Never fails. The returned record's `subpages_scraped` counts the
/// relevant links *attempted*; links that fail to fetch or classify as
/// parked still count but contribute nothing to the merged signal.
pub async fn crawl_site(fetcher: &Fetcher, seed: &str, max_subpages: usize) -> SiteRecord {
    let normalized = match normalize_seed(seed) {
        Ok(url) => url,
        Err(err) => {
            tracing::warn!(seed, error = %err, "dropping seed with invalid URL");
            return SiteRecord::error(seed, err.to_string());
        }
    };

    let company_url = normalized.to_string();

    let home = match fetcher.fetch(&normalized).await {
        Ok(page) => page,
        Err(err) => {
            tracing::warn!(url = %company_url, error = %err, "homepage unreachable");
            return SiteRecord::error(&company_url, err.to_string());
        }
    };

    let home_content = extract(&home.raw_html);

    // A minimal-looking homepage may still link to real content, so parked
    // is logged but not fatal here.
    if is_parked(&home.raw_html, &home_content.text) {
        tracing::warn!(url = %home.final_url, "homepage looks parked, crawling subpages anyway");
    }

    let subpage_links = discover_links(&home.raw_html, &home.origin, max_subpages);
    let subpages_scraped = subpage_links.len();

    let mut text_parts = vec![home_content.text];
    let mut seen_emails: HashSet<String> = HashSet::new();
    let mut seen_phones: HashSet<String> = HashSet::new();
    let mut emails = Vec::new();
    let mut phones = Vec::new();

    union_into(&mut emails, &mut seen_emails, home_content.emails);
    union_into(&mut phones, &mut seen_phones, home_content.phones);

    for link in subpage_links {
        let sub = match fetcher.fetch(&link).await {
            Ok(page) => page,
            Err(err) => {
                tracing::debug!(url = %link, error = %err, "skipping unreachable subpage");
                continue;
            }
        };

        let sub_content = extract(&sub.raw_html);

        if is_parked(&sub.raw_html, &sub_content.text) {
            tracing::debug!(url = %sub.final_url, "skipping parked subpage");
            continue;
        }

        if !sub_content.text.is_empty() {
            text_parts.push(sub_content.text);
        }
        union_into(&mut emails, &mut seen_emails, sub_content.emails);
        union_into(&mut phones, &mut seen_phones, sub_content.phones);
    }

    let text = text_parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    tracing::info!(
        url = %company_url,
        subpages = subpages_scraped,
        emails = emails.len(),
        phones = phones.len(),
        "site crawl finished"
    );

    SiteRecord::Ok {
        company_url,
        title: home_content.title,
        html: home.raw_html,
        text,
        emails,
        phones,
        subpages_scraped,
        scraped_at: Utc::now(),
    }
}

/// Appends unseen items, preserving first-encountered order across pages
fn union_into(dst: &mut Vec<String>, seen: &mut HashSet<String>, src: Vec<String>) {
    for item in src {
        if seen.insert(item.clone()) {
            dst.push(item);
        }
    }
}
