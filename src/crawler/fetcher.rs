//! Dual-protocol HTTP fetcher
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building a shared keep-alive HTTP client with browser-like headers
//! - Scheme fallback: a URL that fails over HTTPS is retried over HTTP
//!   (and vice versa for explicit-HTTP seeds)
//! - Redirect following with a hop cap
//! - Per-attempt timeouts
//!
//! TLS certificate validation is optionally disabled on this client only.
//! The targets are uncontrolled small-business sites where expired and
//! self-signed certificates are routine; refusing them would silently drop
//! a large share of real businesses.

use crate::config::FetcherConfig;
use crate::url::origin_url;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during fetching
///
/// A `FetchError` is only surfaced after every scheme candidate for the URL
/// has been exhausted; it carries the last candidate's failure.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// The outcome of one successful fetch, after following redirects
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    /// Scheme + host (+ port) of the final URL
    pub origin: Url,

    /// HTTP status code of the final response
    pub status_code: u16,

    /// Response body as text
    pub raw_html: String,
}

/// HTTP fetcher with scheme fallback over a shared connection pool
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Builds the fetcher and its HTTP client from transport configuration
    ///
    /// The client is constructed once and reused for every fetch in the
    /// process, so connections to repeatedly-hit hosts stay alive.
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .redirect(Policy::limited(config.max_redirects))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }

    /// Fetches a URL, falling back to the alternate scheme on failure
    ///
    /// Candidate order follows the input: an explicit `http://` URL tries
    /// HTTP first, everything else tries HTTPS first. A candidate counts as
    /// successful only when the transport succeeds and the final status is
    /// in `[200, 400)`. When both candidates fail, the last error is
    /// returned.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let (preferred, alternate) = scheme_candidates(url);

        match self.try_fetch(&preferred).await {
            Ok(page) => Ok(page),
            Err(err) => match alternate {
                Some(fallback) => {
                    tracing::debug!(
                        url = %preferred,
                        fallback = %fallback,
                        error = %err,
                        "scheme candidate failed, trying fallback"
                    );
                    self.try_fetch(&fallback).await
                }
                None => Err(err),
            },
        }
    }

    /// Issues one GET attempt against a single candidate URL
    async fn try_fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        if !(200..400).contains(&status) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let final_url = response.url().clone();
        let raw_html = response
            .text()
            .await
            .map_err(|source| FetchError::Request {
                url: final_url.to_string(),
                source,
            })?;

        Ok(FetchedPage {
            origin: origin_url(&final_url),
            final_url,
            status_code: status,
            raw_html,
        })
    }
}

/// Builds the ordered scheme candidates for a URL
///
/// Returns the URL to try first and, when the scheme can be swapped, the
/// alternate-scheme variant to fall back to.
fn scheme_candidates(url: &Url) -> (Url, Option<Url>) {
    let alternate_scheme = if url.scheme() == "http" {
        "https"
    } else {
        "http"
    };

    let mut alternate = url.clone();
    let alternate = match alternate.set_scheme(alternate_scheme) {
        Ok(()) => Some(alternate),
        Err(()) => None,
    };

    (url.clone(), alternate)
}
