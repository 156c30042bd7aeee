use serde::Deserialize;

/// Main configuration structure for Leadsift
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub fetcher: FetcherConfig,

    pub output: OutputConfig,

    /// Seed sites to crawl, one record per business website
    #[serde(rename = "start-urls", default)]
    pub start_urls: Vec<SeedEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of site crawls in flight at once
    #[serde(rename = "max-concurrency", default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Maximum number of relevant internal pages fetched per site
    #[serde(rename = "max-subpages", default = "default_max_subpages")]
    pub max_subpages: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            max_subpages: default_max_subpages(),
        }
    }
}

/// HTTP transport configuration
///
/// `accept-invalid-certs` is on by default: target sites are uncontrolled
/// small-business domains that frequently serve self-signed or expired
/// certificates. The setting is scoped to the fetcher's own client.
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Per-attempt request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Maximum redirect hops followed per request
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Accept self-signed/expired/misconfigured TLS certificates
    #[serde(rename = "accept-invalid-certs", default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            accept_invalid_certs: default_accept_invalid_certs(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the append-only JSON Lines results file
    #[serde(rename = "results-path")]
    pub results_path: String,
}

/// One seed entry: either a bare URL string or a `{ url = "..." }` record
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SeedEntry {
    Url(String),
    Record { url: String },
}

impl SeedEntry {
    /// The seed URL string regardless of entry form
    pub fn url(&self) -> &str {
        match self {
            SeedEntry::Url(url) => url,
            SeedEntry::Record { url } => url,
        }
    }
}

fn default_max_concurrency() -> usize {
    10
}

fn default_max_subpages() -> usize {
    3
}

fn default_request_timeout() -> u64 {
    20
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    5
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_accept_invalid_certs() -> bool {
    true
}
