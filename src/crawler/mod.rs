//! Crawler module: fetching, extraction, classification, and scheduling
//!
//! The pipeline for one seed runs normalize → fetch homepage → extract →
//! classify → discover links → fetch subpages → merge, with every failure
//! captured as data. The scheduler fans that pipeline out over the whole
//! seed batch under a fixed parallelism cap.

mod classifier;
mod extractor;
mod fetcher;
mod links;
mod scheduler;
mod site;

pub use classifier::is_parked;
pub use extractor::{extract, PageContent};
pub use fetcher::{FetchError, FetchedPage, Fetcher};
pub use links::discover_links;
pub use scheduler::{run_pool, RunStats};
pub use site::{crawl_site, SiteRecord};

use crate::config::Config;
use crate::output::RecordSink;
use crate::LeadsiftError;
use std::sync::Arc;

/// Runs a complete crawl over the configured seed list
///
/// Builds the shared fetcher, dispatches every seed through the bounded
/// worker pool, and pushes one record per seed to `sink`. Per-seed failures
/// are captured in their records; only construction-level problems (an
/// unbuildable HTTP client) surface as errors here.
pub async fn crawl(config: Config, sink: Arc<dyn RecordSink>) -> Result<RunStats, LeadsiftError> {
    let fetcher = Arc::new(Fetcher::new(&config.fetcher)?);

    let seeds: Vec<String> = config
        .start_urls
        .iter()
        .map(|seed| seed.url().to_string())
        .collect();

    let stats = run_pool(
        fetcher,
        seeds,
        config.crawler.max_concurrency,
        config.crawler.max_subpages,
        sink,
    )
    .await;

    Ok(stats)
}
