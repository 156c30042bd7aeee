//! Bounded-concurrency scheduler for site crawls
//!
//! Drives `crawl_site` over the whole seed batch under a fixed parallelism
//! cap. The deduplicated seed list is an immutable arena; a shared atomic
//! cursor hands each worker the next index, so a pop is inherently atomic
//! with the dispatch that follows it. The pool is done only when the cursor
//! has passed the end AND every worker has joined, which is exactly
//! queue-empty-and-zero-in-flight.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::site::crawl_site;
use crate::output::RecordSink;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Aggregate outcome of one crawl run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Seeds dispatched (after dedup)
    pub total: usize,

    /// Records emitted with status ok
    pub ok: usize,

    /// Records emitted with status error
    pub failed: usize,
}

/// Runs the full seed batch with at most `max_concurrency` crawls in flight
///
/// Duplicate seed strings collapse to one job. Exactly one record per
/// remaining seed is pushed to `sink`, in completion order. Worker panics
/// are logged and do not abort sibling crawls.
pub async fn run_pool(
    fetcher: Arc<Fetcher>,
    seeds: Vec<String>,
    max_concurrency: usize,
    max_subpages: usize,
    sink: Arc<dyn RecordSink>,
) -> RunStats {
    let mut seen = HashSet::new();
    let seeds: Vec<String> = seeds
        .into_iter()
        .filter(|seed| seen.insert(seed.clone()))
        .collect();

    let total = seeds.len();
    if total == 0 {
        return RunStats::default();
    }

    let arena = Arc::new(seeds);
    let cursor = Arc::new(AtomicUsize::new(0));
    let workers = max_concurrency.min(total).max(1);

    tracing::info!(seeds = total, workers, "starting crawl pool");

    let mut tasks: JoinSet<(usize, usize)> = JoinSet::new();

    for worker_id in 0..workers {
        let arena = Arc::clone(&arena);
        let cursor = Arc::clone(&cursor);
        let fetcher = Arc::clone(&fetcher);
        let sink = Arc::clone(&sink);

        tasks.spawn(async move {
            let mut ok = 0;
            let mut failed = 0;

            loop {
                let index = cursor.fetch_add(1, Ordering::SeqCst);
                let Some(seed) = arena.get(index) else {
                    break;
                };

                tracing::debug!(worker_id, index, seed = %seed, "dispatching site crawl");

                let record = crawl_site(&fetcher, seed, max_subpages).await;
                if record.is_ok() {
                    ok += 1;
                } else {
                    failed += 1;
                }

                if let Err(err) = sink.push(&record) {
                    tracing::error!(seed = %seed, error = %err, "failed to persist record");
                }
            }

            (ok, failed)
        });
    }

    let mut stats = RunStats {
        total,
        ..RunStats::default()
    };

    // Wait for in-flight work, not just the end of dispatch
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((ok, failed)) => {
                stats.ok += ok;
                stats.failed += failed;
            }
            Err(err) => {
                tracing::error!(error = %err, "crawl worker panicked");
            }
        }
    }

    stats
}
