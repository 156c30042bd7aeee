//! Record sink trait and in-memory implementation

use crate::crawler::SiteRecord;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur while persisting records
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write record: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Append-only sink for site records
///
/// Implementations are shared across concurrent crawl workers and must be
/// thread-safe. A push failure is reported to the caller but records
/// already written stay written.
pub trait RecordSink: Send + Sync {
    /// Appends one record to the sink
    fn push(&self, record: &SiteRecord) -> OutputResult<()>;
}

/// In-memory sink collecting records in push order
///
/// Used by tests and by embedders that post-process records themselves.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<SiteRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything pushed so far
    pub fn records(&self) -> Vec<SiteRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl RecordSink for MemorySink {
    fn push(&self, record: &SiteRecord) -> OutputResult<()> {
        if let Ok(mut records) = self.records.lock() {
            records.push(record.clone());
        }
        Ok(())
    }
}
