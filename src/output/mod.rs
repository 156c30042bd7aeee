//! Output handling for crawl records
//!
//! Records flow to an append-only sink behind the `RecordSink` trait. The
//! shipped sinks are a JSON Lines file writer for production runs and an
//! in-memory collector for tests and embedders.

mod jsonl;
mod traits;

pub use jsonl::JsonlSink;
pub use traits::{MemorySink, OutputError, OutputResult, RecordSink};
