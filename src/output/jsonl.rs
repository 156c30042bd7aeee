//! JSON Lines record sink

use crate::crawler::SiteRecord;
use crate::output::traits::{OutputResult, RecordSink};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// Append-only JSON Lines file sink
///
/// One serialized record per line, flushed after every push so a partial
/// run still leaves a readable results file.
pub struct JsonlSink {
    writer: Mutex<BufWriter<File>>,
}

impl JsonlSink {
    /// Opens (or creates) the results file for appending
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl RecordSink for JsonlSink {
    fn push(&self, record: &SiteRecord) -> OutputResult<()> {
        let line = serde_json::to_string(record)?;

        // A poisoned lock means a writer panicked mid-line; the file may
        // hold a torn record, so stop appending to it.
        let mut writer = self.writer.lock().map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::Other,
                "results file writer is poisoned",
            )
        })?;

        writeln!(writer, "{}", line)?;
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::io::BufRead;

    #[test]
    fn test_records_written_one_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.jsonl");

        let sink = JsonlSink::create(&path).unwrap();

        sink.push(&SiteRecord::Ok {
            company_url: "https://a.com/".to_string(),
            title: "A".to_string(),
            html: "<html></html>".to_string(),
            text: "text".to_string(),
            emails: vec!["a@a.com".to_string()],
            phones: vec![],
            subpages_scraped: 1,
            scraped_at: Utc::now(),
        })
        .unwrap();

        sink.push(&SiteRecord::Error {
            company_url: "https://b.com/".to_string(),
            error: "unreachable".to_string(),
            scraped_at: Utc::now(),
        })
        .unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let lines: Vec<String> = std::io::BufReader::new(file)
            .lines()
            .map(|line| line.unwrap())
            .collect();

        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first["status"], "ok");
        assert_eq!(first["emails"][0], "a@a.com");

        let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(second["status"], "error");
        assert_eq!(second["error"], "unreachable");
    }

    #[test]
    fn test_appends_across_sinks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.jsonl");

        for url in ["https://a.com/", "https://b.com/"] {
            let sink = JsonlSink::create(&path).unwrap();
            sink.push(&SiteRecord::Error {
                company_url: url.to_string(),
                error: "x".to_string(),
                scraped_at: Utc::now(),
            })
            .unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
