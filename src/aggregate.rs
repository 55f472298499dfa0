// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Reduction of raw latency logs into the worst observed latency for each
//! transaction.

use crate::error::Error;
use crate::sample::Sample;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Extension of the files picked up from a data directory.
pub const LOG_EXTENSION: &str = "log";

/// Returns the `*.log` files directly inside `dir`, sorted by path. Hidden
/// files and subdirectories are not matched.
pub fn log_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();

        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        let matches = path.extension().map_or(false, |ext| ext == LOG_EXTENSION);
        if hidden || !matches {
            continue;
        }

        let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;
        if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Maps each transaction id to the largest latency seen for it.
#[derive(Clone, Debug, Default)]
pub struct MaxLatencies {
    latencies: HashMap<String, f64>,
    files: usize,
    samples: usize,
}

impl MaxLatencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates every `*.log` file directly inside `dir`. An empty
    /// directory produces an empty table.
    pub fn from_directory(dir: &Path) -> Result<Self, Error> {
        let mut table = Self::new();
        for path in log_files(dir)? {
            table.ingest_file(&path)?;
        }
        debug!("aggregated {} files from {}", table.files, dir.display());
        Ok(table)
    }

    /// Records one observation, keeping it only if it is strictly greater than
    /// what was already stored for the transaction.
    pub fn record(&mut self, transaction: &str, latency: f64) {
        self.samples += 1;
        match self.latencies.get_mut(transaction) {
            Some(max) => {
                if latency > *max {
                    *max = latency;
                }
            }
            None => {
                self.latencies.insert(transaction.to_string(), latency);
            }
        }
    }

    /// Opens `path` and streams all of its lines into the table. The file is
    /// closed before returning, on success and on error.
    pub fn ingest_file(&mut self, path: &Path) -> Result<(), Error> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let before = self.samples;
        self.ingest(BufReader::new(file), path)?;
        self.files += 1;
        debug!(
            "read {} samples from {}",
            self.samples - before,
            path.display()
        );
        Ok(())
    }

    /// Streams every line of `reader` into the table. `source` only labels
    /// errors. Blank lines are skipped; any other line that is not exactly
    /// `transaction_id,latency` fails the whole ingest.
    pub fn ingest<R: BufRead>(&mut self, reader: R, source: &Path) -> Result<(), Error> {
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::io(source, e))?;

            if line.trim().is_empty() {
                debug!("{}:{}: skipping blank line", source.display(), index + 1);
                continue;
            }

            let sample = Sample::parse(&line).map_err(|reason| Error::Malformed {
                path: source.to_path_buf(),
                line: index + 1,
                reason,
            })?;
            self.record(sample.transaction(), sample.latency());
        }
        Ok(())
    }

    pub fn get(&self, transaction: &str) -> Option<f64> {
        self.latencies.get(transaction).copied()
    }

    /// Number of distinct transactions.
    pub fn len(&self) -> usize {
        self.latencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latencies.is_empty()
    }

    /// Number of log files ingested.
    pub fn files(&self) -> usize {
        self.files
    }

    /// Number of observations recorded, across all transactions.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Consumes the table, returning the per-transaction maxima.
    pub fn into_values(self) -> Vec<f64> {
        self.latencies.into_iter().map(|(_, v)| v).collect()
    }

    pub fn into_map(self) -> HashMap<String, f64> {
        self.latencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    fn ingest_str(table: &mut MaxLatencies, content: &str) -> Result<(), Error> {
        table.ingest(content.as_bytes(), Path::new("test.log"))
    }

    #[test]
    fn keeps_maximum() {
        let mut table = MaxLatencies::new();
        ingest_str(&mut table, "tx1,10.0\ntx1,5.0\n").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("tx1"), Some(10.0));
        assert_eq!(table.samples(), 2);
    }

    #[test]
    fn later_larger_value_replaces() {
        let mut table = MaxLatencies::new();
        ingest_str(&mut table, "tx1,3.0\ntx2,1.0\ntx1,7.0\n").unwrap();
        assert_eq!(table.get("tx1"), Some(7.0));
        assert_eq!(table.get("tx2"), Some(1.0));
    }

    #[test]
    fn unique_ids_keep_literal_values() {
        let mut table = MaxLatencies::new();
        ingest_str(&mut table, "a,1.5\nb,2.5\nc,0.0").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("a"), Some(1.5));
        assert_eq!(table.get("b"), Some(2.5));
        assert_eq!(table.get("c"), Some(0.0));
    }

    #[test]
    fn order_does_not_matter() {
        let lines = ["tx1,4.0", "tx2,9.0", "tx1,8.0", "tx2,1.0", "tx1,6.0"];

        let mut forward = MaxLatencies::new();
        for line in lines.iter() {
            let sample = Sample::parse(line).unwrap();
            forward.record(sample.transaction(), sample.latency());
        }

        let mut reverse = MaxLatencies::new();
        for line in lines.iter().rev() {
            let sample = Sample::parse(line).unwrap();
            reverse.record(sample.transaction(), sample.latency());
        }

        assert_eq!(forward.into_map(), reverse.into_map());
    }

    #[test]
    fn skips_blank_lines() {
        let mut table = MaxLatencies::new();
        ingest_str(&mut table, "tx1,1.0\n\n   \ntx2,2.0\n\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.samples(), 2);
    }

    #[test]
    fn handles_crlf() {
        let mut table = MaxLatencies::new();
        ingest_str(&mut table, "tx1,1.0\r\ntx2,2.0\r\n").unwrap();
        assert_eq!(table.get("tx1"), Some(1.0));
        assert_eq!(table.get("tx2"), Some(2.0));
    }

    #[test]
    fn malformed_line_reports_position() {
        let mut table = MaxLatencies::new();
        let result = ingest_str(&mut table, "tx1,1.0\nbad_line_no_comma\n");
        match result {
            Err(Error::Malformed { path, line, reason }) => {
                assert_eq!(path, PathBuf::from("test.log"));
                assert_eq!(line, 2);
                assert_eq!(reason, ParseError::MissingSeparator);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn invalid_latency_fails() {
        let mut table = MaxLatencies::new();
        assert!(matches!(
            ingest_str(&mut table, "tx1,abc\n"),
            Err(Error::Malformed {
                reason: ParseError::InvalidLatency(_),
                ..
            })
        ));
    }

    #[test]
    fn into_values_returns_maxima() {
        let mut table = MaxLatencies::new();
        ingest_str(&mut table, "a,1\na,3\nb,2\n").unwrap();
        let mut values = table.into_values();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(values, vec![2.0, 3.0]);
    }
}
