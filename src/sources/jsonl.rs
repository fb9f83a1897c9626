//! JSONL job export reader

use crate::services::normalizer::RawJobRecord;
use crate::types::{JobRecord, Result, TechpayError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::RecordSource;

/// Reads one job object per line from `*.jsonl` exports
pub struct JsonlSource {
    data_dir: PathBuf,
}

impl JsonlSource {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Parse a single JSONL line. Blank lines yield `Ok(None)`.
    fn parse_line(&self, line: &mut [u8]) -> Result<Option<JobRecord>> {
        if line.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let raw: RawJobRecord =
            simd_json::from_slice(line).map_err(|e| TechpayError::Parse(e.to_string()))?;
        raw.validate().map(Some)
    }
}

impl RecordSource for JsonlSource {
    fn name(&self) -> &str {
        "jsonl"
    }

    fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn file_pattern(&self) -> &str {
        "**/*.jsonl"
    }

    fn parse_file(&self, path: &Path) -> Result<Vec<JobRecord>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (idx, line_result) in reader.lines().enumerate() {
            let line = match line_result {
                Ok(l) => l,
                Err(e) => {
                    warn!(file = %path.display(), line = idx + 1, error = %e, "unreadable line");
                    continue;
                }
            };
            let mut line_bytes = line.into_bytes();

            match self.parse_line(&mut line_bytes) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => {
                    warn!(file = %path.display(), line = idx + 1, error = %e, "skipping job row");
                }
            }
        }

        Ok(records)
    }
}
