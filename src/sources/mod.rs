//! Record sources: file-backed providers of validated job records

mod delimited;
mod jsonl;

pub use delimited::CsvSource;
pub use jsonl::JsonlSource;

use crate::types::{JobRecord, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Trait for loading job records from exported files
pub trait RecordSource: Send + Sync {
    /// Source name (e.g., "jsonl")
    fn name(&self) -> &str;

    /// Directory to scan for export files
    fn data_dir(&self) -> &Path;

    /// Glob pattern for finding export files (e.g., "**/*.jsonl")
    fn file_pattern(&self) -> &str;

    /// Parse a single file and return its valid records.
    /// Invalid rows are logged and skipped; only I/O failures are errors.
    fn parse_file(&self, path: &Path) -> Result<Vec<JobRecord>>;

    /// Parse all files in parallel using rayon, with deduplication
    fn load_all(&self) -> Result<Vec<JobRecord>> {
        let files = self.collect_files();
        debug!(source = self.name(), files = files.len(), "collected export files");
        self.parse_and_dedup(&files)
    }

    /// Collect all files matching the glob pattern, sorted by path
    fn collect_files(&self) -> Vec<PathBuf> {
        let pattern = self.data_dir().join(self.file_pattern());
        let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
            .map(|paths| paths.filter_map(|e| e.ok()).collect())
            .unwrap_or_default();
        files.sort();
        files
    }

    /// Parse files in parallel, then deduplicate by job id in file order
    fn parse_and_dedup(&self, files: &[PathBuf]) -> Result<Vec<JobRecord>> {
        let per_file: Vec<Vec<JobRecord>> = files
            .par_iter()
            .map(|f| match self.parse_file(f) {
                Ok(records) => records,
                Err(e) => {
                    warn!(source = self.name(), file = %f.display(), error = %e, "failed to parse export file");
                    Vec::new()
                }
            })
            .collect();

        Ok(dedup_by_id(per_file.into_iter().flatten()))
    }
}

/// Keep the first record for each job id
pub fn dedup_by_id(records: impl IntoIterator<Item = JobRecord>) -> Vec<JobRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut deduped: Vec<JobRecord> = Vec::new();

    for record in records {
        if seen.insert(record.id.clone()) {
            deduped.push(record);
        } else {
            debug!(id = %record.id, "dropping duplicate job record");
        }
    }

    deduped
}

/// Registry of record sources for one data directory
pub struct SourceRegistry {
    sources: Vec<Box<dyn RecordSource>>,
}

impl SourceRegistry {
    /// Create a registry with the JSONL and CSV sources rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            sources: vec![
                Box::new(JsonlSource::new(data_dir.clone())),
                Box::new(CsvSource::new(data_dir)),
            ],
        }
    }

    /// Create a registry over caller-supplied sources, loaded in order
    pub fn with_sources(sources: Vec<Box<dyn RecordSource>>) -> Self {
        Self { sources }
    }

    /// Get all registered sources
    pub fn sources(&self) -> &[Box<dyn RecordSource>] {
        &self.sources
    }

    /// Find a source by name
    pub fn get(&self, name: &str) -> Option<&dyn RecordSource> {
        self.sources
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    /// Load every source, deduplicating job ids across sources.
    /// A failing source is logged and skipped.
    pub fn load_all(&self) -> Vec<JobRecord> {
        let mut all = Vec::new();
        for source in &self.sources {
            match source.load_all() {
                Ok(records) => {
                    debug!(source = source.name(), records = records.len(), "loaded records");
                    all.extend(records);
                }
                Err(e) => warn!(source = source.name(), error = %e, "record source failed"),
            }
        }
        dedup_by_id(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TechpayError;
    use chrono::NaiveDate;

    /// In-memory source; `None` records make `load_all` fail
    struct FixedSource {
        name: &'static str,
        records: Option<Vec<JobRecord>>,
    }

    impl RecordSource for FixedSource {
        fn name(&self) -> &str {
            self.name
        }

        fn data_dir(&self) -> &Path {
            Path::new("")
        }

        fn file_pattern(&self) -> &str {
            ""
        }

        fn parse_file(&self, _path: &Path) -> Result<Vec<JobRecord>> {
            Ok(Vec::new())
        }

        fn load_all(&self) -> Result<Vec<JobRecord>> {
            self.records
                .clone()
                .ok_or_else(|| TechpayError::Parse(format!("{} unavailable", self.name)))
        }
    }

    fn job(id: &str, amount: f64) -> JobRecord {
        JobRecord {
            amount: Some(amount),
            ..JobRecord::new(id, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        }
    }

    #[test]
    fn test_registry_with_sources_dedups_in_source_order() {
        let registry = SourceRegistry::with_sources(vec![
            Box::new(FixedSource {
                name: "primary",
                records: Some(vec![job("a", 1.0), job("b", 2.0)]),
            }),
            Box::new(FixedSource {
                name: "broken",
                records: None,
            }),
            Box::new(FixedSource {
                name: "secondary",
                records: Some(vec![job("b", 99.0), job("c", 3.0)]),
            }),
        ]);

        assert_eq!(registry.sources().len(), 3);
        assert!(registry.get("secondary").is_some());

        let records = registry.load_all();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(records[1].amount, Some(2.0));
    }

    #[test]
    fn test_registry_default_sources() {
        let registry = SourceRegistry::new("tests/fixtures/jobs");
        assert_eq!(registry.sources().len(), 2);
        assert!(registry.get("jsonl").is_some());
        assert!(registry.get("csv").is_some());
    }

    #[test]
    fn test_registry_get_unknown() {
        let registry = SourceRegistry::new("tests/fixtures/jobs");
        assert!(registry.get("xlsx").is_none());
    }

    #[test]
    fn test_load_all_missing_directory() {
        let source = JsonlSource::new(PathBuf::from("tests/fixtures/nonexistent"));
        let result = source.load_all().unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_collect_files_sorted() {
        let source = JsonlSource::new(PathBuf::from("tests/fixtures/jobs"));
        let files = source.collect_files();
        let names: Vec<String> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["empty.jsonl", "march.jsonl", "march_extra.jsonl"]);
    }

    #[test]
    fn test_jsonl_load_all_dedups_across_files() {
        let source = JsonlSource::new(PathBuf::from("tests/fixtures/jobs"));
        let records = source.load_all().unwrap();

        // march.jsonl (5) + march_extra.jsonl (2, one duplicate of job_003) = 6
        assert_eq!(records.len(), 6);
        let job_003 = records.iter().find(|r| r.id == "job_003").unwrap();
        assert_eq!(job_003.amount, Some(300.0));
    }

    #[test]
    fn test_registry_load_all_combines_sources() {
        let registry = SourceRegistry::new("tests/fixtures/jobs");
        let records = registry.load_all();

        // 6 from JSONL + 3 valid CSV rows
        assert_eq!(records.len(), 9);
        assert!(records.iter().any(|r| r.id == "job_101"));
    }

    #[test]
    fn test_dedup_by_id_keeps_first() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let first = JobRecord {
            amount: Some(1.0),
            ..JobRecord::new("same", date)
        };
        let second = JobRecord {
            amount: Some(2.0),
            ..JobRecord::new("same", date)
        };
        let other = JobRecord::new("other", date);

        let deduped = dedup_by_id(vec![first, second, other]);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].amount, Some(1.0));
        assert_eq!(deduped[1].id, "other");
    }
}
