//! CSV job export reader

use crate::services::normalizer::{RawAmount, RawJobRecord};
use crate::types::{JobRecord, Result, TechpayError};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::RecordSource;

/// CSV row; every cell is text until validation
#[derive(Debug, Deserialize)]
struct CsvJobRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    organization_id: Option<String>,
    #[serde(default, alias = "employee_id")]
    technician_id: Option<String>,
    #[serde(default, alias = "employee_name")]
    technician_name: Option<String>,
    #[serde(default)]
    customer_name: Option<String>,
    #[serde(default, alias = "work_status")]
    status: Option<String>,
    #[serde(default, alias = "scheduled_start")]
    scheduled_date: Option<String>,
    #[serde(default, alias = "total_amount")]
    amount: Option<String>,
    #[serde(default, alias = "tip_amount")]
    tip: Option<String>,
    #[serde(default, alias = "cc_fee_amount")]
    cc_fee: Option<String>,
}

impl From<CsvJobRow> for RawJobRecord {
    fn from(row: CsvJobRow) -> Self {
        Self {
            id: row.id,
            organization_id: row.organization_id,
            technician_id: row.technician_id,
            technician_name: row.technician_name,
            customer_name: row.customer_name,
            status: row.status,
            scheduled_date: row.scheduled_date,
            amount: row.amount.map(RawAmount::Text),
            tip: row.tip.map(RawAmount::Text),
            cc_fee: row.cc_fee.map(RawAmount::Text),
        }
    }
}

/// Reads `*.csv` exports with a header row
pub struct CsvSource {
    data_dir: PathBuf,
}

impl CsvSource {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}

impl RecordSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn file_pattern(&self) -> &str {
        "**/*.csv"
    }

    fn parse_file(&self, path: &Path) -> Result<Vec<JobRecord>> {
        let file = File::open(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(file);
        let mut records = Vec::new();

        for (idx, row) in reader.deserialize::<CsvJobRow>().enumerate() {
            // Header is line 1
            let line = idx + 2;
            let result = row
                .map_err(|e| TechpayError::Parse(e.to_string()))
                .and_then(|row| RawJobRecord::from(row).validate());

            match result {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(file = %path.display(), line, error = %e, "skipping job row");
                }
            }
        }

        Ok(records)
    }
}
