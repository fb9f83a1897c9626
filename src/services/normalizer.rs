//! Record boundary normalization
//!
//! Upstream exports are loosely typed: amounts arrive as numbers or as
//! strings like `"$1,250.00"`, dates as plain days or full timestamps, and
//! technician fields may be blank. Everything is validated here so the
//! aggregator only ever sees well-formed `JobRecord`s.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::types::{JobRecord, Result, TechpayError, UNASSIGNED};

/// Monetary value as it appears in an export
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

/// Job row before validation.
///
/// Field aliases cover the HouseCall Pro export names alongside our own.
/// A row carrying both spellings of one field fails with a duplicate-field
/// error and is skipped by the source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawJobRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "organizationId")]
    pub organization_id: Option<String>,
    #[serde(default, alias = "technicianId", alias = "employee_id")]
    pub technician_id: Option<String>,
    #[serde(default, alias = "technicianName", alias = "employee_name")]
    pub technician_name: Option<String>,
    #[serde(default, alias = "customerName")]
    pub customer_name: Option<String>,
    #[serde(default, alias = "work_status")]
    pub status: Option<String>,
    #[serde(default, alias = "scheduledDate", alias = "scheduled_start")]
    pub scheduled_date: Option<String>,
    #[serde(default, alias = "total_amount")]
    pub amount: Option<RawAmount>,
    #[serde(default, alias = "tip_amount")]
    pub tip: Option<RawAmount>,
    #[serde(default, alias = "ccFee", alias = "cc_fee_amount")]
    pub cc_fee: Option<RawAmount>,
}

impl RawJobRecord {
    /// Validate into a `JobRecord`.
    ///
    /// Rejects a missing id, a missing or unparseable schedule date, and any
    /// amount that is not a finite number. Blank optional text becomes `None`.
    pub fn validate(self) -> Result<JobRecord> {
        let id = non_empty(self.id)
            .ok_or_else(|| TechpayError::Validation("missing job id".into()))?;

        let scheduled_date = match non_empty(self.scheduled_date) {
            Some(raw) => parse_schedule_date(&raw).ok_or_else(|| {
                TechpayError::Validation(format!("job {}: invalid scheduled date '{}'", id, raw))
            })?,
            None => {
                return Err(TechpayError::Validation(format!(
                    "job {}: missing scheduled date",
                    id
                )))
            }
        };

        let amount = parse_amount(self.amount.as_ref(), &id, "amount")?;
        let tip = parse_amount(self.tip.as_ref(), &id, "tip")?;
        let cc_fee = parse_amount(self.cc_fee.as_ref(), &id, "cc_fee")?;

        Ok(JobRecord {
            id,
            organization_id: non_empty(self.organization_id),
            technician_id: non_empty(self.technician_id),
            technician_name: non_empty(self.technician_name),
            customer_name: non_empty(self.customer_name),
            status: non_empty(self.status),
            scheduled_date,
            amount,
            tip,
            cc_fee,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_amount(raw: Option<&RawAmount>, id: &str, field: &str) -> Result<Option<f64>> {
    let value = match raw {
        None => return Ok(None),
        Some(RawAmount::Number(n)) => *n,
        Some(RawAmount::Text(text)) => {
            let cleaned: String = text
                .trim()
                .chars()
                .filter(|c| *c != '$' && *c != ',')
                .collect();
            if cleaned.is_empty() {
                return Ok(None);
            }
            cleaned.parse::<f64>().map_err(|_| {
                TechpayError::Validation(format!("job {}: invalid {} '{}'", id, field, text))
            })?
        }
    };

    if !value.is_finite() {
        return Err(TechpayError::Validation(format!(
            "job {}: {} is not finite",
            id, field
        )));
    }
    Ok(Some(value))
}

/// Parse `YYYY-MM-DD`, RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS` timestamp.
///
/// Timestamps keep the calendar date they were written with; no timezone
/// conversion happens.
pub fn parse_schedule_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// Resolved grouping key for a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingKey {
    pub key: String,
    /// Technician display name carried by this job, if any
    pub display_name: Option<String>,
}

/// Resolve the grouping key: technician id > technician name > "Unassigned".
///
/// Whitespace-only values count as absent, so jobs sharing an id always
/// group together whatever their display names look like.
pub fn grouping_key(job: &JobRecord) -> GroupingKey {
    let id = trimmed(job.technician_id.as_deref());
    let name = trimmed(job.technician_name.as_deref());

    let key = id.or(name).unwrap_or(UNASSIGNED).to_string();
    GroupingKey {
        key,
        display_name: name.map(String::from),
    }
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
