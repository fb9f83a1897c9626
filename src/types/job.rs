//! Job record types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel grouping key for jobs with neither a technician id nor a name
pub const UNASSIGNED: &str = "Unassigned";

/// One completed, billable job in a report period.
///
/// Produced by the record sources after boundary validation, so the
/// aggregator can rely on `id` being non-empty and amounts being finite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    /// Stable external technician id (e.g. HouseCall Pro employee id)
    #[serde(default)]
    pub technician_id: Option<String>,
    #[serde(default)]
    pub technician_name: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Upstream work status (e.g. "completed", "paid")
    #[serde(default)]
    pub status: Option<String>,
    pub scheduled_date: NaiveDate,
    /// Gross amount billed
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub tip: Option<f64>,
    /// Card processing fee
    #[serde(default)]
    pub cc_fee: Option<f64>,
}

impl JobRecord {
    /// Create a job with only the required fields set
    pub fn new(id: impl Into<String>, scheduled_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            organization_id: None,
            technician_id: None,
            technician_name: None,
            customer_name: None,
            status: None,
            scheduled_date,
            amount: None,
            tip: None,
            cc_fee: None,
        }
    }

    pub fn gross(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    pub fn tips(&self) -> f64 {
        self.tip.unwrap_or(0.0)
    }

    pub fn fees(&self) -> f64 {
        self.cc_fee.unwrap_or(0.0)
    }
}
