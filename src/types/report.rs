//! Payroll report types

use serde::{Deserialize, Serialize};

use super::{JobRecord, Result, TechpayError};

/// Totals for one technician over a report period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianSummary {
    /// Grouping key: technician id, else name, else "Unassigned"
    pub technician_key: String,
    pub technician_name: String,
    pub job_count: u64,
    pub total_revenue: f64,
    pub total_tips: f64,
    pub total_cc_fees: f64,
    /// Always `total_revenue - total_cc_fees`; tips pass through to the technician
    pub net_revenue: f64,
    /// Contributing jobs in input order, for drill-down
    pub jobs: Vec<JobRecord>,
}

impl TechnicianSummary {
    pub fn new(technician_key: impl Into<String>, technician_name: impl Into<String>) -> Self {
        Self {
            technician_key: technician_key.into(),
            technician_name: technician_name.into(),
            job_count: 0,
            total_revenue: 0.0,
            total_tips: 0.0,
            total_cc_fees: 0.0,
            net_revenue: 0.0,
            jobs: Vec::new(),
        }
    }

    pub fn add(&mut self, job: &JobRecord) {
        self.total_revenue += job.gross();
        self.total_tips += job.tips();
        self.total_cc_fees += job.fees();
        self.job_count = self.job_count.saturating_add(1);
        self.jobs.push(job.clone());
        self.net_revenue = self.total_revenue - self.total_cc_fees;
    }
}

/// Field-wise sum over every summary in a report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GrandTotals {
    pub job_count: u64,
    pub total_revenue: f64,
    pub total_tips: f64,
    pub total_cc_fees: f64,
    pub net_revenue: f64,
}

impl GrandTotals {
    /// Sum summaries in the order given; net is derived, never summed.
    pub fn from_summaries(summaries: &[TechnicianSummary]) -> Self {
        let mut totals = Self::default();
        for summary in summaries {
            totals.job_count = totals.job_count.saturating_add(summary.job_count);
            totals.total_revenue += summary.total_revenue;
            totals.total_tips += summary.total_tips;
            totals.total_cc_fees += summary.total_cc_fees;
        }
        totals.net_revenue = totals.total_revenue - totals.total_cc_fees;
        totals
    }
}

/// Per-technician summaries ordered by descending revenue, plus grand totals
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PayrollReport {
    pub summaries: Vec<TechnicianSummary>,
    pub grand_totals: GrandTotals,
}

impl PayrollReport {
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Find a summary by grouping key or display name (case-insensitive).
    ///
    /// A key match wins over name matches. A name shared by technicians with
    /// different keys is a `Lookup` error listing those keys.
    pub fn find(&self, technician: &str) -> Result<Option<&TechnicianSummary>> {
        let needle = technician.trim().to_lowercase();

        if let Some(summary) = self
            .summaries
            .iter()
            .find(|s| s.technician_key.to_lowercase() == needle)
        {
            return Ok(Some(summary));
        }

        let named: Vec<&TechnicianSummary> = self
            .summaries
            .iter()
            .filter(|s| s.technician_name.to_lowercase() == needle)
            .collect();
        match named.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(*only)),
            many => {
                let keys: Vec<&str> = many.iter().map(|s| s.technician_key.as_str()).collect();
                Err(TechpayError::Lookup(format!(
                    "'{}' matches {} technicians ({}); use the technician id",
                    technician.trim(),
                    many.len(),
                    keys.join(", ")
                )))
            }
        }
    }
}
