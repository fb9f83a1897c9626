//! Report query: the upstream filter applied before aggregation

use chrono::NaiveDate;

use crate::types::{JobRecord, Result, TechpayError};

/// Which jobs belong in a report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportQuery {
    /// Only jobs for this organization (None = no organization filter)
    pub organization_id: Option<String>,
    /// First day of the window (inclusive)
    pub start: NaiveDate,
    /// Last day of the window (inclusive)
    pub end: NaiveDate,
    /// Accepted work statuses, compared case-insensitively. Empty accepts all.
    pub statuses: Vec<String>,
}

impl ReportQuery {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(TechpayError::Config(format!(
                "report window starts after it ends ({} > {})",
                start, end
            )));
        }
        Ok(Self {
            organization_id: None,
            start,
            end,
            statuses: Vec::new(),
        })
    }

    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn with_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.statuses = statuses
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    pub fn matches(&self, job: &JobRecord) -> bool {
        if let Some(org) = &self.organization_id {
            if job.organization_id.as_deref() != Some(org.as_str()) {
                return false;
            }
        }

        if job.scheduled_date < self.start || job.scheduled_date > self.end {
            return false;
        }

        if self.statuses.is_empty() {
            return true;
        }
        job.status.as_deref().is_some_and(|status| {
            let status = status.trim().to_lowercase();
            self.statuses.iter().any(|s| s.trim().to_lowercase() == status)
        })
    }

    /// Keep matching jobs, ordered by schedule date then id.
    pub fn apply(&self, jobs: Vec<JobRecord>) -> Vec<JobRecord> {
        let mut kept: Vec<JobRecord> = jobs.into_iter().filter(|j| self.matches(j)).collect();
        kept.sort_by(|a, b| {
            a.scheduled_date
                .cmp(&b.scheduled_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        kept
    }
}
