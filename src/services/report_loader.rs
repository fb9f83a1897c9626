//! Report loading: record sources → query filter → aggregator
//!
//! Every call reloads and re-aggregates from scratch.

use tracing::{debug, info};

use crate::config::Config;
use crate::services::filter::ReportQuery;
use crate::services::Aggregator;
use crate::sources::SourceRegistry;
use crate::types::PayrollReport;

/// Builds payroll reports from exported job files
pub struct ReportLoader {
    registry: SourceRegistry,
}

impl ReportLoader {
    pub fn new(registry: SourceRegistry) -> Self {
        Self { registry }
    }

    /// Loader over the configured export directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(SourceRegistry::new(config.source.data_dir.clone()))
    }

    /// Load, filter and aggregate jobs for `query`
    pub fn load(&self, query: &ReportQuery) -> PayrollReport {
        let records = self.registry.load_all();
        let loaded = records.len();

        let jobs = query.apply(records);
        debug!(loaded, matched = jobs.len(), "applied report query");

        let report = Aggregator::aggregate(&jobs);
        info!(
            technicians = report.summaries.len(),
            jobs = report.grand_totals.job_count,
            start = %query.start,
            end = %query.end,
            "built payroll report"
        );
        report
    }
}
