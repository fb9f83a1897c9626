//! Aggregator service for computing payroll summaries

use crate::services::normalizer::grouping_key;
use crate::types::{GrandTotals, JobRecord, PayrollReport, TechnicianSummary, UNASSIGNED};
use std::collections::HashMap;

/// Aggregator for computing payroll summaries
pub struct Aggregator;

impl Aggregator {
    /// Group jobs per technician and compute grand totals.
    ///
    /// Summaries are sorted by descending revenue. The sort is stable, so
    /// technicians with equal revenue keep the order they first appeared in.
    /// Input is never reordered or mutated and amounts are not rounded.
    pub fn aggregate(jobs: &[JobRecord]) -> PayrollReport {
        if jobs.is_empty() {
            return PayrollReport::default();
        }

        // Insertion-ordered: index into `summaries` by key
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut summaries: Vec<TechnicianSummary> = Vec::new();
        let mut named: Vec<bool> = Vec::new();

        for job in jobs {
            let key = grouping_key(job);

            let slot = match index.get(&key.key).copied() {
                Some(slot) => slot,
                None => {
                    let name = key.display_name.as_deref().unwrap_or(UNASSIGNED);
                    summaries.push(TechnicianSummary::new(key.key.clone(), name));
                    named.push(key.display_name.is_some());
                    index.insert(key.key, summaries.len() - 1);
                    summaries.len() - 1
                }
            };

            // First non-empty name wins, even if it shows up after the first job
            if !named[slot] {
                if let Some(name) = key.display_name {
                    summaries[slot].technician_name = name;
                    named[slot] = true;
                }
            }

            summaries[slot].add(job);
        }

        summaries.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue));

        let grand_totals = GrandTotals::from_summaries(&summaries);
        PayrollReport {
            summaries,
            grand_totals,
        }
    }
}
