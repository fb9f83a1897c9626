//! `techpay detail` subcommand

use std::path::Path;

use anyhow::anyhow;
use clap::Args;

use super::{prepare, FilterArgs};
use crate::services::{export, ReportLoader};

/// List one technician's jobs
#[derive(Args, Debug)]
pub struct DetailArgs {
    /// Technician id or display name (case-insensitive)
    #[arg(value_name = "TECHNICIAN")]
    pub technician: String,

    #[command(flatten)]
    pub filter: FilterArgs,
}

impl DetailArgs {
    pub fn run(self, config_path: Option<&Path>) -> anyhow::Result<()> {
        let (config, query) = prepare(&self.filter, config_path)?;
        let report = ReportLoader::from_config(&config).load(&query);

        let summary = report.find(&self.technician)?.ok_or_else(|| {
            anyhow!(
                "No jobs for technician '{}' between {} and {}",
                self.technician,
                query.start,
                query.end
            )
        })?;

        print!(
            "{}",
            export::render_detail(summary, &config.report.currency_symbol)
        );
        Ok(())
    }
}
