//! `techpay report` subcommand

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use super::{prepare, FilterArgs};
use crate::services::{export, ReportLoader};

/// Show per-technician totals
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write the report as CSV to this file
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Include each technician's jobs in JSON output
    #[arg(long, requires = "json")]
    pub include_jobs: bool,
}

impl ReportArgs {
    pub fn run(self, config_path: Option<&Path>) -> anyhow::Result<()> {
        let (config, query) = prepare(&self.filter, config_path)?;
        let report = ReportLoader::from_config(&config).load(&query);

        if let Some(path) = &self.csv {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            export::write_csv(&report, file)?;
            info!(path = %path.display(), "wrote CSV report");
        }

        if self.json {
            println!("{}", export::to_json(&report, self.include_jobs)?);
        } else {
            print!(
                "{}",
                export::render_table(&report, &config.report.currency_symbol)
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_run_writes_csv() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();
        let csv_path = tmp.path().join("payroll.csv");

        let args = ReportArgs {
            filter: FilterArgs {
                from: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                to: NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
                org: Some("org_1".into()),
                status: Vec::new(),
                data_dir: Some(PathBuf::from("tests/fixtures/jobs")),
            },
            json: true,
            csv: Some(csv_path.clone()),
            include_jobs: false,
        };

        args.run(Some(&config_path)).unwrap();

        let written = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "technician,jobs,revenue,tips,cc_fees,net");
        assert_eq!(lines[1], "Ben Cole,2,1400.00,10.00,40.60,1359.40");
        assert!(lines.last().unwrap().starts_with("TOTAL,7,3000.50,75.00,87.01,"));
    }
}
