mod detail;
mod report;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::Config;
use crate::services::ReportQuery;

pub use detail::DetailArgs;
pub use report::ReportArgs;

/// Per-technician payroll reports from field-service job exports
#[derive(Parser, Debug)]
#[command(name = "techpay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file (default: ~/.techpay/config.toml)
    #[arg(short, long, value_name = "FILE", global = true, env = "TECHPAY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show per-technician totals for a date range
    Report(ReportArgs),

    /// List the jobs behind one technician's totals
    Detail(DetailArgs),

    /// Write a default config file
    InitConfig,
}

/// Filters shared by every report command
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// First day of the report window (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    pub from: NaiveDate,

    /// Last day of the report window (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    pub to: NaiveDate,

    /// Organization id (overrides config)
    #[arg(long, value_name = "ID")]
    pub org: Option<String>,

    /// Accepted work status; repeat for several (overrides config)
    #[arg(long, value_name = "STATUS")]
    pub status: Vec<String>,

    /// Directory containing job exports (overrides config)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config_path = self.config.as_deref();
        match self.command {
            Commands::Report(args) => args.run(config_path),
            Commands::Detail(args) => args.run(config_path),
            Commands::InitConfig => init_config(config_path),
        }
    }
}

/// Resolve config (file + flags) and the report query it implies
fn prepare(
    filter: &FilterArgs,
    config_path: Option<&Path>,
) -> anyhow::Result<(Config, ReportQuery)> {
    let mut config = Config::resolve(config_path)?;
    config.merge_with_args(filter);

    let mut query =
        ReportQuery::new(filter.from, filter.to)?.with_statuses(&config.report.statuses);
    if let Some(org) = &config.organization.id {
        query = query.with_organization(org.clone());
    }
    Ok((config, query))
}

fn init_config(config_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => Config::default_path()?,
    };

    if path.exists() {
        bail!(
            "{} already exists. Remove it first or edit it manually.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["techpay"]).is_err());
    }

    #[test]
    fn test_cli_parse_report() {
        let cli = Cli::try_parse_from([
            "techpay", "report", "--from", "2024-03-01", "--to", "2024-03-31",
        ])
        .unwrap();
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.filter.from, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
                assert_eq!(args.filter.to, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
                assert!(!args.json);
                assert!(args.csv.is_none());
            }
            _ => panic!("expected report command"),
        }
    }

    #[test]
    fn test_cli_parse_report_flags() {
        let cli = Cli::try_parse_from([
            "techpay", "-vv", "report", "--from", "2024-03-01", "--to", "2024-03-31", "--org",
            "org_1", "--status", "completed", "--status", "paid", "--json", "--include-jobs",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.filter.org.as_deref(), Some("org_1"));
                assert_eq!(args.filter.status, vec!["completed", "paid"]);
                assert!(args.json);
                assert!(args.include_jobs);
            }
            _ => panic!("expected report command"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        let result = Cli::try_parse_from([
            "techpay", "report", "--from", "03/01/2024", "--to", "2024-03-31",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_detail() {
        let cli = Cli::try_parse_from([
            "techpay", "detail", "Ana Ruiz", "--from", "2024-03-01", "--to", "2024-03-31",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Detail(ref a) if a.technician == "Ana Ruiz"));
    }

    #[test]
    fn test_cli_parse_init_config() {
        let cli = Cli::try_parse_from(["techpay", "init-config"]).unwrap();
        assert!(matches!(cli.command, Commands::InitConfig));
    }

    #[test]
    fn test_prepare_rejects_inverted_window() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "").unwrap();
        let filter = FilterArgs {
            from: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            org: None,
            status: Vec::new(),
            data_dir: None,
        };

        assert!(prepare(&filter, Some(&path)).is_err());
    }

    #[test]
    fn test_prepare_builds_query_from_config_and_flags() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[organization]\nid = \"org_file\"\n").unwrap();
        let filter = FilterArgs {
            from: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            org: None,
            status: vec!["Paid".into()],
            data_dir: None,
        };

        let (config, query) = prepare(&filter, Some(&path)).unwrap();

        assert_eq!(config.organization.id.as_deref(), Some("org_file"));
        assert_eq!(query.organization_id.as_deref(), Some("org_file"));
        assert_eq!(query.statuses, vec!["paid"]);
    }

    #[test]
    fn test_init_config_writes_once() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        init_config(Some(&path)).unwrap();
        assert!(path.exists());
        let written = Config::load(&path).unwrap();
        assert_eq!(written, Config::default());

        // Refuses to overwrite
        assert!(init_config(Some(&path)).is_err());
    }
}
