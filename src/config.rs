//! Configuration file handling.
//!
//! Settings live in `~/.techpay/config.toml`. Every section is optional and
//! command-line flags take precedence over file values.

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::FilterArgs;
use crate::types::{Result, TechpayError};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Organization settings.
    #[serde(default)]
    pub organization: OrganizationConfig,

    /// Export file settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Which organization's jobs to report on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationConfig {
    /// Organization id; jobs for other organizations are ignored.
    #[serde(default)]
    pub id: Option<String>,
}

/// Where job exports are read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory scanned recursively for `*.jsonl` and `*.csv` exports.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("exports")
}

/// Report filtering and formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Work statuses that count as billable.
    #[serde(default = "default_statuses")]
    pub statuses: Vec<String>,

    /// Currency symbol used in text output.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            statuses: default_statuses(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

fn default_statuses() -> Vec<String> {
    vec!["completed".to_string(), "paid".to_string()]
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Config {
    /// Default config location: `~/.techpay/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| TechpayError::Config("Cannot determine home directory".into()))?;
        Ok(base_dirs.home_dir().join(".techpay").join("config.toml"))
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            TechpayError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Load an explicitly requested file, or the default file when present.
    ///
    /// A missing explicit file is an error; a missing default file means
    /// built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(TechpayError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load(path);
        }

        match Self::default_path() {
            Ok(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Merge command-line filter flags into this configuration.
    ///
    /// Only flags that were actually given override file values.
    pub fn merge_with_args(&mut self, args: &FilterArgs) {
        if let Some(ref org) = args.org {
            self.organization.id = Some(org.clone());
        }
        if let Some(ref dir) = args.data_dir {
            self.source.data_dir = dir.clone();
        }
        if !args.status.is_empty() {
            self.report.statuses = args.status.clone();
        }
    }

    /// Generate the default configuration as a TOML string.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
