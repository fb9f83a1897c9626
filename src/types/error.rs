use thiserror::Error;

/// techpay error types
#[derive(Error, Debug)]
pub enum TechpayError {
    /// A JSONL line or CSV row could not be decoded. Raised per row by the
    /// record sources, which log it and skip the row.
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error: opening an export file, reading the config file or
    /// writing a CSV export
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A decoded row failed `RawJobRecord::validate` (missing id, bad date,
    /// unusable amount). Sources log and skip these rows.
    #[error("invalid record: {0}")]
    Validation(String),

    /// Unreadable config file, missing home directory or an inverted
    /// report window
    #[error("config error: {0}")]
    Config(String),

    /// A technician name matches more than one summary in a report
    #[error("lookup error: {0}")]
    Lookup(String),

    /// JSON or CSV report output could not be produced
    #[error("export error: {0}")]
    Export(String),
}

/// Result type alias for techpay
pub type Result<T> = std::result::Result<T, TechpayError>;
