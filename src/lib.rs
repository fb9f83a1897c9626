//! techpay: per-technician payroll reports from field-service job exports

pub mod cli;
pub mod config;
pub mod services;
pub mod sources;
pub mod types;
