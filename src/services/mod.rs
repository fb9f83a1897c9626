//! Services for record normalization, filtering, aggregation and export

pub mod aggregator;
pub mod export;
pub mod filter;
pub mod normalizer;
pub mod report_loader;

pub use aggregator::Aggregator;
pub use filter::ReportQuery;
pub use normalizer::{grouping_key, RawJobRecord};
pub use report_loader::ReportLoader;
