//! Type definitions for techpay

mod error;
mod job;
mod report;

pub use error::*;
pub use job::*;
pub use report::*;
