//! passbook-finance: summary statistics and report export over parsed statements

pub mod report;
pub mod summary;

pub use report::{Report, ReportError};
pub use summary::{CategoryTotal, Summary};
