//! Summary module - per-country aggregation and report rows

mod aggregator;
mod report;

pub use aggregator::{AggregateError, Aggregator, HaplogroupSummary};
pub use report::{ReportTable, REPORT_HEADERS};
