//! Monthly per-person aggregation.

pub mod aggregator;

pub use aggregator::{PersonSummary, month_total, summarize, summary_for};
