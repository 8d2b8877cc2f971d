//! Month closing.
//!
//! Splits what a person pays at the end of a month into a partial payment
//! and, when money is still missing, a new debt carrying the remainder.
//! Purchases are never touched; closing again recomputes from the latest
//! tracker state.

pub mod error;
pub mod plan;
pub mod service;

pub use error::ClosingError;
pub use plan::{ClosingOutcome, ClosingPlan};
pub use service::{ClosingReport, ClosingRequest, close_month};
