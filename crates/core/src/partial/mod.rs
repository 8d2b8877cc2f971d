//! Partial payments against a person's monthly total.
//!
//! Entries are keyed by (person, month) and behave as a stack: only the most
//! recently added entry for a key can be undone.

pub mod error;
pub mod service;
pub mod types;

pub use error::PartialPaymentError;
pub use service::PartialPaymentTracker;
pub use types::{PartialPayment, PartialPaymentPatch};
