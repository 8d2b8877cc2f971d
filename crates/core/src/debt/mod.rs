//! Debt ledger.
//!
//! Interest-free balances with an append-only payment history. Balances are
//! opened directly or by month closing, paid down with clamping, and payments
//! can be undone one at a time.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::DebtError;
pub use service::DebtLedger;
pub use types::{AppliedPayment, DebtBalance, DebtPatch, PaymentRecord};
