//! Shared installment purchases and their monthly schedule.
//!
//! This module implements:
//! - Purchase records (the shared household expenses)
//! - The amortization scheduler (which installment is due in a month)
//! - The purchase book service mirroring purchases to storage

pub mod error;
pub mod scheduler;
pub mod service;
pub mod types;

#[cfg(test)]
mod props;

pub use error::PurchaseError;
pub use scheduler::{
    active_occurrences, installment_amount, is_active_in_month, ordinal_in_month,
    remaining_installments,
};
pub use service::PurchaseBook;
pub use types::{InstallmentOccurrence, NewPurchase, Purchase};
