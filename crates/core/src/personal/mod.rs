//! Personal expenses.
//!
//! This module implements:
//! - Expansion of a credit purchase into one record per installment
//! - Series reconciliation when an edit changes the installment count
//! - Paid and active toggles, month listings and totals
//!
//! Siblings are linked by an explicit [`SeriesId`](parcela_shared::types::SeriesId)
//! assigned at creation, never by matching descriptions.

pub mod error;
pub mod series;
pub mod service;
pub mod types;

#[cfg(test)]
mod series_props;

pub use error::ExpenseError;
pub use series::{SeriesChange, expand, plan_resize, strip_suffix, with_suffix};
pub use service::PersonalExpenses;
pub use types::{
    CategoryDraft, ExpenseCategory, ExpenseDraft, ExpensePatch, MonthTotals, PersonalExpense,
};
