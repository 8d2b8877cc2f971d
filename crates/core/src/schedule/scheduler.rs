//! Amortization scheduler.
//!
//! A purchase of N installments starting in month S is due in every month of
//! `[S, S + N - 1]`. Installments are derived per query and never stored.

use parcela_shared::types::YearMonth;
use rust_decimal::Decimal;

use super::types::{InstallmentOccurrence, Purchase};
use crate::currency::share;

/// True iff `month` falls within the purchase's installment window.
#[must_use]
pub fn is_active_in_month(purchase: &Purchase, month: YearMonth) -> bool {
    month >= purchase.start_month() && month <= purchase.end_month()
}

/// Which installment falls in `month`, clamped to `[1, installments]`.
#[must_use]
pub fn ordinal_in_month(purchase: &Purchase, month: YearMonth) -> u32 {
    let steps = purchase.start_month().months_until(month);
    let max = i64::from(purchase.installments.max(1));
    let ordinal = (steps + 1).clamp(1, max);
    u32::try_from(ordinal).unwrap_or(1)
}

/// Installments still due from `month` on, counting `month` itself.
#[must_use]
pub fn remaining_installments(purchase: &Purchase, month: YearMonth) -> u32 {
    if month > purchase.end_month() {
        return 0;
    }
    if month < purchase.start_month() {
        return purchase.installments;
    }
    (purchase.installments + 1).saturating_sub(ordinal_in_month(purchase, month))
}

/// Per-installment amount rounded for display and comparison.
#[must_use]
pub fn installment_amount(purchase: &Purchase) -> Decimal {
    share(purchase.total, purchase.installments)
}

/// Installments due in `month`, newest purchase first.
///
/// Purchases starting on the same date keep their input order.
#[must_use]
pub fn active_occurrences(purchases: &[Purchase], month: YearMonth) -> Vec<InstallmentOccurrence<'_>> {
    let mut occurrences: Vec<InstallmentOccurrence<'_>> = purchases
        .iter()
        .filter(|purchase| is_active_in_month(purchase, month))
        .map(|purchase| InstallmentOccurrence {
            purchase,
            ordinal: ordinal_in_month(purchase, month),
            month,
            amount: purchase.total / Decimal::from(purchase.installments.max(1)),
        })
        .collect();

    // Stable: equal start dates keep insertion order.
    occurrences.sort_by(|a, b| b.purchase.start_date.cmp(&a.purchase.start_date));
    occurrences
}
