//! Purchase domain types.

use chrono::NaiveDate;
use parcela_shared::types::{PurchaseId, YearMonth};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::round2;
use crate::instrument::PaymentKind;
use crate::store::Entity;

/// A shared purchase attributed to one person and amortized monthly.
///
/// Only the total is stored; each installment is `total / installments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    /// Unique identifier.
    pub id: PurchaseId,
    /// What was bought.
    pub description: String,
    /// Who owes it.
    pub person: String,
    /// Full purchase amount, fixed at creation.
    pub total: Decimal,
    /// Number of monthly installments (at least 1).
    pub installments: u32,
    /// Date of the first installment; only its month matters.
    pub start_date: NaiveDate,
    /// Payment instrument.
    pub kind: PaymentKind,
}

impl Purchase {
    /// Month of the first installment.
    #[must_use]
    pub fn start_month(&self) -> YearMonth {
        YearMonth::of(self.start_date)
    }

    /// Month of the last installment.
    #[must_use]
    pub fn end_month(&self) -> YearMonth {
        let span = i32::try_from(self.installments.max(1) - 1).unwrap_or(i32::MAX);
        self.start_month().plus_months(span)
    }
}

impl Entity for Purchase {
    type Id = PurchaseId;
    // Edits overwrite the whole record.
    type Patch = Purchase;

    const KIND: &'static str = "purchases";

    fn id(&self) -> PurchaseId {
        self.id
    }
}

/// Input for creating or replacing a purchase.
#[derive(Debug, Clone)]
pub struct NewPurchase {
    /// What was bought.
    pub description: String,
    /// Who owes it.
    pub person: String,
    /// Full purchase amount.
    pub total: Decimal,
    /// Number of monthly installments.
    pub installments: u32,
    /// Date of the first installment.
    pub start_date: NaiveDate,
    /// Payment instrument.
    pub kind: PaymentKind,
}

impl NewPurchase {
    /// Builds the stored record, trimming text and rounding the total.
    #[must_use]
    pub fn into_purchase(self, id: PurchaseId) -> Purchase {
        Purchase {
            id,
            description: self.description.trim().to_string(),
            person: self.person.trim().to_string(),
            total: round2(self.total),
            installments: self.installments,
            start_date: self.start_date,
            kind: self.kind,
        }
    }
}

/// One month's share of a purchase. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentOccurrence<'a> {
    /// The purchase being amortized.
    pub purchase: &'a Purchase,
    /// Which installment falls in `month` (1-based).
    pub ordinal: u32,
    /// The queried month.
    pub month: YearMonth,
    /// Unrounded `total / installments`; round only for display.
    pub amount: Decimal,
}

impl InstallmentOccurrence<'_> {
    /// Person who owes this installment.
    #[must_use]
    pub fn person(&self) -> &str {
        &self.purchase.person
    }

    /// `k/N` label.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}/{}", self.ordinal, self.purchase.installments)
    }
}
