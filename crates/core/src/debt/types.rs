//! Debt ledger domain types.

use chrono::NaiveDate;
use parcela_shared::types::{DebtId, PaymentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::Entity;

/// An interest-free balance one person owes.
///
/// Invariants: `0 <= current <= original` and
/// `original - current == sum(payments)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtBalance {
    /// Unique identifier.
    pub id: DebtId,
    /// Who owes it.
    pub person: String,
    /// Free text, e.g. the month it was carried over from.
    pub description: String,
    /// Amount at creation.
    pub original: Decimal,
    /// Amount still owed.
    pub current: Decimal,
    /// Creation date.
    pub created_on: NaiveDate,
    /// Append-only payment history, oldest first.
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
}

impl DebtBalance {
    /// Sum of the payment history.
    #[must_use]
    pub fn total_paid(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// True once nothing is owed.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.current <= Decimal::ZERO
    }

    pub(crate) fn payment(&self, id: PaymentId) -> Option<&PaymentRecord> {
        self.payments.iter().find(|p| p.id == id)
    }
}

impl Entity for DebtBalance {
    type Id = DebtId;
    type Patch = DebtPatch;

    const KIND: &'static str = "debts";

    fn id(&self) -> DebtId {
        self.id
    }
}

/// One payment against a debt. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Unique identifier.
    pub id: PaymentId,
    /// Amount actually applied.
    pub amount: Decimal,
    /// When it was paid.
    pub date: NaiveDate,
    /// Optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Fields a debt mutation may change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DebtPatch {
    /// New remaining amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<Decimal>,
    /// Replacement payment history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments: Option<Vec<PaymentRecord>>,
}

/// Result of applying a payment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPayment {
    /// The debt paid against.
    pub debt_id: DebtId,
    /// The record appended to the history.
    pub payment: PaymentRecord,
    /// Amount the caller asked to pay.
    pub requested: Decimal,
    /// Balance left after the payment.
    pub remaining: Decimal,
}

impl AppliedPayment {
    /// Amount actually applied.
    #[must_use]
    pub fn applied(&self) -> Decimal {
        self.payment.amount
    }

    /// True when the request exceeded the balance and was cut down.
    #[must_use]
    pub fn was_clamped(&self) -> bool {
        self.payment.amount < self.requested
    }
}
