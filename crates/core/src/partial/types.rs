//! Partial payment types.

use chrono::NaiveDate;
use parcela_shared::types::{PartialPaymentId, YearMonth};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::Entity;

/// Money handed over toward one person's month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialPayment {
    /// Unique identifier; time-ordered, so it also gives stack order.
    pub id: PartialPaymentId,
    /// Who paid.
    pub person: String,
    /// Month paid toward.
    pub month: YearMonth,
    /// Amount paid.
    pub amount: Decimal,
    /// When it was paid.
    pub paid_on: NaiveDate,
}

impl PartialPayment {
    /// True if this entry belongs to `(person, month)`.
    #[must_use]
    pub fn is_for(&self, person: &str, month: YearMonth) -> bool {
        self.person == person && self.month == month
    }
}

impl Entity for PartialPayment {
    type Id = PartialPaymentId;
    type Patch = PartialPaymentPatch;

    const KIND: &'static str = "partial_payments";

    fn id(&self) -> PartialPaymentId {
        self.id
    }
}

/// Entries are only added and undone, never edited, so the patch carries
/// no fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartialPaymentPatch {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_is_an_empty_document() {
        assert_eq!(
            serde_json::to_value(PartialPaymentPatch::default()).unwrap(),
            serde_json::json!({})
        );
    }
}
