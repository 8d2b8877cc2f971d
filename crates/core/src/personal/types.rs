//! Personal expense domain types.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use parcela_shared::types::{ExpenseId, SeriesId, YearMonth};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::round2;
use crate::instrument::PaymentKind;
use crate::store::Entity;

/// What kind of personal expense a record is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Entirely mine.
    Personal,
    /// Shared with someone; only `my_share` of this occurrence is mine.
    Split {
        /// Who the rest belongs to.
        counterparty: String,
        /// My part of this occurrence.
        my_share: Decimal,
    },
    /// A bill that recurs every month.
    Fixed {
        /// Day of the month it is due.
        due_day: u32,
        /// Inactive bills are listed but not totalled.
        active: bool,
    },
}

/// One occurrence of a personal expense.
///
/// A credit purchase in N installments is stored as N records sharing a
/// `series_id`, each one calendar month after the previous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalExpense {
    /// Unique identifier.
    pub id: ExpenseId,
    /// Links the installments of one purchase.
    pub series_id: SeriesId,
    /// Description, suffixed ` (k/N)` when part of a series.
    pub description: String,
    /// This occurrence's amount.
    pub amount: Decimal,
    /// Payment instrument.
    pub kind: PaymentKind,
    /// Personal, split or fixed.
    pub category: ExpenseCategory,
    /// Date of this occurrence.
    pub date: NaiveDate,
    /// Whether this occurrence was paid.
    pub paid: bool,
    /// When it was paid.
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,
    /// Series length.
    pub installments: u32,
    /// Position in the series (1-based).
    pub ordinal: u32,
    /// Total of the whole purchase as entered, before division.
    #[serde(default)]
    pub series_total: Option<Decimal>,
    /// My part of the whole purchase as entered; split expenses only.
    #[serde(default)]
    pub share_total: Option<Decimal>,
    /// Months in which a fixed bill was paid.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub paid_months: BTreeSet<YearMonth>,
}

impl PersonalExpense {
    /// Calendar month of this occurrence.
    #[must_use]
    pub fn month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }

    /// My part of this occurrence.
    #[must_use]
    pub fn my_share(&self) -> Decimal {
        match &self.category {
            ExpenseCategory::Split { my_share, .. } => *my_share,
            ExpenseCategory::Personal | ExpenseCategory::Fixed { .. } => self.amount,
        }
    }

    /// True for recurring bills.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self.category, ExpenseCategory::Fixed { .. })
    }

    /// Whether the occurrence shown in `month` is paid.
    ///
    /// A fixed bill recurs, so its state is kept per month; debit bills
    /// are always paid.
    #[must_use]
    pub fn is_paid_in(&self, month: YearMonth) -> bool {
        if self.is_fixed() {
            !self.kind.is_credit() || self.paid_months.contains(&month)
        } else {
            self.paid
        }
    }

    /// False only for a deactivated fixed bill.
    #[must_use]
    pub fn counts_toward_total(&self) -> bool {
        !matches!(self.category, ExpenseCategory::Fixed { active: false, .. })
    }
}

impl Entity for PersonalExpense {
    type Id = ExpenseId;
    type Patch = ExpensePatch;

    const KIND: &'static str = "personal_expenses";

    fn id(&self) -> ExpenseId {
        self.id
    }
}

/// Fields an expense mutation may change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpensePatch {
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// New instrument.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<PaymentKind>,
    /// New category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ExpenseCategory>,
    /// New date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// New paid flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid: Option<bool>,
    /// New payment date; `Some(None)` clears it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<Option<NaiveDate>>,
    /// New series length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    /// New position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<u32>,
    /// New purchase total; `Some(None)` clears it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_total: Option<Option<Decimal>>,
    /// New share total; `Some(None)` clears it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_total: Option<Option<Decimal>>,
    /// New set of paid months.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_months: Option<BTreeSet<YearMonth>>,
}

impl ExpensePatch {
    /// Patch turning `from` into `to`, covering only the fields that differ.
    #[must_use]
    pub fn between(from: &PersonalExpense, to: &PersonalExpense) -> Self {
        fn changed<T: PartialEq + Clone>(old: &T, new: &T) -> Option<T> {
            (old != new).then(|| new.clone())
        }

        Self {
            description: changed(&from.description, &to.description),
            amount: changed(&from.amount, &to.amount),
            kind: changed(&from.kind, &to.kind),
            category: changed(&from.category, &to.category),
            date: changed(&from.date, &to.date),
            paid: changed(&from.paid, &to.paid),
            paid_on: changed(&from.paid_on, &to.paid_on),
            installments: changed(&from.installments, &to.installments),
            ordinal: changed(&from.ordinal, &to.ordinal),
            series_total: changed(&from.series_total, &to.series_total),
            share_total: changed(&from.share_total, &to.share_total),
            paid_months: changed(&from.paid_months, &to.paid_months),
        }
    }

    /// True when applying the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Category as entered, before it is divided across installments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryDraft {
    /// Entirely mine.
    Personal,
    /// Shared; `my_share_total` is my part of the whole purchase.
    Split {
        /// Who the rest belongs to.
        counterparty: String,
        /// My part of the total.
        my_share_total: Decimal,
    },
    /// Recurring bill.
    Fixed {
        /// Day of the month it is due.
        due_day: u32,
    },
}

/// A personal expense as entered for create or edit.
#[derive(Debug, Clone)]
pub struct ExpenseDraft {
    /// Description; a trailing ` (k/N)` is ignored.
    pub description: String,
    /// Total of the whole purchase.
    pub total: Decimal,
    /// Payment instrument.
    pub kind: PaymentKind,
    /// Category as entered.
    pub category: CategoryDraft,
    /// First installment's date on create; the edited occurrence's date on edit.
    pub date: NaiveDate,
    /// Requested installment count.
    pub installments: u32,
}

impl ExpenseDraft {
    /// Draft describing `record`'s series as it stands; the starting point
    /// for an edit.
    ///
    /// Totals come from the amounts entered at creation. Records stored
    /// without them fall back to the installment times the series length.
    #[must_use]
    pub fn from_record(record: &PersonalExpense) -> Self {
        let count = Decimal::from(record.installments.max(1));
        let category = match &record.category {
            ExpenseCategory::Personal => CategoryDraft::Personal,
            ExpenseCategory::Split {
                counterparty,
                my_share,
            } => CategoryDraft::Split {
                counterparty: counterparty.clone(),
                my_share_total: record
                    .share_total
                    .unwrap_or_else(|| round2(*my_share * count)),
            },
            ExpenseCategory::Fixed { due_day, .. } => CategoryDraft::Fixed { due_day: *due_day },
        };
        Self {
            description: record.description.clone(),
            total: record
                .series_total
                .unwrap_or_else(|| round2(record.amount * count)),
            kind: record.kind,
            category,
            date: record.date,
            installments: record.installments,
        }
    }

    /// Installments actually created: debit purchases and fixed bills are
    /// always a single record.
    #[must_use]
    pub fn effective_installments(&self) -> u32 {
        if !self.kind.is_credit() || matches!(self.category, CategoryDraft::Fixed { .. }) {
            1
        } else {
            self.installments.max(1)
        }
    }
}

/// Aggregates for one month of personal expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MonthTotals {
    /// Sum of every counted occurrence.
    pub total: Decimal,
    /// Part already paid.
    pub paid: Decimal,
    /// Part still to pay.
    pub pending: Decimal,
    /// My share of the total.
    pub my_share: Decimal,
}
