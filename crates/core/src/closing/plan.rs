//! Pure closing arithmetic.

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::ClosingError;
use crate::currency::{exceeds, round2};

/// How a closed month ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosingOutcome {
    /// Nothing left; no debt opened.
    FullySettled,
    /// The remainder became a new debt.
    PartiallySettled,
}

/// The numeric split of a month closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClosingPlan {
    /// What the person owed for the month.
    pub month_total: Decimal,
    /// Paid before closing.
    pub already_paid: Decimal,
    /// Paid as part of closing.
    pub paying_now: Decimal,
    /// Left unpaid after closing; a debt when positive.
    pub remainder: Decimal,
}

impl ClosingPlan {
    /// Splits `paying_now` against what is left of `month_total`.
    ///
    /// # Errors
    ///
    /// Negative payments, and payments above the remaining amount plus one
    /// cent, are rejected.
    pub fn compute(
        month_total: Decimal,
        already_paid: Decimal,
        paying_now: Decimal,
    ) -> Result<Self, ClosingError> {
        let paying_now = round2(paying_now);
        if paying_now < Decimal::ZERO {
            return Err(ClosingError::NegativePayment);
        }
        let remaining = round2(month_total - already_paid);
        if exceeds(paying_now, remaining) {
            return Err(ClosingError::ExceedsRemaining {
                paying_now,
                remaining,
            });
        }

        Ok(Self {
            month_total: round2(month_total),
            already_paid: round2(already_paid),
            paying_now,
            remainder: round2(remaining - paying_now),
        })
    }

    /// Amount the carry-over debt opens with, if any.
    #[must_use]
    pub fn carry_over(&self) -> Option<Decimal> {
        (self.remainder > Decimal::ZERO).then_some(self.remainder)
    }

    /// Settled or carried over.
    #[must_use]
    pub fn outcome(&self) -> ClosingOutcome {
        if self.carry_over().is_some() {
            ClosingOutcome::PartiallySettled
        } else {
            ClosingOutcome::FullySettled
        }
    }
}
