//! Month closing across the tracker and the ledger.

use parcela_shared::types::YearMonth;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, info, warn};

use super::error::ClosingError;
use super::plan::{ClosingOutcome, ClosingPlan};
use crate::debt::{DebtBalance, DebtLedger};
use crate::partial::{PartialPayment, PartialPaymentTracker};

/// A request to close one person's month.
#[derive(Debug, Clone)]
pub struct ClosingRequest {
    /// Who is closing.
    pub person: String,
    /// The month being closed.
    pub month: YearMonth,
    /// The person's aggregate for the month.
    pub month_total: Decimal,
    /// What they hand over now.
    pub paying_now: Decimal,
}

/// What closing did.
#[derive(Debug, Clone, Serialize)]
pub struct ClosingReport {
    /// Who closed.
    pub person: String,
    /// The closed month.
    pub month: YearMonth,
    /// The numeric split.
    pub plan: ClosingPlan,
    /// Settled or carried over.
    pub outcome: ClosingOutcome,
    /// Partial payment recorded for `paying_now`, if positive.
    pub payment: Option<PartialPayment>,
    /// Debt opened for the remainder, if positive.
    pub carried_debt: Option<DebtBalance>,
}

/// Closes a month: records `paying_now` and opens a debt for the remainder.
///
/// If the debt cannot be opened after the payment was recorded, the payment
/// is undone before the error is returned, so either both effects land or
/// neither does.
pub async fn close_month(
    tracker: &mut PartialPaymentTracker,
    ledger: &mut DebtLedger,
    request: &ClosingRequest,
) -> Result<ClosingReport, ClosingError> {
    let person = request.person.trim();
    let month = request.month;
    let already_paid = tracker.paid_to_date(person, month);
    let plan = ClosingPlan::compute(request.month_total, already_paid, request.paying_now)?;

    let payment = if plan.paying_now > Decimal::ZERO {
        Some(
            tracker
                .add(person, month, plan.paying_now, plan.month_total)
                .await?,
        )
    } else {
        None
    };

    let carried_debt = match plan.carry_over() {
        Some(remainder) => {
            let description = format!("Carried over from {month}");
            match ledger.open(person, &description, remainder).await {
                Ok(debt) => Some(debt),
                Err(err) => {
                    if payment.is_some() {
                        compensate(tracker, person, month).await;
                    }
                    return Err(err.into());
                }
            }
        }
        None => None,
    };

    let outcome = plan.outcome();
    info!(
        person = %person,
        month = %month,
        paid_now = %plan.paying_now,
        remainder = %plan.remainder,
        outcome = ?outcome,
        "Month closed"
    );

    Ok(ClosingReport {
        person: person.to_string(),
        month,
        plan,
        outcome,
        payment,
        carried_debt,
    })
}

async fn compensate(tracker: &mut PartialPaymentTracker, person: &str, month: YearMonth) {
    match tracker.undo_last(person, month).await {
        Ok(_) => warn!(person = %person, month = %month, "Closing payment undone after debt failure"),
        Err(err) => error!(
            person = %person,
            month = %month,
            error = %err,
            "Closing payment could not be undone; month left partially closed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FixedClock};
    use crate::store::MemoryCollection;
    use crate::store::testing::FlakyCollection;
    use chrono::NaiveDate;
    use parcela_shared::ErrorKind;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 7, 31).unwrap()))
    }

    fn july() -> YearMonth {
        YearMonth::new(2024, 7).unwrap()
    }

    fn request(month_total: Decimal, paying_now: Decimal) -> ClosingRequest {
        ClosingRequest {
            person: "Ana".to_string(),
            month: july(),
            month_total,
            paying_now,
        }
    }

    async fn services() -> (PartialPaymentTracker, DebtLedger) {
        let tracker =
            PartialPaymentTracker::load(Arc::new(MemoryCollection::<PartialPayment>::new()), clock())
                .await
                .unwrap();
        let ledger = DebtLedger::load(Arc::new(MemoryCollection::<DebtBalance>::new()), clock())
            .await
            .unwrap();
        (tracker, ledger)
    }

    #[tokio::test]
    async fn test_six_hundred_closing() {
        let (mut tracker, mut ledger) = services().await;
        tracker
            .add("Ana", july(), dec!(200.00), dec!(600.00))
            .await
            .unwrap();

        let report = close_month(&mut tracker, &mut ledger, &request(dec!(600.00), dec!(300.00)))
            .await
            .unwrap();

        assert_eq!(report.outcome, ClosingOutcome::PartiallySettled);
        assert_eq!(report.plan.already_paid, dec!(200.00));
        assert_eq!(report.plan.remainder, dec!(100.00));
        assert_eq!(tracker.paid_to_date("Ana", july()), dec!(500.00));

        let debt = report.carried_debt.unwrap();
        assert_eq!(debt.original, dec!(100.00));
        assert_eq!(debt.description, "Carried over from 2024-07");
        assert_eq!(ledger.outstanding_for("Ana"), dec!(100.00));
    }

    #[tokio::test]
    async fn test_paying_the_rest_opens_no_debt() {
        let (mut tracker, mut ledger) = services().await;
        tracker.add("Ana", july(), dec!(200), dec!(600)).await.unwrap();

        let report = close_month(&mut tracker, &mut ledger, &request(dec!(600), dec!(400)))
            .await
            .unwrap();

        assert_eq!(report.outcome, ClosingOutcome::FullySettled);
        assert_eq!(report.plan.remainder, Decimal::ZERO);
        assert!(report.carried_debt.is_none());
        assert!(ledger.list().is_empty());
    }

    #[tokio::test]
    async fn test_paying_nothing_records_no_payment() {
        let (mut tracker, mut ledger) = services().await;
        let report = close_month(&mut tracker, &mut ledger, &request(dec!(90), dec!(0)))
            .await
            .unwrap();

        assert!(report.payment.is_none());
        assert!(tracker.entries("Ana", july()).is_empty());
        assert_eq!(ledger.outstanding_for("Ana"), dec!(90));
    }

    #[tokio::test]
    async fn test_overpayment_is_rejected_without_effects() {
        let (mut tracker, mut ledger) = services().await;
        let err = close_month(&mut tracker, &mut ledger, &request(dec!(100), dec!(150)))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(tracker.entries("Ana", july()).is_empty());
        assert!(ledger.list().is_empty());
    }

    #[tokio::test]
    async fn test_debt_failure_undoes_payment() {
        let debts = FlakyCollection::<DebtBalance>::new();
        let mut tracker =
            PartialPaymentTracker::load(Arc::new(MemoryCollection::<PartialPayment>::new()), clock())
                .await
                .unwrap();
        let mut ledger = DebtLedger::load(debts.clone(), clock()).await.unwrap();

        debts.fail_writes(true);
        let err = close_month(&mut tracker, &mut ledger, &request(dec!(600), dec!(300)))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(tracker.paid_to_date("Ana", july()), Decimal::ZERO);
        assert!(ledger.list().is_empty());

        debts.fail_writes(false);
        let report = close_month(&mut tracker, &mut ledger, &request(dec!(600), dec!(300)))
            .await
            .unwrap();
        assert_eq!(report.plan.remainder, dec!(300));
    }
}
