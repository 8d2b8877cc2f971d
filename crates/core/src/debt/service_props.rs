//! Property-based tests for the debt ledger.

use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::DebtLedger;
use super::types::DebtBalance;
use crate::clock::FixedClock;
use crate::store::MemoryCollection;

fn cents(range: std::ops::Range<i64>) -> impl Strategy<Value = Decimal> {
    range.prop_map(|c| Decimal::new(c, 2))
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

async fn ledger() -> DebtLedger {
    let clock = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()));
    DebtLedger::load(Arc::new(MemoryCollection::<DebtBalance>::new()), clock)
        .await
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Paying then undoing that payment restores the balance and the history.
    #[test]
    fn prop_apply_then_undo_restores(
        original in cents(1..1_000_000),
        earlier in proptest::collection::vec(cents(1..50_000), 0..4),
        payment in cents(1..2_000_000),
    ) {
        runtime().block_on(async {
            let mut ledger = ledger().await;
            let debt = ledger.open("Ana", "Loan", original).await.unwrap();
            for amount in earlier {
                if ledger.get(debt.id).unwrap().is_settled() {
                    break;
                }
                ledger.apply_payment(debt.id, amount, None).await.unwrap();
            }
            let before = ledger.get(debt.id).unwrap().clone();
            prop_assume!(!before.is_settled());

            let applied = ledger.apply_payment(debt.id, payment, None).await.unwrap();
            ledger.undo_payment(debt.id, applied.payment.id).await.unwrap();

            prop_assert_eq!(ledger.get(debt.id).unwrap(), &before);
            Ok(())
        })?;
    }

    /// The balance never leaves [0, original] and paid plus current is the original.
    #[test]
    fn prop_balance_stays_within_bounds(
        original in cents(1..1_000_000),
        payments in proptest::collection::vec(cents(1..400_000), 1..8),
    ) {
        runtime().block_on(async {
            let mut ledger = ledger().await;
            let debt = ledger.open("Ana", "Loan", original).await.unwrap();
            for amount in payments {
                if ledger.get(debt.id).unwrap().is_settled() {
                    break;
                }
                let applied = ledger.apply_payment(debt.id, amount, None).await.unwrap();
                prop_assert!(applied.applied() <= applied.requested);
            }

            let stored = ledger.get(debt.id).unwrap();
            prop_assert!(stored.current >= Decimal::ZERO);
            prop_assert!(stored.current <= stored.original);
            prop_assert_eq!(stored.total_paid() + stored.current, stored.original);
            Ok(())
        })?;
    }
}
