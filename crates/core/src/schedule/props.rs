//! Property-based tests for the amortization scheduler.

use chrono::NaiveDate;
use parcela_shared::types::{PurchaseId, YearMonth};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::scheduler::{is_active_in_month, ordinal_in_month, remaining_installments};
use super::types::Purchase;
use crate::instrument::PaymentKind;

fn arb_purchase() -> impl Strategy<Value = Purchase> {
    (2000i32..2100, 1u32..=12, 1u32..=28, 1u32..=60, 1i64..10_000_000).prop_map(
        |(year, month, day, installments, cents)| Purchase {
            id: PurchaseId::new(),
            description: "Item".to_string(),
            person: "Ana".to_string(),
            total: Decimal::new(cents, 2),
            installments,
            start_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
            kind: PaymentKind::Credit,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Active for exactly N consecutive months, inactive just before and after.
    #[test]
    fn prop_active_window_is_exactly_n_months(purchase in arb_purchase()) {
        let start = YearMonth::of(purchase.start_date);
        let n = i32::try_from(purchase.installments).unwrap();

        prop_assert!(!is_active_in_month(&purchase, start.plus_months(-1)));
        prop_assert!(!is_active_in_month(&purchase, start.plus_months(n)));
        for step in 0..n {
            prop_assert!(is_active_in_month(&purchase, start.plus_months(step)));
        }
    }

    /// Ordinal k falls k-1 months after the start, and remaining counts down to 1.
    #[test]
    fn prop_ordinals_follow_the_calendar(purchase in arb_purchase()) {
        let start = YearMonth::of(purchase.start_date);
        for k in 1..=purchase.installments {
            let month = start.plus_months(i32::try_from(k - 1).unwrap());
            prop_assert_eq!(ordinal_in_month(&purchase, month), k);
            prop_assert_eq!(
                remaining_installments(&purchase, month),
                purchase.installments - k + 1
            );
        }
    }
}
