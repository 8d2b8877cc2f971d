//! Property-based tests for currency rounding and text handling.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::rounding::{round2, share};
use super::text::{DisplayFormat, format_currency, parse};

/// Strategy to generate positive amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate installment counts (1 to 48).
fn installment_count() -> impl Strategy<Value = u32> {
    1u32..=48
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Summing N rounded installments drifts from the total by at most N half-cents.
    #[test]
    fn prop_installment_drift_is_bounded(
        total in positive_amount(),
        count in installment_count(),
    ) {
        let per_installment = share(total, count);
        let sum = per_installment * Decimal::from(count);
        let bound = Decimal::new(5, 3) * Decimal::from(count);
        prop_assert!(
            (sum - total).abs() <= bound,
            "drift {} exceeds {} for total={} count={}",
            sum - total, bound, total, count
        );
    }

    /// round2 output always has at most 2 decimal places and is idempotent.
    #[test]
    fn prop_round2_is_idempotent(cents in -10_000_000i64..10_000_000i64, extra in 0i64..1000) {
        let amount = Decimal::new(cents * 1000 + extra, 5);
        let once = round2(amount);
        prop_assert_eq!(round2(once), once);
        prop_assert!(once.scale() <= 2);
        prop_assert!((once - amount).abs() <= Decimal::new(5, 3));
    }

    /// What we display, we can read back.
    #[test]
    fn prop_display_parses_back(amount in positive_amount()) {
        let text = format_currency(amount, &DisplayFormat::default());
        prop_assert_eq!(parse(&text), amount);
    }
}
