//! Two-decimal rounding rules.
//!
//! Every derived per-installment or per-share amount goes through [`round2`]
//! before it is stored or compared, and every "remaining" value is re-rounded.

use rust_decimal::{Decimal, RoundingStrategy};

/// Slack allowed when checking "payment exceeds remaining".
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds to 2 decimal places, half away from zero.
#[must_use]
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// One of `count` equal parts of `total`, rounded with [`round2`].
///
/// A `count` of zero is treated as one part.
#[must_use]
pub fn share(total: Decimal, count: u32) -> Decimal {
    round2(total / Decimal::from(count.max(1)))
}

/// True when `amount` is larger than `limit` by more than [`TOLERANCE`].
#[must_use]
pub fn exceeds(amount: Decimal, limit: Decimal) -> bool {
    amount > round2(limit) + TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tolerance_is_one_cent() {
        assert_eq!(TOLERANCE, dec!(0.01));
    }

    #[rstest]
    #[case(dec!(1.005), dec!(1.01))]
    #[case(dec!(1.004), dec!(1.00))]
    #[case(dec!(-1.005), dec!(-1.01))]
    #[case(dec!(2.675), dec!(2.68))]
    #[case(dec!(333.3333333), dec!(333.33))]
    #[case(dec!(10), dec!(10))]
    fn test_round2_half_away_from_zero(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round2(input), expected);
    }

    #[rstest]
    #[case(dec!(1000), 3, dec!(333.33))]
    #[case(dec!(100), 3, dec!(33.33))]
    #[case(dec!(200), 3, dec!(66.67))]
    #[case(dec!(99.99), 1, dec!(99.99))]
    #[case(dec!(50), 0, dec!(50))]
    fn test_share(#[case] total: Decimal, #[case] count: u32, #[case] expected: Decimal) {
        assert_eq!(share(total, count), expected);
    }

    #[test]
    fn test_exceeds_allows_one_cent_slack() {
        assert!(!exceeds(dec!(100.00), dec!(100.00)));
        assert!(!exceeds(dec!(100.01), dec!(100.00)));
        assert!(exceeds(dec!(100.02), dec!(100.00)));
    }
}
