//! Calendar month type (`YYYY-MM`).
//!
//! Installment schedules, partial payments and observations are keyed by
//! calendar month; the day of month never participates in comparisons.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a `YYYY-MM` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid month '{0}', expected YYYY-MM")]
pub struct MonthParseError(pub String);

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a month, returning `None` when `month` is outside `1..=12`.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if month >= 1 && month <= 12 {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month a date falls in.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month number, `1..=12`.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The month `delta` months away (negative goes back).
    #[must_use]
    pub fn plus_months(self, delta: i32) -> Self {
        let index = self.index() + i64::from(delta);
        let year = i32::try_from(index.div_euclid(12)).unwrap_or(self.year);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let month = index.rem_euclid(12) as u32 + 1;
        Self { year, month }
    }

    /// Whole months from `self` to `other` (negative when `other` is earlier).
    #[must_use]
    pub fn months_until(self, other: Self) -> i64 {
        other.index() - self.index()
    }

    fn index(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

/// Moves a date by whole calendar months, clamping the day to the end of
/// shorter months (Jan 31 + 1 month = Feb 28/29).
///
/// Returns `None` only when the result leaves chrono's supported range.
#[must_use]
pub fn shift_months(date: NaiveDate, delta: i32) -> Option<NaiveDate> {
    let months = Months::new(delta.unsigned_abs());
    if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MonthParseError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = MonthParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_month() {
        assert!(YearMonth::new(2024, 0).is_none());
        assert!(YearMonth::new(2024, 13).is_none());
        assert!(YearMonth::new(2024, 12).is_some());
    }

    #[rstest]
    #[case("2024-01", 2024, 1)]
    #[case("1999-12", 1999, 12)]
    #[case(" 2030-07 ", 2030, 7)]
    fn test_parse_valid(#[case] input: &str, #[case] year: i32, #[case] month: u32) {
        assert_eq!(input.parse::<YearMonth>().unwrap(), ym(year, month));
    }

    #[rstest]
    #[case("2024-13")]
    #[case("2024-1")]
    #[case("24-01")]
    #[case("2024/01")]
    #[case("")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(input.parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(ym(2024, 3).to_string(), "2024-03");
    }

    #[rstest]
    #[case(ym(2024, 1), 1, ym(2024, 2))]
    #[case(ym(2024, 12), 1, ym(2025, 1))]
    #[case(ym(2024, 1), -1, ym(2023, 12))]
    #[case(ym(2024, 5), 24, ym(2026, 5))]
    #[case(ym(2024, 5), 0, ym(2024, 5))]
    fn test_plus_months(#[case] start: YearMonth, #[case] delta: i32, #[case] expected: YearMonth) {
        assert_eq!(start.plus_months(delta), expected);
    }

    #[test]
    fn test_months_until() {
        assert_eq!(ym(2024, 1).months_until(ym(2024, 4)), 3);
        assert_eq!(ym(2024, 4).months_until(ym(2024, 1)), -3);
        assert_eq!(ym(2023, 11).months_until(ym(2024, 2)), 3);
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(ym(2023, 12) < ym(2024, 1));
        assert!(ym(2024, 2) > ym(2024, 1));
    }

    #[test]
    fn test_of_ignores_day() {
        assert_eq!(YearMonth::of(date(2024, 2, 29)), ym(2024, 2));
        assert_eq!(ym(2024, 2).first_day(), date(2024, 2, 1));
    }

    #[test]
    fn test_shift_months_clamps_day() {
        assert_eq!(shift_months(date(2024, 1, 31), 1), Some(date(2024, 2, 29)));
        assert_eq!(shift_months(date(2024, 3, 31), -1), Some(date(2024, 2, 29)));
        assert_eq!(shift_months(date(2024, 1, 15), 12), Some(date(2025, 1, 15)));
    }

    #[test]
    fn test_serde_uses_text_form() {
        let json = serde_json::to_string(&ym(2024, 2)).unwrap();
        assert_eq!(json, "\"2024-02\"");
        let back: YearMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ym(2024, 2));
        assert!(serde_json::from_str::<YearMonth>("\"2024-00\"").is_err());
    }
}
