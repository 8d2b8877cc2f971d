//! Text <-> amount conversions.
//!
//! Amounts are typed the Brazilian way: `.` groups thousands and `,` marks
//! decimals (`1.234,56`). Parsing never fails; garbage reads as zero.

use std::str::FromStr;

use num_format::{CustomFormat, Grouping, ToFormattedString};
use parcela_shared::config::DisplayConfig;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::rounding::round2;

/// Separators and prefix used to render amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFormat {
    /// Written before the number, e.g. `R$ `.
    pub currency_prefix: String,
    /// Thousands separator.
    pub group_separator: String,
    /// Decimal separator.
    pub decimal_separator: String,
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for DisplayFormat {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            currency_prefix: config.currency_prefix.clone(),
            group_separator: config.group_separator.clone(),
            decimal_separator: config.decimal_separator.clone(),
        }
    }
}

impl DisplayFormat {
    fn group(&self, integer: u128) -> String {
        match CustomFormat::builder()
            .grouping(Grouping::Standard)
            .separator(&self.group_separator)
            .build()
        {
            Ok(format) => integer.to_formatted_string(&format),
            // Separator longer than num-format accepts: render ungrouped.
            Err(_) => integer.to_string(),
        }
    }
}

/// Reads a typed amount.
///
/// Everything except digits and commas is dropped (so `R$ 1.234,56` reads as
/// `1234.56`); the first comma is the decimal separator and anything after a
/// second comma is ignored. Empty or unreadable input is zero.
#[must_use]
pub fn parse(text: &str) -> Decimal {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();

    let mut parts = cleaned.split(',');
    let integer = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();

    let integer = if integer.is_empty() { "0" } else { integer };
    let normalized = if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{fraction}")
    };

    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

/// Formats raw keypad digits as a masked amount: the digits are cents, so
/// `123456` renders as `1.234,56`.
///
/// Non-digits are ignored. Empty input stays empty (distinct from `0,00`).
#[must_use]
pub fn format_input(raw_digits: &str, format: &DisplayFormat) -> String {
    let digits: String = raw_digits.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return String::new();
    }

    match Decimal::from_str(&digits) {
        Ok(cents) => format_amount(cents / Decimal::ONE_HUNDRED, format),
        Err(_) => String::new(),
    }
}

/// Renders an amount with grouping and exactly two decimals, no prefix.
#[must_use]
pub fn format_amount(amount: Decimal, format: &DisplayFormat) -> String {
    let rounded = round2(amount);
    let magnitude = rounded.abs();
    let integer = magnitude.trunc().to_u128().unwrap_or_default();
    let cents = ((magnitude - magnitude.trunc()) * Decimal::ONE_HUNDRED)
        .to_u32()
        .unwrap_or_default();

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!(
        "{sign}{}{}{cents:02}",
        format.group(integer),
        format.decimal_separator
    )
}

/// Renders an amount for people: `R$ 1.234,56`, `-R$ 10,00`.
#[must_use]
pub fn format_currency(amount: Decimal, format: &DisplayFormat) -> String {
    let body = format_amount(amount.abs(), format);
    if round2(amount) < Decimal::ZERO {
        format!("-{}{body}", format.currency_prefix)
    } else {
        format!("{}{body}", format.currency_prefix)
    }
}
