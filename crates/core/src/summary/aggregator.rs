//! Folds a month's installments into per-person totals.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::currency::round2;
use crate::schedule::InstallmentOccurrence;

/// What one person owes in a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonSummary {
    /// The person.
    pub person: String,
    /// Unrounded sum of the person's installments.
    pub total: Decimal,
    /// Number of installments due.
    pub count: usize,
}

impl PersonSummary {
    /// Total rounded for display and comparison.
    #[must_use]
    pub fn rounded_total(&self) -> Decimal {
        round2(self.total)
    }
}

/// Groups occurrences by person, largest total first.
///
/// People with equal totals keep the order in which they first appear.
/// Amounts are accumulated unrounded.
#[must_use]
pub fn summarize(occurrences: &[InstallmentOccurrence<'_>]) -> Vec<PersonSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut summaries: Vec<PersonSummary> = Vec::new();

    for occurrence in occurrences {
        let person = occurrence.person();
        let slot = *index.entry(person).or_insert_with(|| {
            summaries.push(PersonSummary {
                person: person.to_string(),
                total: Decimal::ZERO,
                count: 0,
            });
            summaries.len() - 1
        });
        summaries[slot].total += occurrence.amount;
        summaries[slot].count += 1;
    }

    summaries.sort_by(|a, b| b.total.cmp(&a.total));
    summaries
}

/// Sum of every occurrence, rounded.
#[must_use]
pub fn month_total(occurrences: &[InstallmentOccurrence<'_>]) -> Decimal {
    round2(occurrences.iter().map(|o| o.amount).sum())
}

/// One person's entry, if they owe anything in the month.
#[must_use]
pub fn summary_for(occurrences: &[InstallmentOccurrence<'_>], person: &str) -> Option<PersonSummary> {
    summarize(occurrences)
        .into_iter()
        .find(|s| s.person == person)
}
