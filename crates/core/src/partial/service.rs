//! Partial payment tracker service.

use std::sync::Arc;

use parcela_shared::types::{PartialPaymentId, YearMonth};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::error::PartialPaymentError;
use super::types::PartialPayment;
use crate::clock::Clock;
use crate::currency::{exceeds, round2};
use crate::store::Collection;

/// Per (person, month) stacks of partial payments.
pub struct PartialPaymentTracker {
    collection: Arc<dyn Collection<PartialPayment>>,
    clock: Arc<dyn Clock>,
    entries: Vec<PartialPayment>,
}

impl PartialPaymentTracker {
    /// Loads every entry from `collection`.
    pub async fn load(
        collection: Arc<dyn Collection<PartialPayment>>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PartialPaymentError> {
        let entries = collection.get_all().await?;
        Ok(Self {
            collection,
            clock,
            entries,
        })
    }

    /// Re-fetches the snapshot.
    pub async fn refresh(&mut self) -> Result<(), PartialPaymentError> {
        self.entries = self.collection.get_all().await?;
        debug!(count = self.entries.len(), "Partial payments refreshed");
        Ok(())
    }

    /// Entries for one key, oldest first.
    #[must_use]
    pub fn entries(&self, person: &str, month: YearMonth) -> Vec<&PartialPayment> {
        let mut entries: Vec<&PartialPayment> = self
            .entries
            .iter()
            .filter(|e| e.is_for(person, month))
            .collect();
        entries.sort_by_key(|e| e.id);
        entries
    }

    /// Sum paid toward `(person, month)`, zero when nothing was paid.
    #[must_use]
    pub fn paid_to_date(&self, person: &str, month: YearMonth) -> Decimal {
        round2(
            self.entries
                .iter()
                .filter(|e| e.is_for(person, month))
                .map(|e| e.amount)
                .sum(),
        )
    }

    /// What is left of `month_total`. Negative when the month's purchases
    /// shrank after payments were recorded.
    #[must_use]
    pub fn remaining(&self, person: &str, month: YearMonth, month_total: Decimal) -> Decimal {
        round2(month_total - self.paid_to_date(person, month))
    }

    /// Records a payment toward `(person, month)`.
    ///
    /// Rejected when it would pay more than `month_total` minus what was
    /// already paid, allowing one cent of rounding slack.
    pub async fn add(
        &mut self,
        person: &str,
        month: YearMonth,
        amount: Decimal,
        month_total: Decimal,
    ) -> Result<PartialPayment, PartialPaymentError> {
        let person = person.trim();
        if person.is_empty() {
            return Err(PartialPaymentError::MissingPerson);
        }
        let amount = round2(amount);
        if amount <= Decimal::ZERO {
            return Err(PartialPaymentError::NonPositiveAmount);
        }
        let remaining = self.remaining(person, month, month_total);
        if exceeds(amount, remaining) {
            return Err(PartialPaymentError::ExceedsRemaining { amount, remaining });
        }

        let entry = PartialPayment {
            id: PartialPaymentId::new(),
            person: person.to_string(),
            month,
            amount,
            paid_on: self.clock.today(),
        };
        let entry = self.collection.create(entry).await?;

        info!(
            person = %entry.person,
            month = %month,
            amount = %amount,
            "Partial payment added"
        );
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Removes the most recent entry for `(person, month)`.
    ///
    /// Returns `None` without touching storage when there is nothing to undo.
    pub async fn undo_last(
        &mut self,
        person: &str,
        month: YearMonth,
    ) -> Result<Option<PartialPayment>, PartialPaymentError> {
        let Some(slot) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_for(person, month))
            .max_by_key(|(_, e)| e.id)
            .map(|(slot, _)| slot)
        else {
            return Ok(None);
        };

        self.collection.delete(self.entries[slot].id).await?;

        let entry = self.entries.remove(slot);
        info!(person = %entry.person, month = %month, amount = %entry.amount, "Partial payment undone");
        Ok(Some(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::MemoryCollection;
    use crate::store::testing::FlakyCollection;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 2, 20).unwrap()))
    }

    fn feb() -> YearMonth {
        YearMonth::new(2024, 2).unwrap()
    }

    async fn tracker() -> PartialPaymentTracker {
        PartialPaymentTracker::load(Arc::new(MemoryCollection::<PartialPayment>::new()), clock())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_add_undo() {
        let mut tracker = tracker().await;
        tracker.add("Ana", feb(), dec!(100), dec!(500)).await.unwrap();
        tracker.add("Ana", feb(), dec!(50.25), dec!(500)).await.unwrap();
        assert_eq!(tracker.paid_to_date("Ana", feb()), dec!(150.25));
        assert_eq!(tracker.remaining("Ana", feb(), dec!(500)), dec!(349.75));

        let undone = tracker.undo_last("Ana", feb()).await.unwrap().unwrap();
        assert_eq!(undone.amount, dec!(50.25));
        assert_eq!(tracker.paid_to_date("Ana", feb()), dec!(100));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let mut tracker = tracker().await;
        let march = YearMonth::new(2024, 3).unwrap();
        tracker.add("Ana", feb(), dec!(10), dec!(100)).await.unwrap();
        tracker.add("Bruno", feb(), dec!(20), dec!(100)).await.unwrap();
        tracker.add("Ana", march, dec!(30), dec!(100)).await.unwrap();

        assert_eq!(tracker.paid_to_date("Ana", feb()), dec!(10));
        assert_eq!(tracker.entries("Ana", march).len(), 1);
        assert_eq!(tracker.paid_to_date("Carla", feb()), Decimal::ZERO);

        tracker.undo_last("Bruno", feb()).await.unwrap();
        assert_eq!(tracker.paid_to_date("Ana", feb()), dec!(10));
    }

    #[tokio::test]
    async fn test_undo_on_empty_key_is_noop() {
        let mut tracker = tracker().await;
        assert!(tracker.undo_last("Ana", feb()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overpayment_uses_cent_tolerance() {
        let mut tracker = tracker().await;
        tracker.add("Ana", feb(), dec!(60), dec!(100)).await.unwrap();

        tracker.add("Ana", feb(), dec!(40.01), dec!(100)).await.unwrap();
        let err = tracker
            .add("Ana", feb(), dec!(0.02), dec!(100))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "EXCEEDS_REMAINING");
    }

    #[tokio::test]
    async fn test_add_rejects_non_positive() {
        let mut tracker = tracker().await;
        assert!(matches!(
            tracker.add("Ana", feb(), dec!(-5), dec!(100)).await,
            Err(PartialPaymentError::NonPositiveAmount)
        ));
        assert!(matches!(
            tracker.add("", feb(), dec!(5), dec!(100)).await,
            Err(PartialPaymentError::MissingPerson)
        ));
    }

    #[tokio::test]
    async fn test_stack_order_survives_refresh() {
        let collection = Arc::new(MemoryCollection::<PartialPayment>::new());
        let mut tracker = PartialPaymentTracker::load(collection.clone(), clock())
            .await
            .unwrap();
        for amount in [dec!(1), dec!(2), dec!(3)] {
            tracker.add("Ana", feb(), amount, dec!(100)).await.unwrap();
        }

        let mut reloaded = PartialPaymentTracker::load(collection, clock()).await.unwrap();
        let undone = reloaded.undo_last("Ana", feb()).await.unwrap().unwrap();
        assert_eq!(undone.amount, dec!(3));
    }

    #[tokio::test]
    async fn test_failed_undo_keeps_entry() {
        let collection = FlakyCollection::<PartialPayment>::new();
        let mut tracker = PartialPaymentTracker::load(collection.clone(), clock())
            .await
            .unwrap();
        tracker.add("Ana", feb(), dec!(5), dec!(100)).await.unwrap();

        collection.fail_writes(true);
        assert!(tracker.undo_last("Ana", feb()).await.is_err());
        assert_eq!(tracker.paid_to_date("Ana", feb()), dec!(5));
    }
}
