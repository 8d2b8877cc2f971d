//! Purchase book: the in-memory snapshot of shared purchases.

use std::sync::Arc;

use parcela_shared::types::{PurchaseId, YearMonth};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::error::PurchaseError;
use super::scheduler::active_occurrences;
use super::types::{InstallmentOccurrence, NewPurchase, Purchase};
use crate::currency::round2;
use crate::store::Collection;
use crate::summary::{PersonSummary, summarize, summary_for};

/// Shared purchases for one session.
pub struct PurchaseBook {
    collection: Arc<dyn Collection<Purchase>>,
    purchases: Vec<Purchase>,
}

impl PurchaseBook {
    /// Loads every purchase from `collection`.
    pub async fn load(collection: Arc<dyn Collection<Purchase>>) -> Result<Self, PurchaseError> {
        let purchases = collection.get_all().await?;
        Ok(Self {
            collection,
            purchases,
        })
    }

    /// Re-fetches the snapshot; call on any change notice.
    pub async fn refresh(&mut self) -> Result<(), PurchaseError> {
        self.purchases = self.collection.get_all().await?;
        debug!(count = self.purchases.len(), "Purchases refreshed");
        Ok(())
    }

    /// All purchases in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Purchase] {
        &self.purchases
    }

    /// Looks up one purchase.
    #[must_use]
    pub fn get(&self, id: PurchaseId) -> Option<&Purchase> {
        self.purchases.iter().find(|p| p.id == id)
    }

    /// Installments due in `month`.
    #[must_use]
    pub fn occurrences(&self, month: YearMonth) -> Vec<InstallmentOccurrence<'_>> {
        active_occurrences(&self.purchases, month)
    }

    /// Per-person totals for `month`.
    #[must_use]
    pub fn summary(&self, month: YearMonth) -> Vec<PersonSummary> {
        summarize(&self.occurrences(month))
    }

    /// What `person` owes in `month` (rounded; zero if nothing is due).
    #[must_use]
    pub fn month_total_for(&self, person: &str, month: YearMonth) -> Decimal {
        summary_for(&self.occurrences(month), person)
            .as_ref()
            .map_or(Decimal::ZERO, PersonSummary::rounded_total)
    }

    /// Records a new purchase.
    pub async fn create(&mut self, input: NewPurchase) -> Result<Purchase, PurchaseError> {
        validate(&input)?;
        let purchase = self
            .collection
            .create(input.into_purchase(PurchaseId::new()))
            .await?;

        info!(
            purchase_id = %purchase.id,
            person = %purchase.person,
            total = %purchase.total,
            installments = purchase.installments,
            "Purchase created"
        );
        self.purchases.push(purchase.clone());
        Ok(purchase)
    }

    /// Overwrites a purchase with new field values.
    pub async fn replace(
        &mut self,
        id: PurchaseId,
        input: NewPurchase,
    ) -> Result<Purchase, PurchaseError> {
        validate(&input)?;
        let slot = self
            .purchases
            .iter()
            .position(|p| p.id == id)
            .ok_or(PurchaseError::NotFound(id))?;

        let replacement = input.into_purchase(id);
        self.collection.update(id, &replacement).await?;

        info!(purchase_id = %id, "Purchase replaced");
        self.purchases[slot] = replacement.clone();
        Ok(replacement)
    }

    /// Deletes a purchase.
    pub async fn delete(&mut self, id: PurchaseId) -> Result<Purchase, PurchaseError> {
        let slot = self
            .purchases
            .iter()
            .position(|p| p.id == id)
            .ok_or(PurchaseError::NotFound(id))?;

        self.collection.delete(id).await?;

        info!(purchase_id = %id, "Purchase deleted");
        Ok(self.purchases.remove(slot))
    }
}

fn validate(input: &NewPurchase) -> Result<(), PurchaseError> {
    if input.description.trim().is_empty() {
        return Err(PurchaseError::MissingDescription);
    }
    if input.person.trim().is_empty() {
        return Err(PurchaseError::MissingPerson);
    }
    if round2(input.total) <= Decimal::ZERO {
        return Err(PurchaseError::NonPositiveTotal);
    }
    if input.installments == 0 {
        return Err(PurchaseError::NoInstallments);
    }
    Ok(())
}
