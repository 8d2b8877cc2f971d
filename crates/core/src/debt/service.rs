//! Debt ledger service.
//!
//! Owns the debt snapshot. Every mutation validates, computes the new state,
//! writes it through the collection and only then applies it locally.

use std::sync::Arc;

use parcela_shared::types::{DebtId, PaymentId};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::error::DebtError;
use super::types::{AppliedPayment, DebtBalance, DebtPatch, PaymentRecord};
use crate::clock::Clock;
use crate::currency::round2;
use crate::store::Collection;

/// Interest-free debts and their payment histories.
pub struct DebtLedger {
    collection: Arc<dyn Collection<DebtBalance>>,
    clock: Arc<dyn Clock>,
    debts: Vec<DebtBalance>,
}

impl DebtLedger {
    /// Loads every debt from `collection`.
    pub async fn load(
        collection: Arc<dyn Collection<DebtBalance>>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DebtError> {
        let debts = collection.get_all().await?;
        Ok(Self {
            collection,
            clock,
            debts,
        })
    }

    /// Re-fetches the snapshot.
    pub async fn refresh(&mut self) -> Result<(), DebtError> {
        self.debts = self.collection.get_all().await?;
        debug!(count = self.debts.len(), "Debts refreshed");
        Ok(())
    }

    /// All debts in creation order.
    #[must_use]
    pub fn list(&self) -> &[DebtBalance] {
        &self.debts
    }

    /// Looks up one debt.
    #[must_use]
    pub fn get(&self, id: DebtId) -> Option<&DebtBalance> {
        self.debts.iter().find(|d| d.id == id)
    }

    /// Total still owed by `person` across all debts.
    #[must_use]
    pub fn outstanding_for(&self, person: &str) -> Decimal {
        round2(
            self.debts
                .iter()
                .filter(|d| d.person == person)
                .map(|d| d.current)
                .sum(),
        )
    }

    /// Opens a new balance with `original = current = amount`.
    pub async fn open(
        &mut self,
        person: &str,
        description: &str,
        amount: Decimal,
    ) -> Result<DebtBalance, DebtError> {
        let person = person.trim();
        let description = description.trim();
        if person.is_empty() {
            return Err(DebtError::MissingPerson);
        }
        if description.is_empty() {
            return Err(DebtError::MissingDescription);
        }
        let amount = round2(amount);
        if amount <= Decimal::ZERO {
            return Err(DebtError::NonPositiveAmount);
        }

        let debt = DebtBalance {
            id: DebtId::new(),
            person: person.to_string(),
            description: description.to_string(),
            original: amount,
            current: amount,
            created_on: self.clock.today(),
            payments: Vec::new(),
        };
        let debt = self.collection.create(debt).await?;

        info!(debt_id = %debt.id, person = %debt.person, amount = %amount, "Debt opened");
        self.debts.push(debt.clone());
        Ok(debt)
    }

    /// Pays against a debt, clamping to what is still owed.
    ///
    /// The returned [`AppliedPayment`] carries both the requested and the
    /// applied amount so callers can tell the user about a clamp.
    pub async fn apply_payment(
        &mut self,
        debt_id: DebtId,
        amount: Decimal,
        note: Option<String>,
    ) -> Result<AppliedPayment, DebtError> {
        let requested = round2(amount);
        if requested <= Decimal::ZERO {
            return Err(DebtError::NonPositiveAmount);
        }
        let slot = self.slot(debt_id)?;
        let debt = &self.debts[slot];

        let current = round2(debt.current);
        if current <= Decimal::ZERO {
            return Err(DebtError::AlreadySettled(debt_id));
        }

        let applied = requested.min(current);
        let remaining = round2(current - applied);
        let payment = PaymentRecord {
            id: PaymentId::new(),
            amount: applied,
            date: self.clock.today(),
            note: note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        };

        let mut payments = debt.payments.clone();
        payments.push(payment.clone());
        let patch = DebtPatch {
            current: Some(remaining),
            payments: Some(payments.clone()),
        };
        self.collection.update(debt_id, &patch).await?;

        let debt = &mut self.debts[slot];
        debt.current = remaining;
        debt.payments = payments;

        info!(
            debt_id = %debt_id,
            requested = %requested,
            applied = %applied,
            remaining = %remaining,
            "Debt payment applied"
        );
        Ok(AppliedPayment {
            debt_id,
            payment,
            requested,
            remaining,
        })
    }

    /// Reverses one payment, restoring its amount to the balance.
    ///
    /// No upper bound is enforced: a balance pushed above its original is
    /// logged as an integrity warning and kept.
    pub async fn undo_payment(
        &mut self,
        debt_id: DebtId,
        payment_id: PaymentId,
    ) -> Result<PaymentRecord, DebtError> {
        let slot = self.slot(debt_id)?;
        let debt = &self.debts[slot];
        let payment = debt
            .payment(payment_id)
            .cloned()
            .ok_or(DebtError::PaymentNotFound {
                debt_id,
                payment_id,
            })?;

        let restored = round2(debt.current + payment.amount);
        let payments: Vec<PaymentRecord> = debt
            .payments
            .iter()
            .filter(|p| p.id != payment_id)
            .cloned()
            .collect();
        if restored > debt.original {
            warn!(
                debt_id = %debt_id,
                original = %debt.original,
                restored = %restored,
                "Debt balance exceeds its original amount after undo"
            );
        }

        let patch = DebtPatch {
            current: Some(restored),
            payments: Some(payments.clone()),
        };
        self.collection.update(debt_id, &patch).await?;

        let debt = &mut self.debts[slot];
        debt.current = restored;
        debt.payments = payments;

        info!(debt_id = %debt_id, payment_id = %payment_id, amount = %payment.amount, "Debt payment undone");
        Ok(payment)
    }

    /// Deletes a debt regardless of its balance.
    pub async fn remove(&mut self, debt_id: DebtId) -> Result<DebtBalance, DebtError> {
        let slot = self.slot(debt_id)?;
        self.collection.delete(debt_id).await?;

        let debt = self.debts.remove(slot);
        info!(debt_id = %debt_id, current = %debt.current, "Debt removed");
        Ok(debt)
    }

    fn slot(&self, id: DebtId) -> Result<usize, DebtError> {
        self.debts
            .iter()
            .position(|d| d.id == id)
            .ok_or(DebtError::DebtNotFound(id))
    }
}
