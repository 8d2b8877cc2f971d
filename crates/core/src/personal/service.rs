//! Personal expense service.

use std::sync::Arc;

use parcela_shared::types::{ExpenseId, SeriesId, YearMonth};
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use super::error::ExpenseError;
use super::series::{SeriesChange, expand, plan_resize};
use super::types::{
    CategoryDraft, ExpenseCategory, ExpenseDraft, ExpensePatch, MonthTotals, PersonalExpense,
};
use crate::clock::Clock;
use crate::currency::round2;
use crate::store::Collection;

/// One person's own expenses, including installment series and fixed bills.
pub struct PersonalExpenses {
    collection: Arc<dyn Collection<PersonalExpense>>,
    clock: Arc<dyn Clock>,
    expenses: Vec<PersonalExpense>,
}

impl PersonalExpenses {
    /// Loads every record from `collection`.
    pub async fn load(
        collection: Arc<dyn Collection<PersonalExpense>>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ExpenseError> {
        let expenses = collection.get_all().await?;
        Ok(Self {
            collection,
            clock,
            expenses,
        })
    }

    /// Re-fetches the snapshot.
    pub async fn refresh(&mut self) -> Result<(), ExpenseError> {
        self.expenses = self.collection.get_all().await?;
        debug!(count = self.expenses.len(), "Personal expenses refreshed");
        Ok(())
    }

    /// Every record.
    #[must_use]
    pub fn list(&self) -> &[PersonalExpense] {
        &self.expenses
    }

    /// Looks up one record.
    #[must_use]
    pub fn get(&self, id: ExpenseId) -> Option<&PersonalExpense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Records of one series ordered by ordinal.
    #[must_use]
    pub fn series(&self, series_id: SeriesId) -> Vec<&PersonalExpense> {
        let mut records: Vec<&PersonalExpense> = self
            .expenses
            .iter()
            .filter(|e| e.series_id == series_id)
            .collect();
        records.sort_by_key(|e| (e.ordinal, e.id));
        records
    }

    /// How many records share `id`'s series.
    pub fn series_size(&self, id: ExpenseId) -> Result<usize, ExpenseError> {
        let record = self.get(id).ok_or(ExpenseError::NotFound(id))?;
        Ok(self.series(record.series_id).len())
    }

    /// What shows up in `month`: records dated in it plus every fixed bill
    /// that started on or before it. Fixed bills come first, by due day.
    #[must_use]
    pub fn in_month(&self, month: YearMonth) -> Vec<&PersonalExpense> {
        let mut fixed: Vec<&PersonalExpense> = self
            .expenses
            .iter()
            .filter(|e| e.is_fixed() && e.month() <= month)
            .collect();
        fixed.sort_by_key(|e| match e.category {
            ExpenseCategory::Fixed { due_day, .. } => due_day,
            _ => 0,
        });

        let mut dated: Vec<&PersonalExpense> = self
            .expenses
            .iter()
            .filter(|e| !e.is_fixed() && e.month() == month)
            .collect();
        dated.sort_by_key(|e| e.date);

        fixed.extend(dated);
        fixed
    }

    /// Totals for `month`; deactivated fixed bills are left out.
    #[must_use]
    pub fn month_totals(&self, month: YearMonth) -> MonthTotals {
        let counted: Vec<&PersonalExpense> = self
            .in_month(month)
            .into_iter()
            .filter(|e| e.counts_toward_total())
            .collect();

        let total = round2(counted.iter().map(|e| e.amount).sum());
        let paid = round2(
            counted
                .iter()
                .filter(|e| e.is_paid_in(month))
                .map(|e| e.amount)
                .sum(),
        );
        MonthTotals {
            total,
            paid,
            pending: round2(total - paid),
            my_share: round2(counted.iter().map(|e| e.my_share()).sum()),
        }
    }

    /// Creates a new expense, expanding credit purchases into a series.
    ///
    /// Records are written one by one; if any write fails, the ones already
    /// written are deleted again before the error is returned.
    pub async fn create(&mut self, draft: &ExpenseDraft) -> Result<Vec<PersonalExpense>, ExpenseError> {
        validate(draft)?;
        let records = expand(draft, SeriesId::new())?;

        let mut created: Vec<PersonalExpense> = Vec::with_capacity(records.len());
        for record in records {
            match self.collection.create(record).await {
                Ok(stored) => created.push(stored),
                Err(err) => {
                    self.roll_back(&created).await;
                    return Err(err.into());
                }
            }
        }

        if let Some(first) = created.first() {
            info!(
                series_id = %first.series_id,
                installments = created.len(),
                amount = %first.amount,
                "Personal expense created"
            );
        }
        self.expenses.extend(created.iter().cloned());
        Ok(created)
    }

    async fn roll_back(&self, created: &[PersonalExpense]) {
        for record in created.iter().rev() {
            if let Err(err) = self.collection.delete(record.id).await {
                error!(expense_id = %record.id, error = %err, "Rollback of created expense failed");
            }
        }
        if !created.is_empty() {
            warn!(rolled_back = created.len(), "Personal expense creation rolled back");
        }
    }

    /// Edits one occurrence and reconciles its whole series with the new
    /// installment count, amount and dates.
    ///
    /// Steps are applied in order and each one lands in the snapshot as soon
    /// as it is stored; after a failure, re-running the same edit finishes
    /// the job. Returns the series afterwards.
    pub async fn edit(
        &mut self,
        id: ExpenseId,
        draft: &ExpenseDraft,
    ) -> Result<Vec<PersonalExpense>, ExpenseError> {
        validate(draft)?;
        let edited = self.get(id).cloned().ok_or(ExpenseError::NotFound(id))?;
        let siblings: Vec<PersonalExpense> =
            self.series(edited.series_id).into_iter().cloned().collect();
        let changes = plan_resize(&siblings, &edited, draft)?;

        for change in &changes {
            self.apply(change).await?;
        }

        info!(
            expense_id = %id,
            series_id = %edited.series_id,
            changes = changes.len(),
            installments = draft.effective_installments(),
            "Personal expense series edited"
        );
        Ok(self
            .series(edited.series_id)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn apply(&mut self, change: &SeriesChange) -> Result<(), ExpenseError> {
        match change {
            SeriesChange::Create(record) => {
                let stored = self.collection.create(record.clone()).await?;
                self.expenses.push(stored);
            }
            SeriesChange::Update { id, patch, record } => {
                self.collection.update(*id, patch).await?;
                if let Some(slot) = self.expenses.iter_mut().find(|e| e.id == *id) {
                    *slot = record.clone();
                }
            }
            SeriesChange::Delete(id) => {
                self.collection.delete(*id).await?;
                self.expenses.retain(|e| e.id != *id);
            }
        }
        Ok(())
    }

    /// Deletes every occurrence in `id`'s series. Returns how many went.
    pub async fn delete_series(&mut self, id: ExpenseId) -> Result<usize, ExpenseError> {
        let record = self.get(id).ok_or(ExpenseError::NotFound(id))?;
        let series_id = record.series_id;
        let ids: Vec<ExpenseId> = self.series(series_id).iter().map(|e| e.id).collect();

        for sibling in &ids {
            self.apply(&SeriesChange::Delete(*sibling)).await?;
        }

        info!(series_id = %series_id, deleted = ids.len(), "Personal expense series deleted");
        Ok(ids.len())
    }

    /// Flips a credit occurrence between paid and unpaid.
    ///
    /// For a fixed bill this flips the current month only.
    pub async fn toggle_paid(&mut self, id: ExpenseId) -> Result<PersonalExpense, ExpenseError> {
        let record = self.get(id).ok_or(ExpenseError::NotFound(id))?;
        if !record.kind.is_credit() {
            return Err(ExpenseError::NotCredit(id));
        }
        if record.is_fixed() {
            let month = YearMonth::of(self.clock.today());
            return self.toggle_paid_in(id, month).await;
        }

        let paid = !record.paid;
        let paid_on = paid.then(|| self.clock.today());
        let patch = ExpensePatch {
            paid: Some(paid),
            paid_on: Some(paid_on),
            ..ExpensePatch::default()
        };
        self.update(id, &patch, |e| {
            e.paid = paid;
            e.paid_on = paid_on;
        })
        .await
        .inspect(|_| info!(expense_id = %id, paid, "Personal expense paid flag toggled"))
    }

    /// Flips whether a credit fixed bill was paid in `month`.
    pub async fn toggle_paid_in(
        &mut self,
        id: ExpenseId,
        month: YearMonth,
    ) -> Result<PersonalExpense, ExpenseError> {
        let record = self.get(id).ok_or(ExpenseError::NotFound(id))?;
        if !record.is_fixed() {
            return Err(ExpenseError::NotFixed(id));
        }
        if !record.kind.is_credit() {
            return Err(ExpenseError::NotCredit(id));
        }

        let mut paid_months = record.paid_months.clone();
        let paid = !paid_months.remove(&month);
        if paid {
            paid_months.insert(month);
        }
        let patch = ExpensePatch {
            paid_months: Some(paid_months.clone()),
            ..ExpensePatch::default()
        };
        self.update(id, &patch, |e| e.paid_months = paid_months)
            .await
            .inspect(|_| info!(expense_id = %id, month = %month, paid, "Fixed expense paid flag toggled"))
    }

    /// Flips a fixed bill between active and inactive.
    pub async fn toggle_active(&mut self, id: ExpenseId) -> Result<PersonalExpense, ExpenseError> {
        let record = self.get(id).ok_or(ExpenseError::NotFound(id))?;
        let ExpenseCategory::Fixed { due_day, active } = record.category else {
            return Err(ExpenseError::NotFixed(id));
        };

        let category = ExpenseCategory::Fixed {
            due_day,
            active: !active,
        };
        let patch = ExpensePatch {
            category: Some(category.clone()),
            ..ExpensePatch::default()
        };
        self.update(id, &patch, |e| e.category = category)
            .await
            .inspect(|_| info!(expense_id = %id, active = !active, "Fixed expense toggled"))
    }

    async fn update(
        &mut self,
        id: ExpenseId,
        patch: &ExpensePatch,
        change: impl FnOnce(&mut PersonalExpense),
    ) -> Result<PersonalExpense, ExpenseError> {
        self.collection.update(id, patch).await?;
        let slot = self
            .expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ExpenseError::NotFound(id))?;
        change(slot);
        Ok(slot.clone())
    }
}

fn validate(draft: &ExpenseDraft) -> Result<(), ExpenseError> {
    if super::series::strip_suffix(&draft.description).is_empty() {
        return Err(ExpenseError::MissingDescription);
    }
    if round2(draft.total) <= Decimal::ZERO {
        return Err(ExpenseError::NonPositiveTotal);
    }
    match &draft.category {
        CategoryDraft::Personal => {}
        CategoryDraft::Split {
            counterparty,
            my_share_total,
        } => {
            if counterparty.trim().is_empty() {
                return Err(ExpenseError::MissingCounterparty);
            }
            if *my_share_total < Decimal::ZERO || *my_share_total > draft.total {
                return Err(ExpenseError::ShareOutOfRange);
            }
        }
        CategoryDraft::Fixed { due_day } => {
            if !(1..=31).contains(due_day) {
                return Err(ExpenseError::InvalidDueDay(*due_day));
            }
        }
    }
    Ok(())
}
