//! Household session.
//!
//! Builds one service per entity kind once per session and keeps them in
//! step with their collections. Front ends hold a [`Household`] and call
//! [`Household::refresh_on`] for every change notice they receive.

use std::sync::Arc;

use parcela_shared::types::YearMonth;
use parcela_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::clock::Clock;
use crate::closing::{ClosingError, ClosingReport, ClosingRequest, close_month};
use crate::currency::round2;
use crate::debt::{DebtBalance, DebtLedger};
use crate::observation::{Observation, ObservationBook};
use crate::partial::{PartialPayment, PartialPaymentTracker};
use crate::personal::{PersonalExpense, PersonalExpenses};
use crate::schedule::{Purchase, PurchaseBook};
use crate::store::{ChangeNotice, Collection, Entity, MemoryCollection};
use crate::summary::PersonSummary;

/// One collection per entity kind.
#[derive(Clone)]
pub struct Backends {
    /// Shared purchases.
    pub purchases: Arc<dyn Collection<Purchase>>,
    /// Debt balances.
    pub debts: Arc<dyn Collection<DebtBalance>>,
    /// Partial payments.
    pub partial_payments: Arc<dyn Collection<PartialPayment>>,
    /// Monthly notes.
    pub observations: Arc<dyn Collection<Observation>>,
    /// Personal expenses.
    pub personal_expenses: Arc<dyn Collection<PersonalExpense>>,
}

impl Backends {
    /// Fresh in-memory collections, with change notifications.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            purchases: Arc::new(MemoryCollection::<Purchase>::new()),
            debts: Arc::new(MemoryCollection::<DebtBalance>::new()),
            partial_payments: Arc::new(MemoryCollection::<PartialPayment>::new()),
            observations: Arc::new(MemoryCollection::<Observation>::new()),
            personal_expenses: Arc::new(MemoryCollection::<PersonalExpense>::new()),
        }
    }

    /// Change streams of every collection that has one.
    #[must_use]
    pub fn subscribe_all(&self) -> Vec<broadcast::Receiver<ChangeNotice>> {
        [
            self.purchases.subscribe(),
            self.debts.subscribe(),
            self.partial_payments.subscribe(),
            self.observations.subscribe(),
            self.personal_expenses.subscribe(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Where one person stands in a month.
#[derive(Debug, Clone, Serialize)]
pub struct PersonOverview {
    /// Installment total and count.
    pub summary: PersonSummary,
    /// Partial payments so far.
    pub paid_to_date: Decimal,
    /// Month total minus what was paid.
    pub remaining: Decimal,
    /// Open debt across every month.
    pub outstanding_debt: Decimal,
    /// The month's note, if any.
    pub observation: Option<String>,
}

/// Every person with installments due in a month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthOverview {
    /// The month shown.
    pub month: YearMonth,
    /// People, highest total first.
    pub people: Vec<PersonOverview>,
    /// Sum over everyone.
    pub total: Decimal,
}

/// The services of one session.
pub struct Household {
    /// Shared purchases.
    pub purchases: PurchaseBook,
    /// Debt balances.
    pub debts: DebtLedger,
    /// Partial payments.
    pub partials: PartialPaymentTracker,
    /// Monthly notes.
    pub observations: ObservationBook,
    /// Personal expenses.
    pub expenses: PersonalExpenses,
}

impl Household {
    /// Loads every service from `backends`.
    pub async fn open(backends: &Backends, clock: Arc<dyn Clock>) -> AppResult<Self> {
        Ok(Self {
            purchases: PurchaseBook::load(backends.purchases.clone()).await?,
            debts: DebtLedger::load(backends.debts.clone(), clock.clone()).await?,
            partials: PartialPaymentTracker::load(backends.partial_payments.clone(), clock.clone())
                .await?,
            observations: ObservationBook::load(backends.observations.clone()).await?,
            expenses: PersonalExpenses::load(backends.personal_expenses.clone(), clock).await?,
        })
    }

    /// Re-fetches every snapshot.
    pub async fn refresh_all(&mut self) -> AppResult<()> {
        self.purchases.refresh().await?;
        self.debts.refresh().await?;
        self.partials.refresh().await?;
        self.observations.refresh().await?;
        self.expenses.refresh().await?;
        Ok(())
    }

    /// Re-fetches the snapshot a notice refers to.
    pub async fn refresh_on(&mut self, notice: ChangeNotice) -> AppResult<()> {
        debug!(kind = notice.kind, "Change notice received");
        match notice.kind {
            Purchase::KIND => self.purchases.refresh().await?,
            DebtBalance::KIND => self.debts.refresh().await?,
            PartialPayment::KIND => self.partials.refresh().await?,
            Observation::KIND => self.observations.refresh().await?,
            PersonalExpense::KIND => self.expenses.refresh().await?,
            other => {
                return Err(AppError::Internal(format!("unknown entity kind: {other}")));
            }
        }
        Ok(())
    }

    /// Closes `person`'s month against their current installment total.
    pub async fn close_month(
        &mut self,
        person: &str,
        month: YearMonth,
        paying_now: Decimal,
    ) -> Result<ClosingReport, ClosingError> {
        let request = ClosingRequest {
            person: person.to_string(),
            month,
            month_total: self.purchases.month_total_for(person, month),
            paying_now,
        };
        close_month(&mut self.partials, &mut self.debts, &request).await
    }

    /// Summary, payments, debts and notes for everyone owing in `month`.
    #[must_use]
    pub fn month_overview(&self, month: YearMonth) -> MonthOverview {
        let people: Vec<PersonOverview> = self
            .purchases
            .summary(month)
            .into_iter()
            .map(|summary| {
                let paid_to_date = self.partials.paid_to_date(&summary.person, month);
                PersonOverview {
                    paid_to_date,
                    remaining: self.partials.remaining(
                        &summary.person,
                        month,
                        summary.rounded_total(),
                    ),
                    outstanding_debt: self.debts.outstanding_for(&summary.person),
                    observation: self
                        .observations
                        .get(&summary.person, month)
                        .map(|o| o.text.clone()),
                    summary,
                }
            })
            .collect();
        let total = round2(people.iter().map(|p| p.summary.total).sum());

        MonthOverview {
            month,
            people,
            total,
        }
    }
}
