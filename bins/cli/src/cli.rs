//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use parcela_core::PaymentKind;
use parcela_shared::types::{DebtId, ExpenseId, PaymentId, PurchaseId, YearMonth};
use rust_decimal::Decimal;

/// Amounts are typed the local way (`1.234,56`).
fn amount(text: &str) -> Result<Decimal, String> {
    Ok(parcela_core::currency::parse(text))
}

#[derive(Parser, Debug)]
#[command(name = "parcela", version, about = "Installments, partial payments and debts")]
pub struct Cli {
    /// Directory of the local store (overrides configuration).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Per-person totals, payments and debts for a month.
    Summary {
        /// Month as YYYY-MM (default: current month).
        #[arg(long)]
        month: Option<YearMonth>,
    },
    /// Shared installment purchases.
    #[command(subcommand)]
    Purchase(PurchaseCmd),
    /// Debt balances.
    #[command(subcommand)]
    Debt(DebtCmd),
    /// Partial payments toward a month.
    #[command(subcommand)]
    Partial(PartialCmd),
    /// Close a person's month, carrying any remainder as debt.
    Close {
        /// Whose month.
        #[arg(long)]
        person: String,
        /// Month as YYYY-MM.
        #[arg(long)]
        month: YearMonth,
        /// Amount paid now.
        #[arg(long, value_parser = amount)]
        paying: Decimal,
    },
    /// Personal expenses.
    #[command(subcommand)]
    Expense(ExpenseCmd),
    /// Set (or clear, with no text) the note for a person's month.
    Note {
        /// Whose month.
        #[arg(long)]
        person: String,
        /// Month as YYYY-MM.
        #[arg(long)]
        month: YearMonth,
        /// Note text; omit to clear.
        text: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PurchaseCmd {
    /// Record a purchase.
    Add(PurchaseArgs),
    /// List every purchase.
    List,
    /// Delete a purchase.
    Delete {
        /// Purchase id.
        id: PurchaseId,
    },
}

#[derive(Args, Debug)]
pub struct PurchaseArgs {
    /// What was bought.
    #[arg(long)]
    pub description: String,
    /// Who owes it.
    #[arg(long)]
    pub person: String,
    /// Total amount.
    #[arg(long, value_parser = amount)]
    pub total: Decimal,
    /// Number of installments.
    #[arg(long, default_value_t = 1)]
    pub installments: u32,
    /// Date of the first installment (YYYY-MM-DD).
    #[arg(long)]
    pub start: NaiveDate,
    /// credit or debit.
    #[arg(long, default_value = "credit")]
    pub kind: PaymentKind,
}

#[derive(Subcommand, Debug)]
pub enum DebtCmd {
    /// Open a debt.
    Open {
        /// Who owes it.
        #[arg(long)]
        person: String,
        /// What it is for.
        #[arg(long)]
        description: String,
        /// Amount owed.
        #[arg(long, value_parser = amount)]
        amount: Decimal,
    },
    /// Pay against a debt.
    Pay {
        /// Debt id.
        id: DebtId,
        /// Amount paid.
        #[arg(long, value_parser = amount)]
        amount: Decimal,
        /// Optional note.
        #[arg(long)]
        note: Option<String>,
    },
    /// Undo one payment.
    Undo {
        /// Debt id.
        debt: DebtId,
        /// Payment id.
        payment: PaymentId,
    },
    /// List debts.
    List {
        /// Only this person's debts.
        #[arg(long)]
        person: Option<String>,
    },
    /// Delete a debt.
    Delete {
        /// Debt id.
        id: DebtId,
    },
}

#[derive(Subcommand, Debug)]
pub enum PartialCmd {
    /// Record a partial payment.
    Add {
        /// Who paid.
        #[arg(long)]
        person: String,
        /// Month as YYYY-MM.
        #[arg(long)]
        month: YearMonth,
        /// Amount paid.
        #[arg(long, value_parser = amount)]
        amount: Decimal,
    },
    /// Undo the latest partial payment.
    Undo {
        /// Who paid.
        #[arg(long)]
        person: String,
        /// Month as YYYY-MM.
        #[arg(long)]
        month: YearMonth,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExpenseCmd {
    /// Record a personal expense.
    Add(ExpenseArgs),
    /// Change the installment count (and optionally the total) of a series.
    Resize {
        /// Any occurrence of the series.
        id: ExpenseId,
        /// New installment count.
        #[arg(long)]
        installments: u32,
        /// New total for the whole purchase.
        #[arg(long, value_parser = amount)]
        total: Option<Decimal>,
    },
    /// Delete a whole series.
    Delete {
        /// Any occurrence of the series.
        id: ExpenseId,
    },
    /// Mark a credit occurrence paid or unpaid.
    TogglePaid {
        /// Occurrence id.
        id: ExpenseId,
        /// Month to mark, for fixed bills (default: current month).
        #[arg(long)]
        month: Option<YearMonth>,
    },
    /// Activate or deactivate a fixed bill.
    ToggleActive {
        /// Fixed bill id.
        id: ExpenseId,
    },
    /// List a month's expenses and totals.
    List {
        /// Month as YYYY-MM (default: current month).
        #[arg(long)]
        month: Option<YearMonth>,
    },
}

#[derive(Args, Debug)]
pub struct ExpenseArgs {
    /// What was bought.
    #[arg(long)]
    pub description: String,
    /// Total amount.
    #[arg(long, value_parser = amount)]
    pub total: Decimal,
    /// credit or debit.
    #[arg(long, default_value = "credit")]
    pub kind: PaymentKind,
    /// Number of installments (credit only).
    #[arg(long, default_value_t = 1)]
    pub installments: u32,
    /// Date of the first installment (YYYY-MM-DD).
    #[arg(long)]
    pub date: NaiveDate,
    /// Split with this person.
    #[arg(long, requires = "my_share", conflicts_with = "due_day")]
    pub split_with: Option<String>,
    /// My part of the total when split.
    #[arg(long, value_parser = amount, requires = "split_with")]
    pub my_share: Option<Decimal>,
    /// Make it a fixed monthly bill due on this day.
    #[arg(long)]
    pub due_day: Option<u32>,
}
