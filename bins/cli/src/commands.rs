//! Command dispatch and output.

use chrono::NaiveDate;
use parcela_core::currency::{DisplayFormat, format_currency};
use parcela_core::debt::DebtBalance;
use parcela_core::personal::{CategoryDraft, ExpenseCategory, ExpenseDraft, PersonalExpense};
use parcela_core::schedule::{NewPurchase, installment_amount};
use parcela_core::Household;
use parcela_shared::types::YearMonth;

use crate::cli::{Command, DebtCmd, ExpenseArgs, ExpenseCmd, PartialCmd, PurchaseCmd};

/// Runs one command.
pub async fn run(
    command: Command,
    household: &mut Household,
    format: &DisplayFormat,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let money = |amount| format_currency(amount, format);
    let this_month = YearMonth::of(today);

    match command {
        Command::Summary { month } => {
            let month = month.unwrap_or(this_month);
            let overview = household.month_overview(month);
            println!("{month}  total {}", money(overview.total));
            for person in &overview.people {
                println!(
                    "  {:<16} {:>14}  {} item(s)  paid {}  left {}  debt {}",
                    person.summary.person,
                    money(person.summary.rounded_total()),
                    person.summary.count,
                    money(person.paid_to_date),
                    money(person.remaining),
                    money(person.outstanding_debt),
                );
                if let Some(note) = &person.observation {
                    println!("    note: {note}");
                }
            }
            for occurrence in household.purchases.occurrences(month) {
                println!(
                    "  - {} [{}] {} {}",
                    occurrence.purchase.description,
                    occurrence.label(),
                    occurrence.person(),
                    money(occurrence.amount),
                );
            }
        }

        Command::Purchase(PurchaseCmd::Add(args)) => {
            let purchase = household
                .purchases
                .create(NewPurchase {
                    description: args.description,
                    person: args.person,
                    total: args.total,
                    installments: args.installments,
                    start_date: args.start,
                    kind: args.kind,
                })
                .await?;
            println!(
                "{}  {} x {}",
                purchase.id,
                purchase.installments,
                money(installment_amount(&purchase))
            );
        }
        Command::Purchase(PurchaseCmd::List) => {
            for p in household.purchases.list() {
                println!(
                    "{}  {}  {}  {}  {}x from {}  {}",
                    p.id,
                    p.person,
                    p.description,
                    money(p.total),
                    p.installments,
                    p.start_month(),
                    p.kind
                );
            }
        }
        Command::Purchase(PurchaseCmd::Delete { id }) => {
            let purchase = household.purchases.delete(id).await?;
            println!("deleted {}", purchase.description);
        }

        Command::Debt(DebtCmd::Open {
            person,
            description,
            amount,
        }) => {
            let debt = household.debts.open(&person, &description, amount).await?;
            println!("{}  {}", debt.id, money(debt.current));
        }
        Command::Debt(DebtCmd::Pay { id, amount, note }) => {
            let applied = household.debts.apply_payment(id, amount, note).await?;
            if applied.was_clamped() {
                println!(
                    "requested {} but only {} was owed",
                    money(applied.requested),
                    money(applied.applied())
                );
            }
            println!(
                "payment {}  remaining {}",
                applied.payment.id,
                money(applied.remaining)
            );
        }
        Command::Debt(DebtCmd::Undo { debt, payment }) => {
            let undone = household.debts.undo_payment(debt, payment).await?;
            println!("undid payment of {}", money(undone.amount));
        }
        Command::Debt(DebtCmd::List { person }) => {
            let debts = household
                .debts
                .list()
                .iter()
                .filter(|d| person.as_deref().is_none_or(|p| d.person == p));
            for debt in debts {
                print_debt(debt, format);
            }
        }
        Command::Debt(DebtCmd::Delete { id }) => {
            let debt = household.debts.remove(id).await?;
            println!("deleted debt of {} ({})", debt.person, money(debt.current));
        }

        Command::Partial(PartialCmd::Add {
            person,
            month,
            amount,
        }) => {
            let total = household.purchases.month_total_for(&person, month);
            household.partials.add(&person, month, amount, total).await?;
            println!(
                "paid {} of {}  left {}",
                money(household.partials.paid_to_date(&person, month)),
                money(total),
                money(household.partials.remaining(&person, month, total))
            );
        }
        Command::Partial(PartialCmd::Undo { person, month }) => {
            match household.partials.undo_last(&person, month).await? {
                Some(entry) => println!("undid {}", money(entry.amount)),
                None => println!("nothing to undo"),
            }
        }

        Command::Close {
            person,
            month,
            paying,
        } => {
            let report = household.close_month(&person, month, paying).await?;
            println!(
                "{} {}: total {}  already paid {}  paid now {}",
                report.person,
                report.month,
                money(report.plan.month_total),
                money(report.plan.already_paid),
                money(report.plan.paying_now)
            );
            match report.carried_debt {
                Some(debt) => println!("carried over {} as debt {}", money(debt.current), debt.id),
                None => println!("fully settled"),
            }
        }

        Command::Expense(ExpenseCmd::Add(args)) => {
            let created = household.expenses.create(&expense_draft(args)).await?;
            for record in &created {
                print_expense(record, format, this_month);
            }
        }
        Command::Expense(ExpenseCmd::Resize {
            id,
            installments,
            total,
        }) => {
            let record = household
                .expenses
                .get(id)
                .ok_or_else(|| anyhow::anyhow!("Expense not found: {id}"))?;
            let mut draft = ExpenseDraft::from_record(record);
            draft.installments = installments;
            if let Some(total) = total {
                draft.total = total;
            }
            for record in household.expenses.edit(id, &draft).await? {
                print_expense(&record, format, this_month);
            }
        }
        Command::Expense(ExpenseCmd::Delete { id }) => {
            let deleted = household.expenses.delete_series(id).await?;
            println!("deleted {deleted} record(s)");
        }
        Command::Expense(ExpenseCmd::TogglePaid { id, month }) => {
            let record = match month {
                Some(month) => household.expenses.toggle_paid_in(id, month).await?,
                None => household.expenses.toggle_paid(id).await?,
            };
            print_expense(&record, format, month.unwrap_or(this_month));
        }
        Command::Expense(ExpenseCmd::ToggleActive { id }) => {
            let record = household.expenses.toggle_active(id).await?;
            print_expense(&record, format, this_month);
        }
        Command::Expense(ExpenseCmd::List { month }) => {
            let month = month.unwrap_or(this_month);
            for record in household.expenses.in_month(month) {
                print_expense(record, format, month);
            }
            let totals = household.expenses.month_totals(month);
            println!(
                "{month}  total {}  paid {}  pending {}  mine {}",
                money(totals.total),
                money(totals.paid),
                money(totals.pending),
                money(totals.my_share)
            );
        }

        Command::Note {
            person,
            month,
            text,
        } => match household
            .observations
            .set(&person, month, &text.join(" "))
            .await?
        {
            Some(note) => println!("{} {}: {}", note.person, note.month, note.text),
            None => println!("note cleared"),
        },
    }

    Ok(())
}

fn expense_draft(args: ExpenseArgs) -> ExpenseDraft {
    let category = match (args.split_with, args.my_share, args.due_day) {
        (Some(counterparty), Some(my_share_total), _) => CategoryDraft::Split {
            counterparty,
            my_share_total,
        },
        (_, _, Some(due_day)) => CategoryDraft::Fixed { due_day },
        _ => CategoryDraft::Personal,
    };
    ExpenseDraft {
        description: args.description,
        total: args.total,
        kind: args.kind,
        category,
        date: args.date,
        installments: args.installments,
    }
}

fn print_debt(debt: &DebtBalance, format: &DisplayFormat) {
    println!(
        "{}  {}  {}  {} of {}  since {}",
        debt.id,
        debt.person,
        debt.description,
        format_currency(debt.current, format),
        format_currency(debt.original, format),
        debt.created_on
    );
    for payment in &debt.payments {
        println!(
            "    {}  {}  {}  {}",
            payment.id,
            payment.date,
            format_currency(payment.amount, format),
            payment.note.as_deref().unwrap_or("")
        );
    }
}

fn print_expense(record: &PersonalExpense, format: &DisplayFormat, month: YearMonth) {
    let detail = match &record.category {
        ExpenseCategory::Personal => String::new(),
        ExpenseCategory::Split {
            counterparty,
            my_share,
        } => format!(
            "  split with {counterparty}, mine {}",
            format_currency(*my_share, format)
        ),
        ExpenseCategory::Fixed { due_day, active } => {
            format!("  due day {due_day}{}", if *active { "" } else { " (inactive)" })
        }
    };
    println!(
        "{}  {}  {}  {}  {}{}{}",
        record.id,
        record.date,
        record.description,
        format_currency(record.amount, format),
        record.kind,
        if record.is_paid_in(month) { "  paid" } else { "" },
        detail
    );
}
