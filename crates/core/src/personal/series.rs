//! Installment series: expansion on create and reconciliation on resize.
//!
//! Resizing never edits a single row in place. It computes the series the
//! edit describes and diffs it against the stored siblings:
//!
//! ```text
//! ordinal k in 1..=max(old N, new N)
//!   k <= new N, sibling exists  -> update (skipped when nothing changed)
//!   k <= new N, no sibling      -> create
//!   k >  new N, sibling exists  -> delete
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use chrono::NaiveDate;
use parcela_shared::shift_months;
use parcela_shared::types::{ExpenseId, SeriesId};
use regex::Regex;
use rust_decimal::Decimal;

use super::error::ExpenseError;
use super::types::{CategoryDraft, ExpenseCategory, ExpenseDraft, ExpensePatch, PersonalExpense};
use crate::currency::{round2, share};

static INSTALLMENT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\d+/\d+\)$").expect("hardcoded regex should be valid"));

/// One step of bringing a stored series in line with an edit.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesChange {
    /// A new occurrence.
    Create(PersonalExpense),
    /// An existing occurrence changes; `record` is its state afterwards.
    Update {
        /// Occurrence to patch.
        id: ExpenseId,
        /// Fields that change.
        patch: ExpensePatch,
        /// The occurrence after the patch.
        record: PersonalExpense,
    },
    /// An occurrence beyond the new length.
    Delete(ExpenseId),
}

/// Description without a trailing ` (k/N)`.
#[must_use]
pub fn strip_suffix(description: &str) -> &str {
    let trimmed = description.trim();
    match INSTALLMENT_SUFFIX.find(trimmed) {
        Some(found) => &trimmed[..found.start()],
        None => trimmed,
    }
}

/// `base (k/N)` for series longer than one, `base` otherwise.
#[must_use]
pub fn with_suffix(base: &str, ordinal: u32, installments: u32) -> String {
    if installments > 1 {
        format!("{base} ({ordinal}/{installments})")
    } else {
        base.to_string()
    }
}

fn occurrence_date(start: NaiveDate, ordinal: u32) -> Result<NaiveDate, ExpenseError> {
    let steps = i32::try_from(ordinal.saturating_sub(1)).map_err(|_| ExpenseError::DateOutOfRange)?;
    shift_months(start, steps).ok_or(ExpenseError::DateOutOfRange)
}

fn category_for(draft: &ExpenseDraft, installments: u32, active: bool) -> ExpenseCategory {
    match &draft.category {
        CategoryDraft::Personal => ExpenseCategory::Personal,
        CategoryDraft::Split {
            counterparty,
            my_share_total,
        } => ExpenseCategory::Split {
            counterparty: counterparty.trim().to_string(),
            my_share: share(*my_share_total, installments),
        },
        CategoryDraft::Fixed { due_day } => ExpenseCategory::Fixed {
            due_day: *due_day,
            active,
        },
    }
}

/// Whole-purchase amounts as entered, kept on every occurrence so a later
/// resize divides the original total instead of a rounded installment.
fn entered_totals(draft: &ExpenseDraft) -> (Option<Decimal>, Option<Decimal>) {
    let share_total = match &draft.category {
        CategoryDraft::Split { my_share_total, .. } => Some(round2(*my_share_total)),
        CategoryDraft::Personal | CategoryDraft::Fixed { .. } => None,
    };
    (Some(round2(draft.total)), share_total)
}

/// Expands a draft into the records of a new series.
///
/// Credit drafts yield one record per installment; debit drafts and fixed
/// bills yield a single record. Debit records are paid on their date.
pub fn expand(draft: &ExpenseDraft, series_id: SeriesId) -> Result<Vec<PersonalExpense>, ExpenseError> {
    let installments = draft.effective_installments();
    let base = strip_suffix(&draft.description);
    let amount = share(draft.total, installments);
    let (series_total, share_total) = entered_totals(draft);
    let paid = !draft.kind.is_credit();

    (1..=installments)
        .map(|ordinal| {
            let date = occurrence_date(draft.date, ordinal)?;
            Ok(PersonalExpense {
                id: ExpenseId::new(),
                series_id,
                description: with_suffix(base, ordinal, installments),
                amount,
                kind: draft.kind,
                category: category_for(draft, installments, true),
                date,
                paid,
                paid_on: paid.then_some(date),
                installments,
                ordinal,
                series_total,
                share_total,
                paid_months: BTreeSet::new(),
            })
        })
        .collect()
}

/// Plans the changes that turn `siblings` into the series `draft` describes.
///
/// `edited` is the occurrence the user changed; its ordinal and the draft's
/// date fix where the series starts. Survivors keep their paid flag and,
/// for fixed bills, their active flag and paid months. Stray siblings sharing an ordinal are
/// deleted, keeping the oldest.
pub fn plan_resize(
    siblings: &[PersonalExpense],
    edited: &PersonalExpense,
    draft: &ExpenseDraft,
) -> Result<Vec<SeriesChange>, ExpenseError> {
    let installments = draft.effective_installments();
    let back = i32::try_from(edited.ordinal.saturating_sub(1))
        .map_err(|_| ExpenseError::DateOutOfRange)?;
    let start = shift_months(draft.date, -back).ok_or(ExpenseError::DateOutOfRange)?;
    let base = strip_suffix(&draft.description);
    let amount = share(draft.total, installments);
    let (series_total, share_total) = entered_totals(draft);
    let credit = draft.kind.is_credit();

    let mut by_ordinal: BTreeMap<u32, Vec<&PersonalExpense>> = BTreeMap::new();
    for sibling in siblings {
        by_ordinal.entry(sibling.ordinal).or_default().push(sibling);
    }
    let mut changes = Vec::new();
    for group in by_ordinal.values_mut() {
        group.sort_by_key(|s| s.id);
        changes.extend(group.drain(1..).map(|extra| SeriesChange::Delete(extra.id)));
    }

    let last = by_ordinal
        .keys()
        .next_back()
        .copied()
        .unwrap_or(0)
        .max(installments);

    for ordinal in 1..=last {
        let survivor = by_ordinal.get(&ordinal).and_then(|g| g.first()).copied();

        if ordinal > installments {
            if let Some(existing) = survivor {
                changes.push(SeriesChange::Delete(existing.id));
            }
            continue;
        }

        let date = occurrence_date(start, ordinal)?;
        let active = match survivor.map(|s| &s.category) {
            Some(ExpenseCategory::Fixed { active, .. }) => *active,
            _ => true,
        };
        let (paid, paid_on) = match (credit, survivor) {
            (false, Some(existing)) if existing.paid => (true, existing.paid_on.or(Some(date))),
            (false, _) => (true, Some(date)),
            (true, Some(existing)) => (existing.paid, existing.paid_on),
            (true, None) => (false, None),
        };

        let target = PersonalExpense {
            id: survivor.map_or_else(ExpenseId::new, |s| s.id),
            series_id: edited.series_id,
            description: with_suffix(base, ordinal, installments),
            amount,
            kind: draft.kind,
            category: category_for(draft, installments, active),
            date,
            paid,
            paid_on,
            installments,
            ordinal,
            series_total,
            share_total,
            paid_months: survivor.map(|s| s.paid_months.clone()).unwrap_or_default(),
        };

        match survivor {
            Some(existing) => {
                let patch = ExpensePatch::between(existing, &target);
                if !patch.is_empty() {
                    changes.push(SeriesChange::Update {
                        id: existing.id,
                        patch,
                        record: target,
                    });
                }
            }
            None => changes.push(SeriesChange::Create(target)),
        }
    }

    Ok(changes)
}

#[cfg(test)]
pub(crate) fn apply_changes(records: &mut Vec<PersonalExpense>, changes: &[SeriesChange]) {
    for change in changes {
        match change {
            SeriesChange::Create(record) => records.push(record.clone()),
            SeriesChange::Update { id, record, .. } => {
                if let Some(slot) = records.iter_mut().find(|r| r.id == *id) {
                    *slot = record.clone();
                }
            }
            SeriesChange::Delete(id) => records.retain(|r| r.id != *id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::PaymentKind;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(total: Decimal, installments: u32) -> ExpenseDraft {
        ExpenseDraft {
            description: "Notebook".to_string(),
            total,
            kind: PaymentKind::Credit,
            category: CategoryDraft::Personal,
            date: date(2024, 1, 31),
            installments,
        }
    }

    #[rstest]
    #[case("Notebook (2/3)", "Notebook")]
    #[case("Notebook  (10/12) ", "Notebook")]
    #[case("Notebook", "Notebook")]
    #[case("Gift (for mom)", "Gift (for mom)")]
    #[case("(1/2)", "")]
    fn test_strip_suffix(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_suffix(input), expected);
    }

    #[test]
    fn test_expand_credit_series() {
        let series = SeriesId::new();
        let records = expand(&draft(dec!(1000), 3), series).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].description, "Notebook (1/3)");
        assert_eq!(records[2].description, "Notebook (3/3)");
        assert_eq!(records[1].date, date(2024, 2, 29));
        assert_eq!(records[2].date, date(2024, 3, 31));
        assert!(records.iter().all(|r| r.amount == dec!(333.33)));
        assert!(records.iter().all(|r| r.series_id == series && !r.paid));
    }

    #[test]
    fn test_expand_split_divides_my_share() {
        let mut input = draft(dec!(300), 3);
        input.category = CategoryDraft::Split {
            counterparty: " Bruno ".into(),
            my_share_total: dec!(100),
        };
        let records = expand(&input, SeriesId::new()).unwrap();
        assert_eq!(
            records[0].category,
            ExpenseCategory::Split {
                counterparty: "Bruno".into(),
                my_share: dec!(33.33)
            }
        );
        assert_eq!(records[0].my_share(), dec!(33.33));
    }

    #[rstest]
    #[case(PaymentKind::Debit, CategoryDraft::Personal)]
    #[case(PaymentKind::Credit, CategoryDraft::Fixed { due_day: 10 })]
    fn test_single_record_cases(#[case] kind: PaymentKind, #[case] category: CategoryDraft) {
        let mut input = draft(dec!(120), 6);
        input.kind = kind;
        input.category = category;
        let records = expand(&input, SeriesId::new()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, dec!(120));
        assert_eq!(records[0].description, "Notebook");
        assert_eq!(records[0].paid, kind == PaymentKind::Debit);
    }

    #[test]
    fn test_resize_three_to_one() {
        let mut records = expand(&draft(dec!(900), 3), SeriesId::new()).unwrap();
        let edited = records[1].clone();
        let mut edit = draft(dec!(900), 1);
        edit.description = edited.description.clone();
        edit.date = edited.date;

        let changes = plan_resize(&records, &edited, &edit).unwrap();
        apply_changes(&mut records, &changes);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ordinal, 1);
        assert_eq!(records[0].amount, dec!(900));
        assert_eq!(records[0].description, "Notebook");
        assert_eq!(records[0].date, date(2024, 1, 29));
    }

    #[test]
    fn test_resize_keeps_uneven_total() {
        let mut records = expand(&draft(dec!(1000), 3), SeriesId::new()).unwrap();

        let mut shrink = ExpenseDraft::from_record(&records[0]);
        shrink.installments = 1;
        let changes = plan_resize(&records, &records[0].clone(), &shrink).unwrap();
        apply_changes(&mut records, &changes);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, dec!(1000));

        let mut grow = ExpenseDraft::from_record(&records[0]);
        grow.installments = 3;
        let changes = plan_resize(&records, &records[0].clone(), &grow).unwrap();
        apply_changes(&mut records, &changes);
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.amount == dec!(333.33)));
        assert!(records.iter().all(|r| r.series_total == Some(dec!(1000))));
        assert_eq!(ExpenseDraft::from_record(&records[2]).total, dec!(1000));
    }

    #[test]
    fn test_resize_grows_and_keeps_paid_flags() {
        let mut records = expand(&draft(dec!(200), 2), SeriesId::new()).unwrap();
        records[0].paid = true;
        records[0].paid_on = Some(date(2024, 2, 5));
        let edited = records[0].clone();
        let mut edit = draft(dec!(200), 4);
        edit.description = edited.description.clone();

        let changes = plan_resize(&records, &edited, &edit).unwrap();
        assert_eq!(
            changes
                .iter()
                .filter(|c| matches!(c, SeriesChange::Create(_)))
                .count(),
            2
        );
        apply_changes(&mut records, &changes);
        records.sort_by_key(|r| r.ordinal);

        assert_eq!(records.len(), 4);
        assert!(records[0].paid);
        assert_eq!(records[0].paid_on, Some(date(2024, 2, 5)));
        assert!(records[1..].iter().all(|r| !r.paid));
        assert!(records.iter().all(|r| r.amount == dec!(50)));
        assert_eq!(records[3].description, "Notebook (4/4)");
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut records = expand(&draft(dec!(600), 3), SeriesId::new()).unwrap();
        let edited = records[2].clone();
        let mut edit = draft(dec!(600), 5);
        edit.date = edited.date;

        let first = plan_resize(&records, &edited, &edit).unwrap();
        apply_changes(&mut records, &first);
        let edited = records.iter().find(|r| r.id == edited.id).unwrap().clone();
        let second = plan_resize(&records, &edited, &edit).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn test_duplicate_ordinals_are_collapsed() {
        let mut records = expand(&draft(dec!(100), 2), SeriesId::new()).unwrap();
        let mut stray = records[1].clone();
        stray.id = ExpenseId::new();
        records.push(stray.clone());
        let edited = records[0].clone();

        let changes = plan_resize(&records, &edited, &draft(dec!(100), 2)).unwrap();
        assert!(changes.contains(&SeriesChange::Delete(stray.id)));
    }

    #[test]
    fn test_switching_to_debit_marks_paid() {
        let records = expand(&draft(dec!(100), 2), SeriesId::new()).unwrap();
        let mut edit = draft(dec!(100), 2);
        edit.kind = PaymentKind::Debit;

        let changes = plan_resize(&records, &records[0], &edit).unwrap();
        let updated = changes
            .iter()
            .find_map(|c| match c {
                SeriesChange::Update { record, .. } => Some(record),
                _ => None,
            })
            .unwrap();
        assert!(updated.paid);
        assert_eq!(updated.paid_on, Some(updated.date));
        assert!(changes.contains(&SeriesChange::Delete(records[1].id)));
    }
}
