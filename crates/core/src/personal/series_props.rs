//! Property-based tests for series expansion and resizing.

use chrono::NaiveDate;
use parcela_shared::types::{SeriesId, YearMonth};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::series::{apply_changes, expand, plan_resize};
use super::types::{CategoryDraft, ExpenseDraft};
use crate::instrument::PaymentKind;

fn arb_draft() -> impl Strategy<Value = ExpenseDraft> {
    (1i64..10_000_000, 1u32..=24, 2000i32..2090, 1u32..=12, 1u32..=31).prop_map(
        |(cents, installments, year, month, day)| ExpenseDraft {
            description: "Item".to_string(),
            total: Decimal::new(cents, 2),
            kind: PaymentKind::Credit,
            category: CategoryDraft::Personal,
            date: NaiveDate::from_ymd_opt(year, month, day.min(28)).unwrap_or_default(),
            installments,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A series sums to its total within half a cent per installment.
    #[test]
    fn prop_series_sums_to_total(draft in arb_draft()) {
        let records = expand(&draft, SeriesId::new()).unwrap();
        let sum: Decimal = records.iter().map(|r| r.amount).sum();
        let bound = Decimal::new(5, 3) * Decimal::from(draft.installments);
        prop_assert_eq!(records.len(), draft.installments as usize);
        prop_assert!((sum - draft.total).abs() <= bound);
    }

    /// Resizing leaves exactly N consecutive monthly occurrences, no orphans,
    /// and running the same edit again changes nothing.
    #[test]
    fn prop_resize_leaves_consistent_series(
        draft in arb_draft(),
        new_count in 1u32..=24,
        pick in any::<prop::sample::Index>(),
    ) {
        let series = SeriesId::new();
        let mut records = expand(&draft, series).unwrap();
        let edited = records[pick.index(records.len())].clone();
        let edit = ExpenseDraft {
            description: edited.description.clone(),
            date: edited.date,
            installments: new_count,
            ..draft.clone()
        };

        let changes = plan_resize(&records, &edited, &edit).unwrap();
        apply_changes(&mut records, &changes);
        records.sort_by_key(|r| r.ordinal);

        prop_assert_eq!(records.len(), new_count as usize);
        let first = YearMonth::of(records[0].date);
        for (k, record) in records.iter().enumerate() {
            prop_assert_eq!(record.ordinal as usize, k + 1);
            prop_assert_eq!(record.installments, new_count);
            prop_assert_eq!(record.series_id, series);
            prop_assert_eq!(YearMonth::of(record.date), first.plus_months(i32::try_from(k).unwrap()));
        }

        let edited = records.iter().find(|r| r.id == edited.id).cloned();
        if let Some(edited) = edited {
            prop_assert!(plan_resize(&records, &edited, &edit).unwrap().is_empty());
        }
    }

    /// Any chain of resizes built from the stored records keeps the entered
    /// total: collapsing back to one installment yields it exactly.
    #[test]
    fn prop_resizes_never_lose_value(
        draft in arb_draft(),
        counts in proptest::collection::vec(1u32..=24, 1..5),
    ) {
        let mut records = expand(&draft, SeriesId::new()).unwrap();
        for count in counts.into_iter().chain([1]) {
            records.sort_by_key(|r| r.ordinal);
            let edited = records[0].clone();
            let mut edit = ExpenseDraft::from_record(&edited);
            edit.installments = count;
            let changes = plan_resize(&records, &edited, &edit).unwrap();
            apply_changes(&mut records, &changes);
        }

        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(records[0].amount, draft.total);
    }
}
