//! Property tests for metric detection

use proptest::prelude::*;
use stat_schema::{CellValue, Dataset, Schema, MIN_FINITE_VALUES};

const COLUMNS: &[&str] = &[
    "player_id",
    "player_display_name",
    "team",
    "season",
    "week",
    "position",
    "passing_yards",
    "targets",
    "misc_a",
    "misc_b",
];

fn cell() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Null),
        (-50i64..50).prop_map(|n| CellValue::Number(n as f64)),
        (0i64..3).prop_map(|n| CellValue::Number(n as f64)),
        Just(CellValue::Number(f64::NAN)),
        "[a-z]{1,4}".prop_map(CellValue::Text),
    ]
}

fn dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::vec(prop::collection::vec(cell(), COLUMNS.len()), 0..24)
        .prop_map(|rows| Dataset::new(COLUMNS.iter().map(|s| s.to_string()).collect(), rows))
}

proptest! {
    #[test]
    fn metrics_exclude_canonical_columns(ds in dataset()) {
        let schema = Schema::discover(&ds);
        for metric in &schema.metrics {
            prop_assert!(!schema.fields.claims(metric), "{} is canonical", metric);
        }
    }

    #[test]
    fn sparse_columns_never_become_metrics(ds in dataset()) {
        let schema = Schema::discover(&ds);
        for metric in &schema.metrics {
            let finite = ds.column_values(metric).filter(|v| v.finite_number().is_some()).count();
            prop_assert!(finite >= MIN_FINITE_VALUES);
        }
    }

    #[test]
    fn discovery_is_deterministic(ds in dataset()) {
        prop_assert_eq!(Schema::discover(&ds), Schema::discover(&ds));
    }

    #[test]
    fn player_id_always_resolves(ds in dataset()) {
        let schema = Schema::discover(&ds);
        prop_assert_eq!(schema.fields.player_id(), "player_id");
    }
}
