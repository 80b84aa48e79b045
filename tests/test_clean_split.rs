//! Tests for cleaning, labeling and the seeded train/test split

use polars::prelude::*;
use rosterfit::pipeline::*;
use std::collections::HashSet;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_duplicates_removed_before_selection() {
    let raw = create_raw_roster(6);
    let doubled = raw.vstack(&raw.head(Some(2))).unwrap();
    let tagged = tag_rows(&doubled).unwrap();

    let (unique, removed) = drop_duplicate_rows(&tagged).unwrap();
    assert_eq!(removed, 2);
    assert_eq!(unique.height(), 6);
    // First occurrences survive
    assert_eq!(row_ids(&unique).unwrap(), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_rows_differing_outside_model_fields_are_kept() {
    // Same height, weight and hand but different players: not duplicates
    let raw = raw_roster_from(
        &[Some(185), Some(185)],
        &[Some(90), Some(90)],
        &[Some("L"), Some("L")],
    );
    let (unique, removed) = drop_duplicate_rows(&raw).unwrap();
    assert_eq!(removed, 0);
    assert_eq!(unique.height(), 2);
}

#[test]
fn test_incomplete_rows_dropped() {
    let raw = raw_roster_from(
        &[Some(185), None, Some(180)],
        &[Some(90), Some(85), Some(80)],
        &[Some("L"), Some("R"), None],
    );
    let selected = select_model_fields(&raw).unwrap();
    assert_eq!(selected.width(), 3);

    let (complete, dropped) = drop_incomplete_rows(&selected).unwrap();
    assert_eq!(dropped, 2);
    assert_eq!(complete.height(), 1);
}

#[test]
fn test_label_derivation() {
    let raw = raw_roster_from(
        &[Some(185), Some(186)],
        &[Some(90), Some(91)],
        &[Some("L"), Some("R")],
    );
    let labeled = derive_label(&select_model_fields(&raw).unwrap()).unwrap();

    assert!(labeled.column(HANDEDNESS_COLUMN).is_err());
    let labels: Vec<Option<bool>> = labeled
        .column(LABEL_COLUMN)
        .unwrap()
        .bool()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(labels, vec![Some(true), Some(false)]);
}

#[test]
fn test_unknown_handedness_code_fails_labeling() {
    let raw = raw_roster_from(&[Some(185)], &[Some(90)], &[Some("Both")]);
    let err = derive_label(&select_model_fields(&raw).unwrap()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn test_split_disjoint_and_complete() {
    for n in [2usize, 3, 10, 41, 100] {
        let df = tag_rows(&create_raw_roster(n)).unwrap();
        let split = train_test_split(&df, DEFAULT_TEST_FRACTION, DEFAULT_SEED).unwrap();

        let train: HashSet<u64> = row_ids(split.train()).unwrap().into_iter().collect();
        let test: HashSet<u64> = row_ids(split.test()).unwrap().into_iter().collect();

        assert!(train.is_disjoint(&test), "overlap for n = {}", n);
        assert_eq!(train.len() + test.len(), n, "rows lost for n = {}", n);
        assert!(!train.is_empty() && !test.is_empty());
    }
}

#[test]
fn test_split_deterministic_across_runs() {
    let raw = create_raw_roster(60);
    let config = PipelineConfig::default();

    let first = preprocess(&raw, &config).unwrap();
    let second = preprocess(&raw, &config).unwrap();

    assert!(first.train.equals(&second.train));
    assert!(first.test.equals(&second.test));
}

#[test]
fn test_split_sizes() {
    let df = create_raw_roster(20);
    let split = train_test_split(&df, 0.3, 123).unwrap();
    assert_eq!(split.test().height(), 6);
    assert_eq!(split.train().height(), 14);
}
