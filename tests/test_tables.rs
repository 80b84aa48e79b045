//! Tests for the guarded CSV writer and summary tables

use polars::prelude::*;
use rosterfit::pipeline::{ErrorKind, OutputOptions, PipelineError};
use rosterfit::report::{build_summary_tables, write_built_tables, write_csv, write_summary_tables};
use std::path::Path;
use tempfile::TempDir;

fn sample() -> DataFrame {
    df! {
        "weight_in_kilograms" => [80.0f64, 92.0, 85.0],
        "height_in_centimeters" => [183.0f64, 191.0, 186.0],
        "shoots_left" => [true, false, true],
    }
    .unwrap()
}

#[test]
fn test_write_csv_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&sample(), dir.path(), "roster.csv", false, &OutputOptions::default())
        .unwrap();

    let back = CsvReadOptions::default()
        .try_into_reader_with_file_path(Some(path))
        .unwrap()
        .finish()
        .unwrap();
    assert!(back.equals(&sample()));
}

#[test]
fn test_write_csv_keep_index() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&sample(), dir.path(), "indexed.csv", true, &OutputOptions::default())
        .unwrap();

    let text = std::fs::read_to_string(path).unwrap();
    assert!(text.starts_with("index,weight_in_kilograms"));
}

#[test]
fn test_write_csv_float_precision() {
    let dir = TempDir::new().unwrap();
    let df = df! { "accuracy" => [2.0f64 / 3.0] }.unwrap();
    let options = OutputOptions {
        float_precision: Some(2),
    };
    let path = write_csv(&df, dir.path(), "test_scores.csv", false, &options).unwrap();

    let text = std::fs::read_to_string(path).unwrap();
    assert_eq!(text.lines().nth(1), Some("0.67"));
}

#[test]
fn test_write_csv_missing_directory() {
    let err = write_csv(
        &sample(),
        Path::new("/no/such/directory"),
        "roster.csv",
        false,
        &OutputOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("Directory does not exist."));
}

#[test]
fn test_write_csv_bad_extension() {
    let dir = TempDir::new().unwrap();
    let err = write_csv(&sample(), dir.path(), "roster.txt", false, &OutputOptions::default())
        .unwrap_err();
    assert!(matches!(&err, PipelineError::Value(m) if m == "Filename must end with '.csv'."));
    assert!(!dir.path().join("roster.txt").exists());
}

#[test]
fn test_write_csv_empty_table() {
    let dir = TempDir::new().unwrap();
    let empty = sample().head(Some(0));
    let err = write_csv(&empty, dir.path(), "roster.csv", false, &OutputOptions::default())
        .unwrap_err();
    assert!(matches!(&err, PipelineError::Value(m) if m == "Dataframe must have records."));
}

#[test]
fn test_summary_tables_written() {
    let dir = TempDir::new().unwrap();
    let paths = write_summary_tables(&sample(), dir.path(), &OutputOptions::default()).unwrap();

    let names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["df_info.csv", "df_describe.csv", "df_head.csv"]);
    for path in paths {
        assert!(path.exists());
    }
}

#[test]
fn test_summary_tables_zero_columns() {
    let dir = TempDir::new().unwrap();
    let err = write_summary_tables(&DataFrame::empty(), dir.path(), &OutputOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
    assert!(err.to_string().contains("Cannot describe a DataFrame without columns"));
}

#[test]
fn test_summary_tables_nested_column() {
    let dir = TempDir::new().unwrap();
    let nested = Series::new(
        "heights".into(),
        [
            Series::new("".into(), [183.0f64, 191.0]),
            Series::new("".into(), [186.0f64]),
        ],
    );
    let df = DataFrame::new(vec![nested.into()]).unwrap();

    let err = write_summary_tables(&df, dir.path(), &OutputOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
}

#[test]
fn test_summary_tables_missing_directory() {
    let err = write_summary_tables(
        &sample(),
        Path::new("/no/such/directory"),
        &OutputOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_built_tables_written_in_order() {
    let tables = build_summary_tables(&sample()).unwrap();
    let names: Vec<&str> = tables.iter().map(|t| t.filename).collect();
    assert_eq!(names, vec!["df_info.csv", "df_describe.csv", "df_head.csv"]);

    let dir = TempDir::new().unwrap();
    let paths = write_built_tables(&tables, dir.path(), &OutputOptions::default()).unwrap();
    assert_eq!(paths.len(), 3);
    let head = std::fs::read_to_string(&paths[2]).unwrap();
    assert!(head.starts_with("index,"));
}

#[test]
fn test_build_summary_tables_rejects_records_free_table() {
    let err = build_summary_tables(&sample().head(Some(0))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
}
