//! Schema validation for raw roster data
//!
//! Two checks run here. Column names are checked up front and fail fast.
//! Value ranges are checked per row after cleaning: rows outside the
//! documented bounds are excluded and reported, never silently dropped.

use std::collections::HashSet;

use polars::prelude::*;
use serde::Serialize;

use super::config::RangeBounds;
use super::error::{PipelineError, Result};
use super::loader::{column_as_f64, column_as_str, row_ids};

/// Every column the raw roster file is expected to carry
pub const EXPECTED_COLUMNS: [&str; 18] = [
    "team_code",
    "season",
    "position_type",
    "player_id",
    "headshot",
    "first_name",
    "last_name",
    "sweater_number",
    "position_code",
    "shoots_catches",
    "height_in_inches",
    "weight_in_pounds",
    "height_in_centimeters",
    "weight_in_kilograms",
    "birth_date",
    "birth_city",
    "birth_country",
    "birth_state_province",
];

pub const WEIGHT_COLUMN: &str = "weight_in_kilograms";
pub const HEIGHT_COLUMN: &str = "height_in_centimeters";
pub const HANDEDNESS_COLUMN: &str = "shoots_catches";

/// Numeric features fed to the classifier, in model order
pub const NUMERIC_FEATURES: [&str; 2] = [WEIGHT_COLUMN, HEIGHT_COLUMN];

/// Raw handedness codes and the label each maps to
pub const LEFT_CODE: &str = "L";
pub const RIGHT_CODE: &str = "R";

/// Check the raw column set: no unknown names, no missing names.
pub fn validate_columns(df: &DataFrame) -> Result<()> {
    let expected: HashSet<&str> = EXPECTED_COLUMNS.iter().copied().collect();
    let actual: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    if let Some(unknown) = actual.iter().find(|c| !expected.contains(c.as_str())) {
        return Err(PipelineError::Schema(format!(
            "Unrecognized column '{}'",
            unknown
        )));
    }

    if let Some(missing) = EXPECTED_COLUMNS
        .iter()
        .find(|c| !actual.iter().any(|a| a == *c))
    {
        return Err(PipelineError::Schema(format!(
            "Missing expected column '{}'",
            missing
        )));
    }

    Ok(())
}

/// Why a row was excluded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    OutOfRange { min: f64, max: f64 },
    UnresolvableHandedness,
    Missing,
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidReason::OutOfRange { min, max } => {
                write!(f, "outside [{}, {}]", min, max)
            }
            InvalidReason::UnresolvableHandedness => {
                write!(f, "not one of '{}' or '{}'", LEFT_CODE, RIGHT_CODE)
            }
            InvalidReason::Missing => write!(f, "missing value"),
        }
    }
}

/// A single excluded row, identified by its position in the raw file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidRow {
    pub row_id: u64,
    pub column: String,
    pub value: Option<String>,
    pub reason: InvalidReason,
}

/// Rows that passed the range checks plus the ones that did not
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub valid: DataFrame,
    pub invalid: Vec<InvalidRow>,
}

impl ValidationOutcome {
    pub fn invalid_row_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.invalid.iter().map(|r| r.row_id).collect();
        ids.dedup();
        ids
    }
}

/// Range-check weight and height and confirm handedness resolves to L/R.
///
/// Expects a frame tagged with `row_id`. A row can fail more than one check;
/// each failure is reported, but the row is excluded once.
pub fn validate_ranges(df: &DataFrame, bounds: &RangeBounds) -> Result<ValidationOutcome> {
    let ids = row_ids(df)?;
    let weights = column_as_f64(df, WEIGHT_COLUMN)?;
    let heights = column_as_f64(df, HEIGHT_COLUMN)?;
    let hands = column_as_str(df, HANDEDNESS_COLUMN)?;

    let mut keep = Vec::with_capacity(df.height());
    let mut invalid = Vec::new();

    for (i, &row_id) in ids.iter().enumerate() {
        let mut row_ok = true;

        for (column, value, b) in [
            (WEIGHT_COLUMN, weights[i], bounds.weight_kg),
            (HEIGHT_COLUMN, heights[i], bounds.height_cm),
        ] {
            let reason = match value {
                None => Some(InvalidReason::Missing),
                Some(v) if !b.contains(v) => Some(InvalidReason::OutOfRange {
                    min: b.min,
                    max: b.max,
                }),
                Some(_) => None,
            };
            if let Some(reason) = reason {
                row_ok = false;
                invalid.push(InvalidRow {
                    row_id,
                    column: column.to_string(),
                    value: value.map(|v| v.to_string()),
                    reason,
                });
            }
        }

        let resolvable = matches!(hands[i].as_deref(), Some(LEFT_CODE) | Some(RIGHT_CODE));
        if !resolvable {
            row_ok = false;
            invalid.push(InvalidRow {
                row_id,
                column: HANDEDNESS_COLUMN.to_string(),
                value: hands[i].clone(),
                reason: InvalidReason::UnresolvableHandedness,
            });
        }

        keep.push(row_ok);
    }

    let mask = BooleanChunked::from_slice("valid".into(), &keep);
    let valid = df.filter(&mask)?;

    if !invalid.is_empty() {
        let excluded = keep.iter().filter(|k| !**k).count();
        tracing::warn!(
            excluded,
            "excluded rows failing range/handedness checks"
        );
        for row in &invalid {
            tracing::warn!(
                row_id = row.row_id,
                column = %row.column,
                value = row.value.as_deref().unwrap_or("null"),
                reason = %row.reason,
                "invalid row"
            );
        }
    }

    if valid.height() == 0 {
        return Err(PipelineError::Schema(format!(
            "No valid rows remain after validation ({} row(s) excluded)",
            df.height()
        )));
    }

    Ok(ValidationOutcome { valid, invalid })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::loader::tag_rows;

    fn raw_frame(extra: Option<&str>, skip: Option<&str>) -> DataFrame {
        let mut columns: Vec<Column> = EXPECTED_COLUMNS
            .iter()
            .filter(|c| Some(**c) != skip)
            .map(|c| Column::new((*c).into(), ["x"]))
            .collect();
        if let Some(name) = extra {
            columns.push(Column::new(name.into(), ["y"]));
        }
        DataFrame::new(columns).unwrap()
    }

    fn model_frame() -> DataFrame {
        let df = df! {
            WEIGHT_COLUMN => [80.0f64, 50.0, 90.0, 100.0],
            HEIGHT_COLUMN => [185.0f64, 180.0, 215.0, 190.0],
            HANDEDNESS_COLUMN => ["L", "R", "L", "X"],
        }
        .unwrap();
        tag_rows(&df).unwrap()
    }

    #[test]
    fn test_expected_columns_pass() {
        assert!(validate_columns(&raw_frame(None, None)).is_ok());
    }

    #[test]
    fn test_unrecognized_column_is_named() {
        let err = validate_columns(&raw_frame(Some("jersey_color"), None)).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
        assert!(err.to_string().contains("jersey_color"));
    }

    #[test]
    fn test_missing_column_is_named() {
        let err = validate_columns(&raw_frame(None, Some("birth_city"))).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
        assert!(err.to_string().contains("birth_city"));
    }

    #[test]
    fn test_range_check_reports_row_ids() {
        let outcome = validate_ranges(&model_frame(), &RangeBounds::default()).unwrap();

        assert_eq!(outcome.valid.height(), 1);
        assert_eq!(outcome.invalid_row_ids(), vec![1, 2, 3]);

        let weight_failure = &outcome.invalid[0];
        assert_eq!(weight_failure.column, WEIGHT_COLUMN);
        assert!(matches!(weight_failure.reason, InvalidReason::OutOfRange { .. }));

        let hand_failure = outcome.invalid.last().unwrap();
        assert_eq!(hand_failure.reason, InvalidReason::UnresolvableHandedness);
        assert_eq!(hand_failure.value.as_deref(), Some("X"));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let df = tag_rows(
            &df! {
                WEIGHT_COLUMN => [55.0f64, 125.0],
                HEIGHT_COLUMN => [155.0f64, 210.0],
                HANDEDNESS_COLUMN => ["L", "R"],
            }
            .unwrap(),
        )
        .unwrap();
        let outcome = validate_ranges(&df, &RangeBounds::default()).unwrap();
        assert_eq!(outcome.valid.height(), 2);
        assert!(outcome.invalid.is_empty());
    }

    #[test]
    fn test_zero_valid_rows_is_fatal() {
        let df = tag_rows(
            &df! {
                WEIGHT_COLUMN => [10.0f64],
                HEIGHT_COLUMN => [100.0f64],
                HANDEDNESS_COLUMN => ["L"],
            }
            .unwrap(),
        )
        .unwrap();
        let err = validate_ranges(&df, &RangeBounds::default()).unwrap_err();
        assert!(err.to_string().contains("No valid rows"));
    }
}
