//! Row cleaning: deduplication, field selection, null removal and labeling

use polars::prelude::*;

use super::error::{PipelineError, Result};
use super::loader::{column_as_str, ROW_ID};
use super::schema::{HANDEDNESS_COLUMN, HEIGHT_COLUMN, LEFT_CODE, RIGHT_CODE, WEIGHT_COLUMN};

/// Name of the derived binary target
pub const LABEL_COLUMN: &str = "shoots_left";

/// Drop exact-duplicate rows, keeping the first occurrence.
///
/// The `row_id` tag is ignored when comparing rows, since it is unique by
/// construction. Returns the deduplicated frame and the number of rows removed.
pub fn drop_duplicate_rows(df: &DataFrame) -> Result<(DataFrame, usize)> {
    let data_columns: Vec<String> = df
        .get_column_names()
        .iter()
        .filter(|name| name.as_str() != ROW_ID)
        .map(|name| name.to_string())
        .collect();

    let unique =
        df.unique_stable(Some(data_columns.as_slice()), UniqueKeepStrategy::First, None)?;
    let removed = df.height() - unique.height();
    Ok((unique, removed))
}

/// Keep only the fields the classifier needs (plus the row tag, if present).
pub fn select_model_fields(df: &DataFrame) -> Result<DataFrame> {
    let mut fields = Vec::with_capacity(4);
    if df.column(ROW_ID).is_ok() {
        fields.push(ROW_ID);
    }
    fields.extend([WEIGHT_COLUMN, HEIGHT_COLUMN, HANDEDNESS_COLUMN]);

    for field in &fields {
        if df.column(field).is_err() {
            return Err(PipelineError::Schema(format!(
                "Missing expected column '{}'",
                field
            )));
        }
    }
    Ok(df.select(fields)?)
}

/// Drop rows with a null in any of the model fields.
///
/// Returns the complete rows and the number of rows dropped.
pub fn drop_incomplete_rows(df: &DataFrame) -> Result<(DataFrame, usize)> {
    let mut mask = BooleanChunked::full("complete".into(), true, df.height());
    for field in [WEIGHT_COLUMN, HEIGHT_COLUMN, HANDEDNESS_COLUMN] {
        let column = df.column(field)?;
        mask = &mask & &column.is_not_null();
    }
    let complete = df.filter(&mask)?;
    let dropped = df.height() - complete.height();
    Ok((complete, dropped))
}

/// Replace the raw `shoots_catches` code with a boolean `shoots_left` label.
///
/// `L` maps to `true`, `R` to `false`; any other code is a schema error.
pub fn derive_label(df: &DataFrame) -> Result<DataFrame> {
    let codes = column_as_str(df, HANDEDNESS_COLUMN)?;

    let mut labels = Vec::with_capacity(codes.len());
    for (i, code) in codes.iter().enumerate() {
        match code.as_deref() {
            Some(LEFT_CODE) => labels.push(true),
            Some(RIGHT_CODE) => labels.push(false),
            other => {
                return Err(PipelineError::Schema(format!(
                    "Unrecognized handedness code {:?} at position {}; expected '{}' or '{}'",
                    other, i, LEFT_CODE, RIGHT_CODE
                )))
            }
        }
    }

    let mut labeled = df.drop(HANDEDNESS_COLUMN)?;
    labeled.with_column(Column::new(LABEL_COLUMN.into(), labels))?;
    Ok(labeled)
}
