//! Dataset loader for CSV and Parquet files

use std::path::Path;

use polars::prelude::*;

use super::error::{PipelineError, Result};

/// Name of the column holding the zero-based position of each raw row
pub const ROW_ID: &str = "row_id";

/// Load a dataset from a file (CSV or Parquet based on extension).
///
/// `infer_schema_length` of 0 scans the whole CSV for schema inference.
/// A missing input is reported as a not-found error rather than a parse error.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(PipelineError::not_found("Input file does not exist.", path));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length)
            .finish()?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())?,
        _ => {
            return Err(PipelineError::Value(format!(
                "Unsupported file format: '{}'. Supported formats: csv, parquet",
                extension
            )))
        }
    };

    let df = lf.collect()?;
    tracing::debug!(path = %path.display(), rows = df.height(), cols = df.width(), "dataset loaded");
    Ok(df)
}

/// Attach a `row_id` column so rows can be reported after filtering.
pub fn tag_rows(df: &DataFrame) -> Result<DataFrame> {
    Ok(df.with_row_index(ROW_ID.into(), None)?)
}

/// Read row identifiers back out of a tagged frame.
pub fn row_ids(df: &DataFrame) -> Result<Vec<u64>> {
    let ids = df.column(ROW_ID)?.cast(&DataType::UInt64)?;
    Ok(ids.u64()?.into_iter().flatten().collect())
}

/// Collect a column as `f64`, casting integers and keeping nulls.
pub fn column_as_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .map_err(|_| PipelineError::Schema(format!("Column '{}' not found", name)))?;
    // Null-only columns come out of CSV inference typed as String
    let all_null = column.null_count() == column.len();
    if !column.dtype().is_primitive_numeric() && !all_null {
        return Err(PipelineError::Type(format!(
            "Column '{}' must be numeric, found {}",
            name,
            column.dtype()
        )));
    }
    let cast = column.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

/// Collect a column as strings, keeping nulls.
pub fn column_as_str(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| PipelineError::Schema(format!("Column '{}' not found", name)))?;
    let cast = column.cast(&DataType::String)?;
    Ok(cast
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}
