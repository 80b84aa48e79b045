//! Guarded CSV writer and dataframe summary tables (info, describe, head)

use std::path::{Path, PathBuf};

use polars::prelude::*;

use crate::pipeline::{column_as_f64, OutputOptions, PipelineError, Result};

/// Rows kept in the head table
const HEAD_ROWS: usize = 5;

/// Statistic names, in the order they appear in the describe table
const DESCRIBE_STATS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Write a table to `<directory>/<filename>` as CSV.
///
/// Refuses a missing directory, a filename that does not end in `.csv`, and
/// a table without records, in that order. `keep_index` prepends the row
/// position as an `index` column.
pub fn write_csv(
    df: &DataFrame,
    directory: &Path,
    filename: &str,
    keep_index: bool,
    options: &OutputOptions,
) -> Result<PathBuf> {
    if !directory.is_dir() {
        return Err(PipelineError::not_found("Directory does not exist.", directory));
    }
    if !filename.ends_with(".csv") {
        return Err(PipelineError::Value("Filename must end with '.csv'.".to_string()));
    }
    if df.width() == 0 || df.height() == 0 {
        return Err(PipelineError::Value("Dataframe must have records.".to_string()));
    }

    let mut out = if keep_index {
        df.with_row_index("index".into(), None)?
    } else {
        df.clone()
    };

    let path = directory.join(filename);
    let mut file = std::fs::File::create(&path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_float_precision(options.float_precision)
        .finish(&mut out)?;

    tracing::debug!(path = %path.display(), rows = out.height(), "table written");
    Ok(path)
}

/// Per-column name, non-null count, null count and type
pub fn info_table(df: &DataFrame) -> Result<DataFrame> {
    let columns = df.get_columns();
    let names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
    let nulls: Vec<u64> = columns.iter().map(|c| c.null_count() as u64).collect();
    let non_nulls: Vec<u64> = columns
        .iter()
        .map(|c| (c.len() - c.null_count()) as u64)
        .collect();
    let types: Vec<String> = columns.iter().map(|c| c.dtype().to_string()).collect();

    Ok(DataFrame::new(vec![
        Column::new("name".into(), names),
        Column::new("non-nulls".into(), non_nulls),
        Column::new("nulls".into(), nulls),
        Column::new("type".into(), types),
    ])?)
}

/// Count, mean, sample std, min, quartiles and max of every numeric column.
///
/// Quartiles use linear interpolation between order statistics. When the
/// table has no numeric column, only counts are reported for every column.
pub fn describe_table(df: &DataFrame) -> Result<DataFrame> {
    let numeric: Vec<&Column> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype().is_primitive_numeric())
        .collect();

    if numeric.is_empty() {
        let mut columns = vec![Column::new("statistic".into(), ["count"])];
        for c in df.get_columns() {
            columns.push(Column::new(
                c.name().clone(),
                [(c.len() - c.null_count()) as f64],
            ));
        }
        return Ok(DataFrame::new(columns)?);
    }

    let mut columns = vec![Column::new("statistic".into(), DESCRIBE_STATS)];
    for c in numeric {
        let mut values: Vec<f64> = column_as_f64(df, c.name().as_str())?
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        columns.push(Column::new(c.name().clone(), describe_values(&values)));
    }
    Ok(DataFrame::new(columns)?)
}

fn describe_values(sorted: &[f64]) -> Vec<Option<f64>> {
    let n = sorted.len();
    if n == 0 {
        let mut stats = vec![None; DESCRIBE_STATS.len()];
        stats[0] = Some(0.0);
        return stats;
    }

    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        Some((ss / (n - 1) as f64).sqrt())
    } else {
        None
    };

    vec![
        Some(n as f64),
        Some(mean),
        std,
        Some(sorted[0]),
        Some(quantile(sorted, 0.25)),
        Some(quantile(sorted, 0.5)),
        Some(quantile(sorted, 0.75)),
        Some(sorted[n - 1]),
    ]
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// A summary table ready to be written, with its file name
#[derive(Debug, Clone)]
pub struct SummaryTable {
    pub filename: &'static str,
    pub table: DataFrame,
    pub keep_index: bool,
}

fn check_describable(df: &DataFrame) -> Result<()> {
    if let Some(nested) = df
        .get_columns()
        .iter()
        .find(|c| matches!(c.dtype(), DataType::List(_) | DataType::Array(..) | DataType::Struct(_)))
    {
        return Err(PipelineError::Type(format!(
            "Summary tables need a flat table; column '{}' has nested type {}",
            nested.name(),
            nested.dtype()
        )));
    }
    if df.width() == 0 {
        return Err(PipelineError::Value(
            "Cannot describe a DataFrame without columns".to_string(),
        ));
    }
    Ok(())
}

/// Build the info, describe and head tables without writing anything.
pub fn build_summary_tables(df: &DataFrame) -> Result<Vec<SummaryTable>> {
    check_describable(df)?;

    let tables = vec![
        SummaryTable {
            filename: "df_info.csv",
            table: info_table(df)?,
            keep_index: false,
        },
        SummaryTable {
            filename: "df_describe.csv",
            table: describe_table(df)?,
            keep_index: false,
        },
        SummaryTable {
            filename: "df_head.csv",
            table: df.head(Some(HEAD_ROWS)),
            keep_index: true,
        },
    ];

    if tables.iter().any(|t| t.table.height() == 0) {
        return Err(PipelineError::Value(
            "Cannot describe a DataFrame without records".to_string(),
        ));
    }
    Ok(tables)
}

/// Write built summary tables into `directory`.
pub fn write_built_tables(
    tables: &[SummaryTable],
    directory: &Path,
    options: &OutputOptions,
) -> Result<Vec<PathBuf>> {
    tables
        .iter()
        .map(|t| write_csv(&t.table, directory, t.filename, t.keep_index, options))
        .collect()
}

/// Write `df_info.csv`, `df_describe.csv` and `df_head.csv` into `directory`.
///
/// All three tables are built before anything is written.
pub fn write_summary_tables(
    df: &DataFrame,
    directory: &Path,
    options: &OutputOptions,
) -> Result<Vec<PathBuf>> {
    check_describable(df)?;
    if !directory.is_dir() {
        return Err(PipelineError::not_found("Directory does not exist.", directory));
    }
    let tables = build_summary_tables(df)?;
    write_built_tables(&tables, directory, options)
}
