//! Preprocessing stage: raw roster table to train/test splits and a fitted scaler

use polars::prelude::*;
use serde::Serialize;

use super::clean::{
    derive_label, drop_duplicate_rows, drop_incomplete_rows, select_model_fields, LABEL_COLUMN,
};
use super::config::PipelineConfig;
use super::error::{PipelineError, Result};
use super::loader::{tag_rows, ROW_ID};
use super::scaler::FeatureScaler;
use super::schema::{validate_columns, validate_ranges, InvalidRow, NUMERIC_FEATURES};
use super::split::train_test_split;

/// Row accounting for one preprocessing run
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningStats {
    pub rows_loaded: usize,
    pub duplicates_removed: usize,
    pub incomplete_rows_dropped: usize,
    /// Rows excluded by the range/handedness checks
    pub rows_excluded: usize,
    pub valid_rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Everything the preprocessing stage produces, held in memory until written
#[derive(Debug, Clone)]
pub struct PreprocessOutput {
    pub train: DataFrame,
    pub test: DataFrame,
    pub scaler: FeatureScaler,
    pub invalid_rows: Vec<InvalidRow>,
    pub stats: CleaningStats,
}

/// Validate, clean, label and split the raw table, then fit the scaler on train.
pub fn preprocess(raw: &DataFrame, config: &PipelineConfig) -> Result<PreprocessOutput> {
    config.validate()?;
    validate_columns(raw)?;

    let mut stats = CleaningStats {
        rows_loaded: raw.height(),
        ..Default::default()
    };

    let tagged = tag_rows(raw)?;
    let (unique, duplicates) = drop_duplicate_rows(&tagged)?;
    stats.duplicates_removed = duplicates;

    let selected = select_model_fields(&unique)?;
    let (complete, incomplete) = drop_incomplete_rows(&selected)?;
    stats.incomplete_rows_dropped = incomplete;
    if complete.height() == 0 {
        return Err(PipelineError::Shape(
            "No complete rows remain after dropping missing values".to_string(),
        ));
    }

    let outcome = validate_ranges(&complete, &config.bounds)?;
    stats.rows_excluded = complete.height() - outcome.valid.height();
    stats.valid_rows = outcome.valid.height();

    let labeled = derive_label(&outcome.valid)?;
    let split = train_test_split(&labeled, config.test_fraction, config.seed)?;
    let (train, test) = split.into_parts();
    let train = train.drop(ROW_ID)?;
    let test = test.drop(ROW_ID)?;
    stats.train_rows = train.height();
    stats.test_rows = test.height();

    let scaler = FeatureScaler::fit(&train, &NUMERIC_FEATURES)?;

    tracing::info!(
        rows_loaded = stats.rows_loaded,
        duplicates = stats.duplicates_removed,
        incomplete = stats.incomplete_rows_dropped,
        excluded = stats.rows_excluded,
        train = stats.train_rows,
        test = stats.test_rows,
        "preprocessing complete"
    );

    Ok(PreprocessOutput {
        train,
        test,
        scaler,
        invalid_rows: outcome.invalid,
        stats,
    })
}

/// Split a labeled table into a feature table and the label series.
pub fn split_features_labels(df: &DataFrame) -> Result<(DataFrame, Series)> {
    let labels = df
        .column(LABEL_COLUMN)
        .map_err(|_| PipelineError::Schema(format!("Label column '{}' not found", LABEL_COLUMN)))?
        .as_materialized_series()
        .clone();
    let features = df.drop(LABEL_COLUMN)?;
    Ok((features, labels))
}
