//! Feature standardization fitted on the training split
//!
//! A `FeatureScaler` is created once from training data and is read-only
//! afterwards: `transform` borrows it immutably, so applying it to test or
//! unseen data can never move the fitted statistics.

use std::collections::HashSet;
use std::path::Path;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, Result};
use super::loader::column_as_f64;

/// Version written into every serialized scaler
pub const SCALER_FORMAT_VERSION: u32 = 1;

/// Mean and population standard deviation of one feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub name: String,
    pub mean: f64,
    pub std: f64,
}

impl FeatureStats {
    /// Divisor used when scaling; constant features are only centered
    fn scale(&self) -> f64 {
        if self.std > 0.0 {
            self.std
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    pub format_version: u32,
    pub features: Vec<FeatureStats>,
    /// Number of training rows the statistics were computed from
    pub n_samples: usize,
}

impl FeatureScaler {
    /// Compute per-feature statistics from the training table.
    pub fn fit(train: &DataFrame, features: &[&str]) -> Result<Self> {
        if features.is_empty() {
            return Err(PipelineError::Shape(
                "Cannot fit a scaler without features".to_string(),
            ));
        }
        if train.height() == 0 {
            return Err(PipelineError::Shape(
                "Cannot fit a scaler on an empty table".to_string(),
            ));
        }

        let mut stats = Vec::with_capacity(features.len());
        for name in features {
            let values = non_null_values(train, name)?;
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            stats.push(FeatureStats {
                name: name.to_string(),
                mean,
                std: variance.sqrt(),
            });
        }

        Ok(Self {
            format_version: SCALER_FORMAT_VERSION,
            features: stats,
            n_samples: train.height(),
        })
    }

    /// Fit on every column of a numeric feature table.
    pub fn fit_all(train: &DataFrame) -> Result<Self> {
        let names: Vec<String> = train
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        Self::fit(train, &refs)
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    /// Fail unless `df` carries exactly the fitted feature set.
    pub fn check_features(&self, df: &DataFrame) -> Result<()> {
        let fitted: HashSet<&str> = self.feature_names().into_iter().collect();
        let given: HashSet<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let given: HashSet<&str> = given.iter().map(|s| s.as_str()).collect();

        if fitted != given {
            let mut missing: Vec<&str> = fitted.difference(&given).copied().collect();
            let mut unexpected: Vec<&str> = given.difference(&fitted).copied().collect();
            missing.sort_unstable();
            unexpected.sort_unstable();
            return Err(PipelineError::Schema(format!(
                "Feature set does not match the fitted scaler (missing: {:?}, unexpected: {:?})",
                missing, unexpected
            )));
        }
        Ok(())
    }

    /// Standardize a table with the fitted statistics.
    ///
    /// Output columns follow the order the scaler was fitted with.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.check_features(df)?;

        let mut columns = Vec::with_capacity(self.features.len());
        for stats in &self.features {
            let scale = stats.scale();
            let scaled: Vec<Option<f64>> = column_as_f64(df, &stats.name)?
                .into_iter()
                .map(|v| v.map(|x| (x - stats.mean) / scale))
                .collect();
            columns.push(Column::new(stats.name.as_str().into(), scaled));
        }
        Ok(DataFrame::new(columns)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(PipelineError::not_found("Preprocessor artifact does not exist.", path));
        }
        let file = std::fs::File::open(path)?;
        let scaler: FeatureScaler = serde_json::from_reader(std::io::BufReader::new(file))?;
        if scaler.format_version != SCALER_FORMAT_VERSION {
            return Err(PipelineError::ArtifactVersion {
                artifact: "preprocessor",
                found: scaler.format_version,
                expected: SCALER_FORMAT_VERSION,
                path: path.to_path_buf(),
            });
        }
        Ok(scaler)
    }
}

fn non_null_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let values: Vec<f64> = column_as_f64(df, name)?.into_iter().flatten().collect();
    if values.is_empty() {
        return Err(PipelineError::Shape(format!(
            "Feature '{}' has no non-null values to fit on",
            name
        )));
    }
    Ok(values)
}
