//! Data quality checks run on the training split before fitting

use polars::prelude::*;
use serde::Serialize;

use super::config::LabelBalanceCheck;
use super::error::{PipelineError, Result};
use super::loader::column_as_f64;

/// How many training rows carry each label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub left: usize,
    pub right: usize,
}

/// Count labels and apply the "more left- than right-handed" assumption.
///
/// The assumption describes the NHL dataset, not the pipeline, so it is only
/// enforced when configured to.
pub fn check_label_balance(labels: &Series, mode: LabelBalanceCheck) -> Result<LabelCounts> {
    let ca = labels
        .bool()
        .map_err(|_| PipelineError::Type("Labels must be a boolean series".to_string()))?;
    let left = ca.into_iter().filter(|v| *v == Some(true)).count();
    let right = ca.into_iter().filter(|v| *v == Some(false)).count();
    let counts = LabelCounts { left, right };

    if left <= right {
        let message = format!(
            "Expected more left-handed than right-handed shooters, found {} left vs {} right",
            left, right
        );
        match mode {
            LabelBalanceCheck::Off => {}
            LabelBalanceCheck::Warn => tracing::warn!("{}", message),
            LabelBalanceCheck::Enforce => return Err(PipelineError::Value(message)),
        }
    }

    Ok(counts)
}

/// Absolute Pearson correlation of each feature with the boolean label.
///
/// Constant features (or a constant label) have no defined correlation and
/// are reported as 0.
pub fn feature_label_correlations(
    features: &DataFrame,
    labels: &Series,
) -> Result<Vec<(String, f64)>> {
    let ca = labels
        .bool()
        .map_err(|_| PipelineError::Type("Labels must be a boolean series".to_string()))?;
    let y: Vec<Option<f64>> = ca
        .into_iter()
        .map(|v| v.map(|b| if b { 1.0 } else { 0.0 }))
        .collect();

    let mut result = Vec::with_capacity(features.width());
    for name in features.get_column_names() {
        let x = column_as_f64(features, name.as_str())?;
        let pairs: Vec<(f64, f64)> = x
            .iter()
            .zip(y.iter())
            .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
            .collect();
        result.push((name.to_string(), pearson(&pairs).abs()));
    }
    Ok(result)
}

/// Fail when any feature predicts the label too well to be believable.
pub fn check_feature_label_correlation(
    features: &DataFrame,
    labels: &Series,
    ceiling: f64,
) -> Result<Vec<(String, f64)>> {
    let correlations = feature_label_correlations(features, labels)?;
    if let Some((name, corr)) = correlations.iter().find(|(_, c)| *c >= ceiling) {
        return Err(PipelineError::Value(format!(
            "Feature-label correlation for '{}' ({:.3}) exceeds the maximum acceptable threshold ({})",
            name, corr, ceiling
        )));
    }
    Ok(correlations)
}

fn pearson(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2 {
        return 0.0;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}
