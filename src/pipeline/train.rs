//! Fit-then-predict pipeline: frozen scaler followed by logistic regression
//!
//! The pipeline moves through three states, each a distinct type:
//! `UnfitPipeline` → `FittedPipeline` → `EvaluatedPipeline`. Transitions
//! consume the previous state, so retraining always starts from a new
//! `UnfitPipeline`.

use std::path::Path;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::config::ClassifierParams;
use super::error::{PipelineError, Result};
use super::model::{accuracy, feature_matrix, LogisticRegression};
use super::scaler::FeatureScaler;

/// Version written into every serialized pipeline
pub const PIPELINE_FORMAT_VERSION: u32 = 1;

/// 2x2 confusion counts; "positive" means shoots left
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(predicted: &[bool], actual: &[bool]) -> Self {
        let mut cm = ConfusionMatrix::default();
        for (&p, &a) in predicted.iter().zip(actual.iter()) {
            match (a, p) {
                (false, false) => cm.true_negative += 1,
                (false, true) => cm.false_positive += 1,
                (true, false) => cm.false_negative += 1,
                (true, true) => cm.true_positive += 1,
            }
        }
        cm
    }

    pub fn total(&self) -> usize {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    /// Counts as `[actual][predicted]` with index 0 = right, 1 = left
    pub fn as_grid(&self) -> [[usize; 2]; 2] {
        [
            [self.true_negative, self.false_positive],
            [self.false_negative, self.true_positive],
        ]
    }
}

/// Scaler plus classifier hyperparameters, not yet trained
#[derive(Debug, Clone)]
pub struct UnfitPipeline {
    scaler: FeatureScaler,
    params: ClassifierParams,
}

impl UnfitPipeline {
    pub fn new(scaler: FeatureScaler, params: ClassifierParams) -> Self {
        Self { scaler, params }
    }

    /// Standardize the training features and fit the classifier.
    pub fn fit(self, x_train: &DataFrame, y_train: &Series) -> Result<FittedPipeline> {
        let scaled = self.scaler.transform(x_train)?;
        let x = feature_matrix(&scaled)?;
        let y = labels(y_train, "y_train")?;
        let classifier = LogisticRegression::fit(&x, &y, &self.params)?;

        tracing::info!(
            n_iter = classifier.n_iter,
            converged = classifier.converged,
            coefficients = ?classifier.coefficients,
            intercept = classifier.intercept,
            "fitted logistic regression"
        );

        Ok(FittedPipeline {
            format_version: PIPELINE_FORMAT_VERSION,
            scaler: self.scaler,
            classifier,
        })
    }
}

/// A trained pipeline, ready to score and serialize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPipeline {
    pub format_version: u32,
    pub scaler: FeatureScaler,
    pub classifier: LogisticRegression,
}

impl FittedPipeline {
    pub fn predict(&self, x: &DataFrame) -> Result<Vec<bool>> {
        let scaled = self.scaler.transform(x)?;
        self.classifier.predict(&feature_matrix(&scaled)?)
    }

    pub fn predict_proba(&self, x: &DataFrame) -> Result<Vec<f64>> {
        let scaled = self.scaler.transform(x)?;
        self.classifier.predict_proba(&feature_matrix(&scaled)?)
    }

    /// Fraction of rows whose predicted label matches `y`.
    pub fn score(&self, x: &DataFrame, y: &Series) -> Result<f64> {
        let actual = labels(y, "y")?;
        let predicted = self.predict(x)?;
        Ok(accuracy(&predicted, &actual))
    }

    pub fn confusion_matrix(&self, x: &DataFrame, y: &Series) -> Result<ConfusionMatrix> {
        let actual = labels(y, "y")?;
        let predicted = self.predict(x)?;
        Ok(ConfusionMatrix::from_predictions(&predicted, &actual))
    }

    /// Score on held-out data; the pipeline becomes read-only.
    pub fn evaluate(self, x_test: &DataFrame, y_test: &Series) -> Result<EvaluatedPipeline> {
        let accuracy = self.score(x_test, y_test)?;
        Ok(EvaluatedPipeline {
            pipeline: self,
            accuracy,
        })
    }

    /// Serialize the artifact as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(PipelineError::not_found("Pipeline artifact does not exist.", path));
        }
        let file = std::fs::File::open(path)?;
        let pipeline: FittedPipeline = serde_json::from_reader(std::io::BufReader::new(file))?;
        if pipeline.format_version != PIPELINE_FORMAT_VERSION {
            return Err(PipelineError::ArtifactVersion {
                artifact: "pipeline",
                found: pipeline.format_version,
                expected: PIPELINE_FORMAT_VERSION,
                path: path.to_path_buf(),
            });
        }
        Ok(pipeline)
    }
}

/// Terminal state: a fitted pipeline and its held-out accuracy
#[derive(Debug, Clone)]
pub struct EvaluatedPipeline {
    pipeline: FittedPipeline,
    accuracy: f64,
}

impl EvaluatedPipeline {
    pub fn pipeline(&self) -> &FittedPipeline {
        &self.pipeline
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn into_parts(self) -> (FittedPipeline, f64) {
        (self.pipeline, self.accuracy)
    }
}

/// Validate inputs, fit on the training data and score on the test data.
///
/// Checks run before any computation, in this order: feature tables must be
/// numeric and labels boolean (type errors), nothing may be empty and the
/// train/test tables must have the same number of columns (shape errors),
/// and the scaler must have been fitted on the same feature set (schema error).
pub fn fit_and_evaluate(
    x_train: &DataFrame,
    y_train: &Series,
    x_test: &DataFrame,
    y_test: &Series,
    preprocessor: FeatureScaler,
    params: &ClassifierParams,
) -> Result<(FittedPipeline, f64)> {
    check_feature_table(x_train, "x_train")?;
    check_feature_table(x_test, "x_test")?;
    check_label_series(y_train, "y_train")?;
    check_label_series(y_test, "y_test")?;

    if x_train.width() == 0 || x_train.height() == 0 || y_train.is_empty() {
        return Err(PipelineError::Shape(
            "x_train and y_train cannot be empty.".to_string(),
        ));
    }
    if x_test.width() == 0 || x_test.height() == 0 || y_test.is_empty() {
        return Err(PipelineError::Shape(
            "x_test and y_test cannot be empty.".to_string(),
        ));
    }
    if x_train.width() != x_test.width() {
        return Err(PipelineError::Shape(format!(
            "The number of features in x_train ({}) and x_test ({}) must match.",
            x_train.width(),
            x_test.width()
        )));
    }
    if x_train.height() != y_train.len() {
        return Err(PipelineError::Shape(format!(
            "x_train has {} rows but y_train has {} labels",
            x_train.height(),
            y_train.len()
        )));
    }
    if x_test.height() != y_test.len() {
        return Err(PipelineError::Shape(format!(
            "x_test has {} rows but y_test has {} labels",
            x_test.height(),
            y_test.len()
        )));
    }
    preprocessor.check_features(x_train)?;

    let evaluated = UnfitPipeline::new(preprocessor, *params)
        .fit(x_train, y_train)?
        .evaluate(x_test, y_test)?;

    tracing::info!(accuracy = evaluated.accuracy(), "evaluated on held-out data");
    Ok(evaluated.into_parts())
}

fn check_feature_table(df: &DataFrame, name: &str) -> Result<()> {
    if let Some(column) = df
        .get_columns()
        .iter()
        .find(|c| !c.dtype().is_primitive_numeric())
    {
        return Err(PipelineError::Type(format!(
            "{} must be a numeric feature table; column '{}' has type {}",
            name,
            column.name(),
            column.dtype()
        )));
    }
    Ok(())
}

fn check_label_series(series: &Series, name: &str) -> Result<()> {
    if series.dtype() != &DataType::Boolean {
        return Err(PipelineError::Type(format!(
            "{} must be a boolean label series, found {}",
            name,
            series.dtype()
        )));
    }
    Ok(())
}

fn labels(series: &Series, name: &str) -> Result<Vec<bool>> {
    check_label_series(series, name)?;
    let values: Option<Vec<bool>> = series.bool()?.into_iter().collect();
    values.ok_or_else(|| PipelineError::Value(format!("{} contains missing labels", name)))
}
