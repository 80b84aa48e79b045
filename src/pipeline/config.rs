//! Explicit run configuration threaded through every stage entry point.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{PipelineError, Result};

/// Default seed for the train/test split and the classifier
pub const DEFAULT_SEED: u64 = 123;

/// Fraction of cleaned rows held out for evaluation
pub const DEFAULT_TEST_FRACTION: f64 = 0.3;

/// Inclusive lower/upper bound for a numeric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Documented value ranges for the physical measurements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeBounds {
    pub height_cm: Bounds,
    pub weight_kg: Bounds,
}

impl Default for RangeBounds {
    fn default() -> Self {
        Self {
            height_cm: Bounds::new(155.0, 210.0),
            weight_kg: Bounds::new(55.0, 125.0),
        }
    }
}

/// How the "more left- than right-handed shooters" check is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelBalanceCheck {
    Off,
    /// Log a warning when the majority assumption does not hold
    #[default]
    Warn,
    /// Fail the stage when the majority assumption does not hold
    Enforce,
}

impl std::fmt::Display for LabelBalanceCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelBalanceCheck::Off => write!(f, "off"),
            LabelBalanceCheck::Warn => write!(f, "warn"),
            LabelBalanceCheck::Enforce => write!(f, "enforce"),
        }
    }
}

impl std::str::FromStr for LabelBalanceCheck {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" => Ok(LabelBalanceCheck::Off),
            "warn" => Ok(LabelBalanceCheck::Warn),
            "enforce" => Ok(LabelBalanceCheck::Enforce),
            _ => Err(format!(
                "Unknown label balance check: '{}'. Use 'off', 'warn' or 'enforce'.",
                s
            )),
        }
    }
}

/// Hyperparameters of the logistic regression classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Inverse L2 regularization strength
    pub c: f64,
    pub max_iter: usize,
    /// Stop once the largest gradient component falls below this
    pub tol: f64,
    /// Weight each class inversely to its frequency
    pub balanced: bool,
    /// Recorded in the saved pipeline for provenance only; Newton fitting
    /// is deterministic and never draws from it
    pub random_state: u64,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 100,
            tol: 1e-6,
            balanced: true,
            random_state: DEFAULT_SEED,
        }
    }
}

/// Formatting applied when tables are written to disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Digits after the decimal point for float columns; `None` writes full precision
    pub float_precision: Option<usize>,
}

/// Complete configuration for a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub seed: u64,
    pub test_fraction: f64,
    pub bounds: RangeBounds,
    pub label_balance: LabelBalanceCheck,
    /// Largest acceptable |correlation| between any feature and the label
    pub max_feature_label_correlation: f64,
    /// Rows used for CSV schema inference (0 scans the whole file)
    pub infer_schema_length: usize,
    pub classifier: ClassifierParams,
    pub output: OutputOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            test_fraction: DEFAULT_TEST_FRACTION,
            bounds: RangeBounds::default(),
            label_balance: LabelBalanceCheck::default(),
            max_feature_label_correlation: 0.9,
            infer_schema_length: 10_000,
            classifier: ClassifierParams::default(),
            output: OutputOptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file; omitted fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(PipelineError::not_found("Config file does not exist.", path));
        }
        let text = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(PipelineError::Value(format!(
                "test_fraction must be strictly between 0 and 1, got {}",
                self.test_fraction
            )));
        }
        for (name, b) in [
            ("height_cm", self.bounds.height_cm),
            ("weight_kg", self.bounds.weight_kg),
        ] {
            if !(b.min <= b.max) {
                return Err(PipelineError::Value(format!(
                    "bounds.{} min ({}) must not exceed max ({})",
                    name, b.min, b.max
                )));
            }
        }
        let ceiling = self.max_feature_label_correlation;
        if !(ceiling > 0.0 && ceiling <= 1.0) {
            return Err(PipelineError::Value(format!(
                "max_feature_label_correlation must be in (0, 1], got {}",
                ceiling
            )));
        }
        if !(self.classifier.c > 0.0 && self.classifier.c.is_finite()) {
            return Err(PipelineError::Value(format!(
                "classifier.c must be positive, got {}",
                self.classifier.c
            )));
        }
        if !(self.classifier.tol > 0.0 && self.classifier.tol.is_finite()) {
            return Err(PipelineError::Value(format!(
                "classifier.tol must be positive, got {}",
                self.classifier.tol
            )));
        }
        if self.classifier.max_iter == 0 {
            return Err(PipelineError::Value(
                "classifier.max_iter must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
