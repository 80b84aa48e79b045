//! Validation report for a preprocessing run
//!
//! Records which raw rows were excluded and why, so that rows never vanish
//! silently between the raw file and the train/test splits.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{CleaningStats, InvalidRow, PipelineConfig, RangeBounds};

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ValidationMetadata {
    pub timestamp: String,
    pub rosterfit_version: String,
    pub input_file: String,
    pub seed: u64,
    pub test_fraction: f64,
    pub bounds: RangeBounds,
}

/// Complete validation report
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub metadata: ValidationMetadata,
    pub stats: CleaningStats,
    /// Excluded row count per column that failed
    pub excluded_by_column: BTreeMap<String, usize>,
    pub invalid_rows: Vec<InvalidRow>,
}

impl ValidationReport {
    pub fn new(
        input_file: &Path,
        config: &PipelineConfig,
        stats: &CleaningStats,
        invalid_rows: &[InvalidRow],
    ) -> Self {
        let mut excluded_by_column = BTreeMap::new();
        for row in invalid_rows {
            *excluded_by_column.entry(row.column.clone()).or_insert(0) += 1;
        }

        Self {
            metadata: ValidationMetadata {
                timestamp: Utc::now().to_rfc3339(),
                rosterfit_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: input_file.display().to_string(),
                seed: config.seed,
                test_fraction: config.test_fraction,
                bounds: config.bounds,
            },
            stats: stats.clone(),
            excluded_by_column,
            invalid_rows: invalid_rows.to_vec(),
        }
    }
}

/// Export the validation report to a JSON file
pub fn export_validation_report(report: &ValidationReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize validation report to JSON")?;

    std::fs::write(output_path, json).with_context(|| {
        format!(
            "Failed to write validation report to {}",
            output_path.display()
        )
    })?;

    Ok(())
}
