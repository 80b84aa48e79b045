//! `rosterfit preprocess`: raw roster file to train/test splits and a fitted scaler

use std::path::Path;

use anyhow::{Context, Result};

use crate::pipeline::{load_dataset, preprocess, PipelineConfig};
use crate::report::{export_validation_report, write_csv, PreprocessSummary, ValidationReport};
use crate::utils::{
    abandon_spinner, create_spinner, finish_with_success, print_saved, print_step_header,
    print_warning,
};

pub const TRAIN_FILE: &str = "roster_train.csv";
pub const TEST_FILE: &str = "roster_test.csv";
pub const VALIDATION_REPORT_FILE: &str = "validation_report.json";
pub const PREPROCESSOR_FILE: &str = "roster_preprocessor.json";

pub fn run_preprocess(
    raw_data: &Path,
    data_to: &Path,
    preprocessor_to: &Path,
    config: &PipelineConfig,
) -> Result<()> {
    print_step_header(1, "Load raw data");
    let spinner = create_spinner("Reading roster file...");
    let raw = match load_dataset(raw_data, config.infer_schema_length) {
        Ok(df) => df,
        Err(e) => {
            abandon_spinner(&spinner);
            return Err(e).with_context(|| format!("Failed to load {}", raw_data.display()));
        }
    };
    finish_with_success(
        &spinner,
        &format!("Loaded {} rows x {} columns", raw.height(), raw.width()),
    );

    print_step_header(2, "Validate, clean and split");
    let output = preprocess(&raw, config).context("Preprocessing failed")?;
    if !output.invalid_rows.is_empty() {
        print_warning(&format!(
            "{} rows excluded by range checks, see {}",
            output.stats.rows_excluded, VALIDATION_REPORT_FILE
        ));
    }
    let report = ValidationReport::new(raw_data, config, &output.stats, &output.invalid_rows);

    print_step_header(3, "Write outputs");
    std::fs::create_dir_all(data_to)
        .with_context(|| format!("Failed to create {}", data_to.display()))?;
    std::fs::create_dir_all(preprocessor_to)
        .with_context(|| format!("Failed to create {}", preprocessor_to.display()))?;

    for (df, name) in [(&output.train, TRAIN_FILE), (&output.test, TEST_FILE)] {
        let path = write_csv(df, data_to, name, false, &config.output)
            .with_context(|| format!("Failed to write {}", name))?;
        print_saved(&path);
    }

    let report_path = data_to.join(VALIDATION_REPORT_FILE);
    export_validation_report(&report, &report_path)?;
    print_saved(&report_path);

    let scaler_path = preprocessor_to.join(PREPROCESSOR_FILE);
    output
        .scaler
        .save(&scaler_path)
        .with_context(|| format!("Failed to write {}", scaler_path.display()))?;
    print_saved(&scaler_path);

    PreprocessSummary::new(&output.stats).display();
    Ok(())
}
