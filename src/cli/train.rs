//! `rosterfit train`: fit the pipeline on train, score on test, write artifacts

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::pipeline::{
    check_feature_label_correlation, check_label_balance, fit_and_evaluate, load_dataset,
    split_features_labels, ConfusionMatrix, FeatureScaler, PipelineConfig,
};
use crate::report::{render_confusion_matrix, write_chart, write_csv, TrainingSummary};
use crate::utils::{
    abandon_spinner, create_spinner, finish_with_success, print_info, print_saved,
    print_step_header,
};

pub const PIPELINE_FILE: &str = "shooter_pipeline.json";
pub const SCORES_FILE: &str = "test_scores.csv";
pub const CONFUSION_CSV_FILE: &str = "confusion_matrix.csv";
pub const CONFUSION_CHART_FILE: &str = "confusion_matrix.svg";

/// Input and output locations for the train stage
#[derive(Debug, Clone, Copy)]
pub struct TrainPaths<'a> {
    pub training_data: &'a Path,
    pub test_data: &'a Path,
    pub preprocessor: &'a Path,
    pub pipeline_to: &'a Path,
    pub plot_to: &'a Path,
    pub results_to: &'a Path,
}

/// Confusion counts as a table, one row per actual class
pub fn confusion_table(cm: &ConfusionMatrix) -> PolarsResult<DataFrame> {
    let grid = cm.as_grid();
    df! {
        "actual" => ["shoots_right", "shoots_left"],
        "predicted_shoots_right" => [grid[0][0] as u64, grid[1][0] as u64],
        "predicted_shoots_left" => [grid[0][1] as u64, grid[1][1] as u64],
    }
}

pub fn run_train(paths: TrainPaths<'_>, config: &PipelineConfig) -> Result<()> {
    print_step_header(1, "Load splits and preprocessor");
    let train = load_dataset(paths.training_data, config.infer_schema_length)
        .with_context(|| format!("Failed to load {}", paths.training_data.display()))?;
    let test = load_dataset(paths.test_data, config.infer_schema_length)
        .with_context(|| format!("Failed to load {}", paths.test_data.display()))?;
    let scaler = FeatureScaler::load(paths.preprocessor)
        .with_context(|| format!("Failed to load {}", paths.preprocessor.display()))?;

    let (x_train, y_train) = split_features_labels(&train)?;
    let (x_test, y_test) = split_features_labels(&test)?;

    print_step_header(2, "Data quality checks");
    let labels = check_label_balance(&y_train, config.label_balance)?;
    print_info(&format!(
        "{} left-handed and {} right-handed shooters in training data",
        labels.left, labels.right
    ));
    for (feature, corr) in
        check_feature_label_correlation(&x_train, &y_train, config.max_feature_label_correlation)?
    {
        print_info(&format!("|corr({}, label)| = {:.3}", feature, corr));
    }

    print_step_header(3, "Fit and evaluate");
    let spinner = create_spinner("Fitting logistic regression...");
    let (pipeline, accuracy) = match fit_and_evaluate(
        &x_train,
        &y_train,
        &x_test,
        &y_test,
        scaler,
        &config.classifier,
    ) {
        Ok(result) => result,
        Err(e) => {
            abandon_spinner(&spinner);
            return Err(e).context("Training failed");
        }
    };
    finish_with_success(&spinner, &format!("Test accuracy {:.3}", accuracy));

    let confusion = pipeline.confusion_matrix(&x_test, &y_test)?;
    let scores = df! { "accuracy" => [accuracy] }?;
    let confusion_df = confusion_table(&confusion)?;
    let artifact = pipeline.to_json().context("Failed to serialize pipeline")?;
    let chart = render_confusion_matrix(&confusion).context("Failed to render confusion matrix")?;

    print_step_header(4, "Write outputs");
    for dir in [paths.pipeline_to, paths.plot_to, paths.results_to] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let pipeline_path = paths.pipeline_to.join(PIPELINE_FILE);
    std::fs::write(&pipeline_path, artifact)
        .with_context(|| format!("Failed to write {}", pipeline_path.display()))?;
    print_saved(&pipeline_path);

    print_saved(&write_csv(&scores, paths.results_to, SCORES_FILE, false, &config.output)?);
    print_saved(&write_csv(
        &confusion_df,
        paths.results_to,
        CONFUSION_CSV_FILE,
        false,
        &config.output,
    )?);

    let chart_path = paths.plot_to.join(CONFUSION_CHART_FILE);
    write_chart(&chart, &chart_path)
        .with_context(|| format!("Failed to write {}", chart_path.display()))?;
    print_saved(&chart_path);

    TrainingSummary {
        accuracy,
        labels,
        confusion,
        converged: pipeline.classifier.converged,
        iterations: pipeline.classifier.n_iter,
    }
    .display();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confusion_table_layout() {
        let cm = ConfusionMatrix {
            true_negative: 5,
            false_positive: 2,
            false_negative: 1,
            true_positive: 7,
        };
        let df = confusion_table(&cm).unwrap();
        let left: Vec<Option<u64>> = df
            .column("predicted_shoots_left")
            .unwrap()
            .u64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(left, vec![Some(2), Some(7)]);
    }
}
