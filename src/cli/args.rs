//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::LabelBalanceCheck;

/// rosterfit - Predict NHL shooting hand from player height and weight
#[derive(Parser, Debug)]
#[command(name = "rosterfit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON file overlaying the default pipeline configuration.
    /// Command-line options take precedence over values in this file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    /// RUST_LOG overrides this flag.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download the raw roster CSV into a directory
    Download {
        /// URL of the raw CSV file
        #[arg(long)]
        url: String,

        /// Directory to write the file to (created if missing)
        #[arg(long)]
        write_to: PathBuf,
    },

    /// Validate, clean and split the raw data, then fit the feature scaler
    Preprocess {
        /// Raw roster file (CSV or Parquet)
        #[arg(long)]
        raw_data: PathBuf,

        /// Directory for roster_train.csv, roster_test.csv and validation_report.json
        #[arg(long)]
        data_to: PathBuf,

        /// Directory for the fitted scaler (roster_preprocessor.json)
        #[arg(long)]
        preprocessor_to: PathBuf,

        /// Seed for the train/test split
        #[arg(long)]
        seed: Option<u64>,

        /// Fraction of rows held out for testing, strictly between 0 and 1
        #[arg(long, value_parser = validate_test_fraction)]
        test_fraction: Option<f64>,
    },

    /// Write summary tables and distribution charts for the training split
    Eda {
        /// Processed training data (roster_train.csv)
        #[arg(long)]
        processed_training_data: PathBuf,

        /// Directory to write tables/ and figures/ under
        #[arg(long)]
        plot_to: PathBuf,
    },

    /// Fit the classifier on the training split and score it on the test split
    Train {
        /// Processed training data (roster_train.csv)
        #[arg(long)]
        training_data: PathBuf,

        /// Processed test data (roster_test.csv)
        #[arg(long)]
        test_data: PathBuf,

        /// Fitted scaler written by `preprocess` (roster_preprocessor.json)
        #[arg(long)]
        preprocessor: PathBuf,

        /// Directory for the fitted pipeline (shooter_pipeline.json)
        #[arg(long)]
        pipeline_to: PathBuf,

        /// Directory for the confusion matrix chart
        #[arg(long)]
        plot_to: PathBuf,

        /// Directory for test_scores.csv and confusion_matrix.csv
        #[arg(long)]
        results_to: PathBuf,

        /// Label balance check: off, warn or enforce
        #[arg(long)]
        label_balance: Option<LabelBalanceCheck>,
    },
}

impl Commands {
    /// Stage name shown in the banner
    pub fn stage_name(&self) -> &'static str {
        match self {
            Commands::Download { .. } => "Download",
            Commands::Preprocess { .. } => "Preprocess",
            Commands::Eda { .. } => "EDA",
            Commands::Train { .. } => "Train",
        }
    }
}

/// Validator for the test fraction
fn validate_test_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "test_fraction must be between 0.0 and 1.0 (exclusive), got {}",
            value
        ))
    }
}
