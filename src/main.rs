//! rosterfit: NHL shooting hand classifier CLI
//!
//! Runs one pipeline stage per invocation: download, preprocess, eda or train.

use anyhow::{Context, Result};
use clap::Parser;

use rosterfit::cli::{run_download, run_eda, run_preprocess, run_train, Cli, Commands, TrainPaths};
use rosterfit::pipeline::PipelineConfig;
use rosterfit::utils::{init_logging, print_banner, print_completion};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;
    tracing::debug!(?config, "resolved configuration");

    let stage = cli.command.stage_name();
    print_banner(env!("CARGO_PKG_VERSION"), stage);

    match &cli.command {
        Commands::Download { url, write_to } => run_download(url, write_to)?,
        Commands::Preprocess {
            raw_data,
            data_to,
            preprocessor_to,
            ..
        } => run_preprocess(raw_data, data_to, preprocessor_to, &config)?,
        Commands::Eda {
            processed_training_data,
            plot_to,
        } => run_eda(processed_training_data, plot_to, &config)?,
        Commands::Train {
            training_data,
            test_data,
            preprocessor,
            pipeline_to,
            plot_to,
            results_to,
            ..
        } => run_train(
            TrainPaths {
                training_data,
                test_data,
                preprocessor,
                pipeline_to,
                plot_to,
                results_to,
            },
            &config,
        )?,
    }

    print_completion(stage);
    Ok(())
}

/// Defaults, overlaid by `--config`, overlaid by stage options.
fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    match &cli.command {
        Commands::Preprocess {
            seed,
            test_fraction,
            ..
        } => {
            if let Some(seed) = seed {
                config.seed = *seed;
            }
            if let Some(fraction) = test_fraction {
                config.test_fraction = *fraction;
            }
        }
        Commands::Train { label_balance, .. } => {
            if let Some(mode) = label_balance {
                config.label_balance = *mode;
            }
        }
        Commands::Download { .. } | Commands::Eda { .. } => {}
    }

    config.validate()?;
    Ok(config)
}
