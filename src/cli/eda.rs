//! `rosterfit eda`: summary tables and distribution charts for the training split

use std::path::Path;

use anyhow::{Context, Result};

use crate::pipeline::{load_dataset, PipelineConfig};
use crate::report::{
    build_summary_tables, render_feature_distributions, write_built_tables, write_chart,
};
use crate::utils::{
    abandon_spinner, create_spinner, finish_with_success, print_saved, print_step_header,
};

pub const CHART_FILE: &str = "combined_chart.svg";

pub fn run_eda(processed_training_data: &Path, plot_to: &Path, config: &PipelineConfig) -> Result<()> {
    print_step_header(1, "Load training split");
    let train = load_dataset(processed_training_data, config.infer_schema_length)
        .with_context(|| format!("Failed to load {}", processed_training_data.display()))?;

    print_step_header(2, "Summary tables");
    let tables = build_summary_tables(&train).context("Failed to build summary tables")?;

    print_step_header(3, "Distribution charts");
    let spinner = create_spinner("Rendering chart...");
    let chart = match render_feature_distributions(&train) {
        Ok(svg) => svg,
        Err(e) => {
            abandon_spinner(&spinner);
            return Err(e).context("Failed to render distribution chart");
        }
    };
    finish_with_success(&spinner, "Chart rendered");

    print_step_header(4, "Write outputs");
    let tables_dir = plot_to.join("tables");
    let figures_dir = plot_to.join("figures");
    for dir in [&tables_dir, &figures_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    for path in write_built_tables(&tables, &tables_dir, &config.output)
        .context("Failed to write summary tables")?
    {
        print_saved(&path);
    }

    let chart_path = figures_dir.join(CHART_FILE);
    write_chart(&chart, &chart_path)
        .with_context(|| format!("Failed to write {}", chart_path.display()))?;
    print_saved(&chart_path);

    Ok(())
}
