//! SVG charts: feature distributions by label and the confusion matrix

use std::path::Path;

use plotters::prelude::*;
use polars::prelude::*;

use crate::pipeline::{
    column_as_f64, ConfusionMatrix, PipelineError, Result, HEIGHT_COLUMN, LABEL_COLUMN,
    WEIGHT_COLUMN,
};

type PlotResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Number of equal-width histogram bins per feature
const HISTOGRAM_BINS: usize = 20;

const PANEL_SIZE: (u32, u32) = (480, 360);

/// One histogram bar: [lower, upper) and the number of values inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: u32,
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
pub fn histogram(values: &[f64], min: f64, max: f64, bins: usize) -> Vec<Bin> {
    let bins = bins.max(1);
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &v in values {
        if v < min || v > max || v.is_nan() {
            continue;
        }
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Render weight and height histograms faceted by `shoots_left` as SVG text.
///
/// Rows are weight then height; the left column is right-handed shooters
/// and the right column is left-handed shooters. Nothing touches disk.
pub fn render_feature_distributions(df: &DataFrame) -> Result<String> {
    let labels: Vec<Option<bool>> = df
        .column(LABEL_COLUMN)
        .map_err(|_| PipelineError::Schema(format!("Label column '{}' not found", LABEL_COLUMN)))?
        .bool()
        .map_err(|_| PipelineError::Type(format!("'{}' must be boolean", LABEL_COLUMN)))?
        .into_iter()
        .collect();

    let mut panels = Vec::new();
    for (column, title) in [
        (WEIGHT_COLUMN, "Weight (kg)"),
        (HEIGHT_COLUMN, "Height (cm)"),
    ] {
        let values = column_as_f64(df, column)?;
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        if present.is_empty() {
            return Err(PipelineError::Shape(format!(
                "Column '{}' has no values to plot",
                column
            )));
        }
        let min = present.iter().copied().fold(f64::INFINITY, f64::min);
        let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        for class in [false, true] {
            let subset: Vec<f64> = values
                .iter()
                .zip(labels.iter())
                .filter_map(|(v, l)| if *l == Some(class) { *v } else { None })
                .collect();
            panels.push((title, class, histogram(&subset, min, max, HISTOGRAM_BINS)));
        }
    }

    let mut svg = String::new();
    draw_distributions(&panels, &mut svg).map_err(|e| PipelineError::Plot(e.to_string()))?;
    Ok(svg)
}

/// Render the distribution chart and write it to `path`.
pub fn plot_feature_distributions(df: &DataFrame, path: &Path) -> Result<()> {
    let svg = render_feature_distributions(df)?;
    write_chart(&svg, path)?;
    tracing::info!(path = %path.display(), "distribution chart written");
    Ok(())
}

/// Write rendered SVG text to `path`.
pub fn write_chart(svg: &str, path: &Path) -> Result<()> {
    std::fs::write(path, svg)?;
    Ok(())
}

fn draw_distributions(panels: &[(&str, bool, Vec<Bin>)], svg: &mut String) -> PlotResult<()> {
    let size = (PANEL_SIZE.0 * 2, PANEL_SIZE.1 * 2 + 40);
    let root = SVGBackend::with_string(svg, size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(
        "Distribution of Player Weight and Height by Shooting Hand",
        ("sans-serif", 22),
    )?;

    let y_max = panels
        .iter()
        .flat_map(|(_, _, bins)| bins.iter().map(|b| b.count))
        .max()
        .unwrap_or(0)
        + 1;

    for (area, (title, class, bins)) in root.split_evenly((2, 2)).iter().zip(panels) {
        let (x_min, x_max) = match (bins.first(), bins.last()) {
            (Some(first), Some(last)) => (first.lower, last.upper),
            _ => continue,
        };
        let color = if *class { BLUE } else { RED };
        let caption = format!("{} | Shoots Left: {}", title, class);

        let mut chart = ChartBuilder::on(area)
            .caption(caption, ("sans-serif", 16))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, 0u32..y_max)?;

        chart
            .configure_mesh()
            .x_desc(*title)
            .y_desc("Number of Players")
            .draw()?;

        chart.draw_series(bins.iter().map(|b| {
            Rectangle::new([(b.lower, 0), (b.upper, b.count)], color.mix(0.7).filled())
        }))?;
    }

    root.present()?;
    Ok(())
}

/// Render the confusion matrix as a labeled 2x2 grid of SVG text.
pub fn render_confusion_matrix(cm: &ConfusionMatrix) -> Result<String> {
    let mut svg = String::new();
    draw_confusion_matrix(cm, &mut svg).map_err(|e| PipelineError::Plot(e.to_string()))?;
    Ok(svg)
}

/// Render the confusion matrix chart and write it to `path`.
pub fn plot_confusion_matrix(cm: &ConfusionMatrix, path: &Path) -> Result<()> {
    let svg = render_confusion_matrix(cm)?;
    write_chart(&svg, path)?;
    tracing::info!(path = %path.display(), "confusion matrix chart written");
    Ok(())
}

fn draw_confusion_matrix(cm: &ConfusionMatrix, svg: &mut String) -> PlotResult<()> {
    let root = SVGBackend::with_string(svg, (560, 520)).into_drawing_area();
    root.fill(&WHITE)?;

    let class_name = |v: &f64| -> String {
        match *v {
            v if (0.4..0.6).contains(&v) => "Shoots Right".to_string(),
            v if (1.4..1.6).contains(&v) => "Shoots Left".to_string(),
            _ => String::new(),
        }
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Confusion Matrix for Shooting Hand Classification",
            ("sans-serif", 20),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(100)
        .build_cartesian_2d(0f64..2f64, 0f64..2f64)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(5)
        .y_labels(5)
        .x_label_formatter(&class_name)
        .y_label_formatter(&class_name)
        .x_desc("Predicted Class")
        .y_desc("Actual Class")
        .draw()?;

    let grid = cm.as_grid();
    let peak = grid.iter().flatten().copied().max().unwrap_or(0).max(1) as f64;

    for (actual, row) in grid.iter().enumerate() {
        for (predicted, &count) in row.iter().enumerate() {
            let x = predicted as f64;
            let y = actual as f64;
            let shade = 0.15 + 0.75 * (count as f64 / peak);
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x, y), (x + 1.0, y + 1.0)],
                BLUE.mix(shade).filled(),
            )))?;
            chart.draw_series(std::iter::once(Text::new(
                count.to_string(),
                (x + 0.45, y + 0.55),
                ("sans-serif", 28).into_font(),
            )))?;
        }
    }

    root.present()?;
    Ok(())
}
