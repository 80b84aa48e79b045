//! Terminal summaries printed at the end of each stage

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{CleaningStats, ConfusionMatrix, LabelCounts};

fn print_section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn metric_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    table
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn count_cell(count: usize) -> Cell {
    Cell::new(count).fg(if count == 0 { Color::White } else { Color::Red })
}

/// Row accounting for the preprocess stage
#[derive(Debug)]
pub struct PreprocessSummary<'a> {
    pub stats: &'a CleaningStats,
}

impl<'a> PreprocessSummary<'a> {
    pub fn new(stats: &'a CleaningStats) -> Self {
        Self { stats }
    }

    pub fn display(&self) {
        print_section("📋", "PREPROCESS SUMMARY");

        let s = self.stats;
        let mut table = metric_table();
        table.add_row(vec![Cell::new("📁 Rows Loaded"), Cell::new(s.rows_loaded)]);
        table.add_row(vec![
            Cell::new("🗑️  Duplicates Removed"),
            count_cell(s.duplicates_removed),
        ]);
        table.add_row(vec![
            Cell::new("❔ Incomplete Rows Dropped"),
            count_cell(s.incomplete_rows_dropped),
        ]);
        table.add_row(vec![
            Cell::new("🚫 Out of Range"),
            count_cell(s.rows_excluded),
        ]);
        table.add_row(vec![
            Cell::new("✅ Valid Rows"),
            Cell::new(s.valid_rows)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![Cell::new("🏋️ Train Rows"), Cell::new(s.train_rows)]);
        table.add_row(vec![Cell::new("🧪 Test Rows"), Cell::new(s.test_rows)]);

        print_indented(&table);
    }
}

/// Accuracy, label counts and confusion matrix for the train stage
#[derive(Debug)]
pub struct TrainingSummary {
    pub accuracy: f64,
    pub labels: LabelCounts,
    pub confusion: ConfusionMatrix,
    pub converged: bool,
    pub iterations: usize,
}

impl TrainingSummary {
    pub fn display(&self) {
        print_section("📋", "TRAINING SUMMARY");

        let mut table = metric_table();
        table.add_row(vec![
            Cell::new("🏒 Train Rows (left / right)"),
            Cell::new(format!("{} / {}", self.labels.left, self.labels.right)),
        ]);
        table.add_row(vec![
            Cell::new("🔁 Solver Iterations"),
            Cell::new(self.iterations).fg(if self.converged {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        table.add_row(vec![Cell::new("🧪 Test Rows"), Cell::new(self.confusion.total())]);

        let color = if self.accuracy >= 0.7 {
            Color::Green
        } else if self.accuracy >= 0.5 {
            Color::Yellow
        } else {
            Color::Red
        };
        table.add_row(vec![
            Cell::new("🎯 Test Accuracy"),
            Cell::new(format!("{:.1}%", self.accuracy * 100.0))
                .fg(color)
                .add_attribute(Attribute::Bold),
        ]);
        print_indented(&table);

        print_section("🧮", "CONFUSION MATRIX");
        let mut grid = Table::new();
        grid.load_preset(UTF8_FULL_CONDENSED);
        grid.set_header(vec![
            Cell::new("Actual \\ Predicted").add_attribute(Attribute::Bold),
            Cell::new("Shoots Right").add_attribute(Attribute::Bold),
            Cell::new("Shoots Left").add_attribute(Attribute::Bold),
        ]);
        for (name, row) in ["Shoots Right", "Shoots Left"]
            .iter()
            .zip(self.confusion.as_grid())
        {
            grid.add_row(vec![
                Cell::new(name),
                Cell::new(row[0]),
                Cell::new(row[1]),
            ]);
        }
        print_indented(&grid);
    }
}
