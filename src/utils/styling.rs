//! Terminal styling for stage output

use console::{style, Emoji};
use std::path::Path;

pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

/// Print the application banner with the stage being run
pub fn print_banner(version: &str, stage: &str) {
    println!();
    println!(
        "    {} {}",
        style("rosterfit").cyan().bold(),
        style(format!("v{}", version)).dim()
    );
    println!(
        "    {}",
        style(format!("Shooting hand classifier | {}", stage)).dim()
    );
    println!("    {}", style("━".repeat(50)).dim());
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning the user should act on
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print the location of a written artifact
pub fn print_saved(path: &Path) {
    println!(
        "    {} {}",
        SAVE,
        style(truncate_path(path, 60)).dim()
    );
}

/// Print the final completion message
pub fn print_completion(stage: &str) {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style(format!("{} complete!", stage)).green().bold()
    );
    println!();
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    let s = path.display().to_string();
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
