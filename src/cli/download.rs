//! `rosterfit download`: fetch the raw roster CSV

use std::path::Path;

use anyhow::{Context, Result};

use crate::pipeline::download_csv;
use crate::utils::{abandon_spinner, create_spinner, finish_with_success, print_saved};

pub fn run_download(url: &str, write_to: &Path) -> Result<()> {
    std::fs::create_dir_all(write_to)
        .with_context(|| format!("Failed to create {}", write_to.display()))?;

    let spinner = create_spinner("Downloading...");
    match download_csv(url, write_to) {
        Ok(path) => {
            finish_with_success(&spinner, "Download complete");
            print_saved(&path);
            Ok(())
        }
        Err(e) => {
            abandon_spinner(&spinner);
            Err(e).with_context(|| format!("Failed to download {}", url))
        }
    }
}
