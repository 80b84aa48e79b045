//! Raw dataset download

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::{PipelineError, Result};

/// File name a URL is saved under: its last path segment
pub fn file_name_from_url(url: &str) -> Result<String> {
    let trimmed = url.split(['?', '#']).next().unwrap_or(url);
    match trimmed.rsplit('/').next() {
        Some(name) if !name.is_empty() && trimmed.contains('/') => Ok(name.to_string()),
        _ => Err(PipelineError::Value(format!(
            "Cannot derive a file name from URL '{}'",
            url
        ))),
    }
}

/// Fetch `url` and write the body to `<directory>/<file name from url>`.
///
/// The directory is checked before any network traffic.
pub fn download_csv(url: &str, directory: &Path) -> Result<PathBuf> {
    if !directory.is_dir() {
        return Err(PipelineError::not_found(
            "The directory provided does not exist.",
            directory,
        ));
    }
    let target = directory.join(file_name_from_url(url)?);

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("rosterfit/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(60))
        .build()?;

    tracing::info!(url, "downloading dataset");
    let response = client.get(url).send()?;
    if !response.status().is_success() {
        return Err(PipelineError::Value(format!(
            "The URL provided does not exist. (HTTP {})",
            response.status()
        )));
    }

    let body = response.bytes()?;
    std::fs::write(&target, &body)?;
    tracing::info!(path = %target.display(), bytes = body.len(), "dataset written");
    Ok(target)
}
