//! Error types shared by every pipeline stage.
//!
//! Stages validate their inputs eagerly and fail with one of these variants
//! before any computation or file write happens. `PipelineError::kind`
//! exposes the category so callers and tests can branch on it without
//! matching message text.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Broad category of a pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unexpected columns, out-of-range values, unrecognized codes
    Schema,
    /// Empty inputs or mismatched feature counts
    Shape,
    /// Wrong kind of data handed to a stage
    Type,
    /// Invalid argument values and failed data quality checks
    Value,
    /// Missing directory or upstream artifact
    NotFound,
    /// Artifact written by an incompatible version
    Artifact,
    /// Chart rendering
    Plot,
    /// Network, filesystem, parsing and serialization failures
    Io,
}

/// Errors raised by the pipeline stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Type error: {0}")]
    Type(String),

    #[error("Value error: {0}")]
    Value(String),

    #[error("{message} ({})", path.display())]
    NotFound { message: String, path: PathBuf },

    #[error("Unsupported {artifact} version {found} in {} (expected {expected})", path.display())]
    ArtifactVersion {
        artifact: &'static str,
        found: u32,
        expected: u32,
        path: PathBuf,
    },

    #[error("Plot rendering failed: {0}")]
    Plot(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Data error: {0}")]
    Polars(#[from] PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Schema(_) => ErrorKind::Schema,
            PipelineError::Shape(_) => ErrorKind::Shape,
            PipelineError::Type(_) => ErrorKind::Type,
            PipelineError::Value(_) => ErrorKind::Value,
            PipelineError::NotFound { .. } => ErrorKind::NotFound,
            PipelineError::ArtifactVersion { .. } => ErrorKind::Artifact,
            PipelineError::Plot(_) => ErrorKind::Plot,
            PipelineError::Http(_)
            | PipelineError::Polars(_)
            | PipelineError::Io(_)
            | PipelineError::Json(_) => ErrorKind::Io,
        }
    }

    /// Shorthand for a missing directory or file.
    pub fn not_found(message: &str, path: impl Into<PathBuf>) -> Self {
        PipelineError::NotFound {
            message: message.to_string(),
            path: path.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(PipelineError::Schema("x".into()).kind(), ErrorKind::Schema);
        assert_eq!(PipelineError::Shape("x".into()).kind(), ErrorKind::Shape);
        assert_eq!(PipelineError::Type("x".into()).kind(), ErrorKind::Type);
        assert_eq!(PipelineError::Value("x".into()).kind(), ErrorKind::Value);
        assert_eq!(
            PipelineError::not_found("Directory does not exist.", "/nope").kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_not_found_message_includes_path() {
        let err = PipelineError::not_found("Directory does not exist.", "/nope/here");
        let msg = err.to_string();
        assert!(msg.contains("Directory does not exist."));
        assert!(msg.contains("/nope/here"));
    }
}
