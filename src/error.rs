//! Error types for log analysis
//!
//! `AnalysisError` is fatal and aborts the run. `LineError` is recovered
//! locally by the parser: the offending line is skipped with a warning.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors surfaced to the caller
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read input: {0}")]
    Read(#[from] io::Error),

    #[error("Failed to write report to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// A line that looked like a record but could not be converted
#[derive(Debug, Error, PartialEq)]
pub enum LineError {
    #[error("line is not valid ASCII: {0}")]
    Undecodable(#[from] std::str::Utf8Error),

    #[error("invalid integer for {field}: {value:?}")]
    InvalidInteger { field: &'static str, value: String },

    #[error("invalid percentage: {0:?}")]
    InvalidPercentage(String),
}
