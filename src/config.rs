//! Report configuration
//!
//! Settings can come from a TOML file and are then overridden by
//! command-line flags.
//!
//! # Example stridemerge.toml
//!
//! ```toml
//! format = "json"
//! output = "reports/merged.json"
//! chunk_size = 65536
//! ```

use crate::cli::{Cli, OutputFormat};
use crate::error::AnalysisError;
use crate::sanitize::DEFAULT_CHUNK_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default CSV report path
pub const DEFAULT_CSV_OUTPUT: &str = "memory_analysis.csv";

/// Default JSON report path
pub const DEFAULT_JSON_OUTPUT: &str = "memory_analysis.json";

/// Settings for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Report destination; `None` picks a default from the format
    pub output: Option<PathBuf>,

    /// Output format
    pub format: OutputFormat,

    /// Bytes read from the input per chunk
    pub chunk_size: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: None,
            format: OutputFormat::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ReportConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| AnalysisError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, AnalysisError> {
        toml::from_str(content).map_err(|e| AnalysisError::Config(e.to_string()))
    }

    /// Apply command-line flags on top of file settings
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(output) = &cli.output {
            self.output = Some(output.clone());
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        if let Some(chunk_size) = cli.chunk_size {
            self.chunk_size = chunk_size;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.chunk_size == 0 {
            return Err(AnalysisError::Config(
                "chunk_size must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Where the report goes; `None` means stdout
    pub fn output_path(&self) -> Option<PathBuf> {
        match (&self.output, self.format) {
            (Some(path), _) => Some(path.clone()),
            (None, OutputFormat::Csv) => Some(PathBuf::from(DEFAULT_CSV_OUTPUT)),
            (None, OutputFormat::Json) => Some(PathBuf::from(DEFAULT_JSON_OUTPUT)),
            (None, OutputFormat::Text) => None,
        }
    }
}
