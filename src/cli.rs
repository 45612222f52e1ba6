//! CLI argument parsing for stridemerge

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for the merged report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// CSV format for spreadsheet analysis (default)
    #[default]
    Csv,
    /// JSON format for machine parsing
    Json,
    /// Human-readable table
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "stridemerge")]
#[command(version)]
#[command(
    about = "Merge per-thread memory access stride histograms into one report",
    long_about = None
)]
pub struct Cli {
    /// Memory analysis log produced by the instrumented program
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Report destination (default: memory_analysis.csv / .json, stdout for text)
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Bytes read from the input per chunk
    #[arg(long = "chunk-size", value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Load settings from a TOML file (command-line flags take precedence)
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print parser statistics to stderr
    #[arg(long = "stats")]
    pub stats: bool,

    /// Enable debug logging
    #[arg(long = "debug")]
    pub debug: bool,
}
