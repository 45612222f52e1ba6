//! Analysis pipeline and report writing
//!
//! Ties the parser, the aggregator and the output formats together.

use crate::aggregate::merge_records;
use crate::cli::OutputFormat;
use crate::config::ReportConfig;
use crate::csv_output::CsvOutput;
use crate::error::AnalysisError;
use crate::json_output::JsonOutput;
use crate::parser::{parse_file, parse_reader, ParseOutcome, ParseStats};
use crate::record::MergedRecord;
use crate::text_output::render_table;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Result of parsing and merging one log
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Number of per-thread records recovered by the parser
    pub parsed_records: usize,
    pub merged: Vec<MergedRecord>,
    pub stats: ParseStats,
}

impl Analysis {
    fn from_outcome(outcome: ParseOutcome) -> Self {
        Self {
            parsed_records: outcome.records.len(),
            merged: merge_records(&outcome.records),
            stats: outcome.stats,
        }
    }

    /// True when the log contained no usable record
    pub fn is_empty(&self) -> bool {
        self.parsed_records == 0
    }
}

/// Parse and merge a log file
pub fn analyze_file<P: AsRef<Path>>(path: P, chunk_size: usize) -> Result<Analysis, AnalysisError> {
    parse_file(path, chunk_size).map(Analysis::from_outcome)
}

/// Parse and merge a log from any reader
pub fn analyze_reader<R: Read>(reader: R, chunk_size: usize) -> Result<Analysis, AnalysisError> {
    parse_reader(reader, chunk_size).map(Analysis::from_outcome)
}

/// Render merged records in the requested format
pub fn render(analysis: &Analysis, format: OutputFormat) -> Result<String, AnalysisError> {
    match format {
        OutputFormat::Csv => Ok(CsvOutput::new(&analysis.merged).to_csv()),
        OutputFormat::Json => Ok(JsonOutput::new(&analysis.merged)
            .with_parse_stats(analysis.stats)
            .to_json()?),
        OutputFormat::Text => Ok(render_table(&analysis.merged)),
    }
}

/// Write the report where `config` says; returns the file path, if any
pub fn write_report(
    analysis: &Analysis,
    config: &ReportConfig,
) -> Result<Option<PathBuf>, AnalysisError> {
    let body = render(analysis, config.format)?;

    match config.output_path() {
        Some(path) => {
            fs::write(&path, body).map_err(|source| AnalysisError::Write {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(path = %path.display(), records = analysis.merged.len(), "report written");
            Ok(Some(path))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(body.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|source| AnalysisError::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
            Ok(None)
        }
    }
}
