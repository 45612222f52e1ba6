//! Record parser for memory analysis logs
//!
//! Two line grammars are recognized, searched anywhere in a line:
//!
//! ```text
//! [Memory Analysis] thread 3: a in kernel: elements=4096, accesses=8192
//!   Pattern 1: step=1 (87.5%)
//!   Pattern 2: step=64 (12.5%)
//! ```
//!
//! A header starts a new record; pattern lines append to the record most
//! recently started. Everything else is noise and is skipped. A header
//! whose numbers cannot be represented still closes the previous record,
//! and the pattern lines after it are dropped as orphans.

use crate::error::{AnalysisError, LineError};
use crate::record::{AccessRecord, PatternEntry};
use crate::sanitize::{SanitizeStats, SanitizedLines};
use regex::{Captures, Regex};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

/// Marker the instrumented runtime prints before every header
pub const HEADER_MARKER: &str = "[Memory Analysis]";

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let grammar = format!(
            r"{} thread (\d+): (\w+) in (\w+): elements=(\d+), accesses=(\d+)",
            regex::escape(HEADER_MARKER)
        );
        Regex::new(&grammar).expect("header grammar must compile")
    })
}

fn pattern_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Pattern (\d+): step=(\d+) \(([\d.]+)%\)").expect("pattern grammar must compile")
    })
}

/// Classification of one sanitized line
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// Starts a new record (patterns empty)
    Header(AccessRecord),
    /// One histogram entry for the current record
    Pattern(PatternEntry),
    /// Matches neither grammar
    Ignored,
}

fn parse_int(caps: &Captures<'_>, index: usize, field: &'static str) -> Result<u64, LineError> {
    let value = &caps[index];
    value.parse().map_err(|_| LineError::InvalidInteger {
        field,
        value: value.to_string(),
    })
}

/// Grammar a line matched, before any captured number is converted
enum Matched<'l> {
    Header(Captures<'l>),
    Pattern(Captures<'l>),
}

fn match_line(line: &str) -> Option<Matched<'_>> {
    if let Some(caps) = header_regex().captures(line) {
        return Some(Matched::Header(caps));
    }
    pattern_regex().captures(line).map(Matched::Pattern)
}

fn header_record(caps: &Captures<'_>) -> Result<AccessRecord, LineError> {
    let thread_id = parse_int(caps, 1, "thread")?;
    let elements = parse_int(caps, 4, "elements")?;
    let accesses = parse_int(caps, 5, "accesses")?;
    Ok(AccessRecord::new(thread_id, &caps[2], &caps[3], elements, accesses))
}

fn pattern_entry(caps: &Captures<'_>) -> Result<PatternEntry, LineError> {
    // Group 1 is the pattern ordinal; it is not validated
    let step = parse_int(caps, 2, "step")?;
    let raw = &caps[3];
    let percentage: f64 = raw
        .parse()
        .map_err(|_| LineError::InvalidPercentage(raw.to_string()))?;
    Ok(PatternEntry::new(step, percentage))
}

/// Classify a line against the header grammar, then the pattern grammar.
///
/// Returns `Err` only when a grammar matched but a captured number cannot
/// be represented.
pub fn classify_line(line: &str) -> Result<LineKind, LineError> {
    match match_line(line) {
        Some(Matched::Header(caps)) => header_record(&caps).map(LineKind::Header),
        Some(Matched::Pattern(caps)) => pattern_entry(&caps).map(LineKind::Pattern),
        None => Ok(LineKind::Ignored),
    }
}

/// Counters describing one parse run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub bytes_read: u64,
    pub bytes_dropped: u64,
    pub unterminated_bytes: u64,
    pub lines: u64,
    /// Headers whose numbers converted and which became the current record
    pub headers: u64,
    pub patterns: u64,
    /// Pattern lines with no current record (before any header, or after
    /// a rejected one)
    pub orphan_patterns: u64,
    /// Headers finalized with `accesses == 0`
    pub zero_access_records: u64,
    pub ignored_lines: u64,
    /// Lines skipped because they could not be decoded or converted
    pub rejected_lines: u64,
}

impl ParseStats {
    fn absorb(&mut self, sanitize: SanitizeStats) {
        self.bytes_read = sanitize.bytes_read;
        self.bytes_dropped = sanitize.bytes_dropped;
        self.unterminated_bytes = sanitize.unterminated_bytes;
    }
}

/// Records recovered from a log, in header order
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub records: Vec<AccessRecord>,
    pub stats: ParseStats,
}

/// Streaming parser state: at most one record in progress
#[derive(Debug, Default)]
pub struct RecordParser {
    current: Option<AccessRecord>,
    records: Vec<AccessRecord>,
    stats: ParseStats,
}

impl RecordParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one decoded line
    pub fn feed_line(&mut self, line: &str) {
        self.stats.lines += 1;

        match match_line(line) {
            Some(Matched::Header(caps)) => {
                // Any header match closes the previous record, even one
                // whose numbers turn out to be unusable
                self.finalize_current();
                match header_record(&caps) {
                    Ok(record) => {
                        self.stats.headers += 1;
                        self.current = Some(record);
                    }
                    Err(e) => self.reject_line(e),
                }
            }
            Some(Matched::Pattern(caps)) => {
                let Some(record) = self.current.as_mut() else {
                    // Orphan pattern before any usable header: dropped unconverted
                    self.stats.orphan_patterns += 1;
                    return;
                };
                match pattern_entry(&caps) {
                    Ok(entry) => {
                        record.patterns.push(entry);
                        self.stats.patterns += 1;
                    }
                    Err(e) => self.reject_line(e),
                }
            }
            None => {
                self.stats.ignored_lines += 1;
            }
        }
    }

    /// Account for a line the sanitizer could not decode
    pub fn feed_undecodable(&mut self, error: LineError) {
        self.stats.lines += 1;
        self.reject_line(error);
    }

    fn reject_line(&mut self, error: LineError) {
        self.stats.rejected_lines += 1;
        tracing::warn!(line = self.stats.lines, "skipping line: {}", error);
    }

    fn finalize_current(&mut self) {
        if let Some(record) = self.current.take() {
            if record.has_accesses() {
                self.records.push(record);
            } else {
                self.stats.zero_access_records += 1;
            }
        }
    }

    /// Records finalized so far, excluding the one in progress
    pub fn records(&self) -> &[AccessRecord] {
        &self.records
    }

    /// Flush the pending record and return everything parsed
    pub fn finish(mut self) -> ParseOutcome {
        self.finalize_current();
        ParseOutcome {
            records: self.records,
            stats: self.stats,
        }
    }
}

/// Parse a log from any reader, `chunk_size` bytes at a time
pub fn parse_reader<R: Read>(reader: R, chunk_size: usize) -> Result<ParseOutcome, AnalysisError> {
    let mut lines = SanitizedLines::new(reader, chunk_size);
    let mut parser = RecordParser::new();

    for line in lines.by_ref() {
        match line? {
            Ok(text) => parser.feed_line(&text),
            Err(e) => parser.feed_undecodable(e),
        }
    }

    let mut outcome = parser.finish();
    outcome.stats.absorb(lines.stats());

    tracing::debug!(
        records = outcome.records.len(),
        lines = outcome.stats.lines,
        headers = outcome.stats.headers,
        dropped_bytes = outcome.stats.bytes_dropped,
        "parse complete"
    );

    Ok(outcome)
}

/// Open and parse a log file
pub fn parse_file<P: AsRef<Path>>(path: P, chunk_size: usize) -> Result<ParseOutcome, AnalysisError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| AnalysisError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), chunk_size, "parsing memory analysis log");
    parse_reader(file, chunk_size)
}
