//! JSON output format for merged access reports

use crate::aggregate::max_pattern_count;
use crate::parser::ParseStats;
use crate::record::MergedRecord;
use serde::{Deserialize, Serialize};

/// One significant stride of a merged record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonPattern {
    pub step: u64,
    /// Share of merged accesses (0-100)
    pub percentage: f64,
}

/// One (variable, function) entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRecord {
    pub variable: String,
    pub function: String,
    pub elements: u64,
    pub accesses: u64,
    pub patterns: Vec<JsonPattern>,
}

/// Summary statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub total_records: usize,
    pub total_accesses: u64,
    pub max_patterns: usize,
}

/// Complete JSON report
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Output format version
    pub version: String,
    /// Format identifier
    pub format: String,
    pub records: Vec<JsonRecord>,
    pub summary: JsonSummary,
    /// Parser counters (if provided)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_stats: Option<ParseStats>,
}

impl JsonOutput {
    /// Build the report from merged records
    pub fn new(records: &[MergedRecord]) -> Self {
        let json_records = records
            .iter()
            .map(|r| JsonRecord {
                variable: r.var_name.clone(),
                function: r.func_name.clone(),
                elements: r.elements,
                accesses: r.accesses,
                patterns: r
                    .patterns
                    .iter()
                    .map(|p| JsonPattern {
                        step: p.step,
                        percentage: p.percentage,
                    })
                    .collect(),
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "stridemerge-json-v1".to_string(),
            records: json_records,
            summary: JsonSummary {
                total_records: records.len(),
                total_accesses: records
                    .iter()
                    .fold(0u64, |total, r| total.saturating_add(r.accesses)),
                max_patterns: max_pattern_count(records),
            },
            parse_stats: None,
        }
    }

    /// Attach parser counters
    pub fn with_parse_stats(mut self, stats: ParseStats) -> Self {
        self.parse_stats = Some(stats);
        self
    }

    /// Serialize to pretty JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
