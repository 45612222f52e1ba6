//! CSV output format for merged access reports
//!
//! One row per (variable, function). Pattern columns are repeated up to the
//! widest pattern list; shorter rows are padded with empty fields.

use crate::aggregate::max_pattern_count;
use crate::record::MergedRecord;

/// CSV output formatter
#[derive(Debug)]
pub struct CsvOutput<'a> {
    records: &'a [MergedRecord],
    max_patterns: usize,
}

impl<'a> CsvOutput<'a> {
    /// Create a formatter sized to the widest pattern list in `records`
    pub fn new(records: &'a [MergedRecord]) -> Self {
        Self {
            records,
            max_patterns: max_pattern_count(records),
        }
    }

    /// Number of Step/Percentage column pairs
    pub fn max_patterns(&self) -> usize {
        self.max_patterns
    }

    /// Generate CSV header row
    fn header(&self) -> String {
        let mut headers: Vec<String> = ["Variable", "Function", "Elements", "Accesses"]
            .iter()
            .map(|h| h.to_string())
            .collect();

        for i in 1..=self.max_patterns {
            headers.push(format!("Pattern_{}_Step", i));
            headers.push(format!("Pattern_{}_Percentage", i));
        }

        headers.join(",")
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Format a merged record as CSV row
    fn format_record(&self, record: &MergedRecord) -> String {
        let mut fields = vec![
            Self::escape_field(&record.var_name),
            Self::escape_field(&record.func_name),
            record.elements.to_string(),
            record.accesses.to_string(),
        ];

        for pattern in &record.patterns {
            fields.push(pattern.step.to_string());
            fields.push(format!("{:.1}", pattern.percentage));
        }

        let padding = self.max_patterns.saturating_sub(record.patterns.len());
        fields.extend(std::iter::repeat(String::new()).take(padding * 2));

        fields.join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.header());
        output.push('\n');

        for record in self.records {
            output.push_str(&self.format_record(record));
            output.push('\n');
        }

        output
    }
}
