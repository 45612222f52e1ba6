//! Human-readable table of merged access records

use crate::record::MergedRecord;
use std::fmt::Write;

const HEADERS: [&str; 5] = ["Variable", "Function", "Elements", "Accesses", "Patterns"];

fn format_patterns(record: &MergedRecord) -> String {
    if record.patterns.is_empty() {
        return "-".to_string();
    }
    record
        .patterns
        .iter()
        .map(|p| format!("step={} ({:.1}%)", p.step, p.percentage))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render records as an aligned table, one line per record
pub fn render_table(records: &[MergedRecord]) -> String {
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            [
                r.var_name.clone(),
                r.func_name.clone(),
                r.elements.to_string(),
                r.accesses.to_string(),
                format_patterns(r),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<w0$}  {:<w1$}  {:>w2$}  {:>w3$}  {}",
        HEADERS[0],
        HEADERS[1],
        HEADERS[2],
        HEADERS[3],
        HEADERS[4],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
    );
    let rule_len = widths[..4].iter().sum::<usize>() + 8 + widths[4];
    let _ = writeln!(output, "{}", "─".repeat(rule_len));

    for row in &rows {
        let _ = writeln!(
            output,
            "{:<w0$}  {:<w1$}  {:>w2$}  {:>w3$}  {}",
            row[0],
            row[1],
            row[2],
            row[3],
            row[4],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        );
    }

    let total = records
        .iter()
        .fold(0u64, |total, r| total.saturating_add(r.accesses));
    let _ = writeln!(
        output,
        "\n{} variable(s), {} total accesses",
        records.len(),
        total
    );

    output
}
