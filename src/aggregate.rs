//! Cross-thread aggregation of access records
//!
//! Records sharing a (variable, function) key are merged into one
//! `MergedRecord`: element counts take the maximum, access counts are
//! summed, and each record's percentages are converted back into absolute
//! access counts before being re-normalized against the merged total.

use crate::record::{access_count, AccessRecord, MergedRecord, PatternEntry, MERGED_THREAD_ID};
use fnv::FnvHashMap;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Merged patterns below this share of accesses are dropped
pub const SIGNIFICANCE_THRESHOLD_PERCENT: f64 = 5.0;

/// Per-group accumulator
#[derive(Debug)]
struct GroupAccumulator<'a> {
    var_name: &'a str,
    func_name: &'a str,
    max_elements: u64,
    /// Merged access count, clamped at `u64::MAX`
    total_accesses: u64,
    /// Unclamped access total used to normalize step shares
    access_weight: f64,
    /// Accumulated access count per step
    step_totals: FnvHashMap<u64, f64>,
    /// Steps in first-seen order
    step_order: Vec<u64>,
}

impl<'a> GroupAccumulator<'a> {
    fn new(var_name: &'a str, func_name: &'a str) -> Self {
        Self {
            var_name,
            func_name,
            max_elements: 0,
            total_accesses: 0,
            access_weight: 0.0,
            step_totals: FnvHashMap::default(),
            step_order: Vec::new(),
        }
    }

    fn add(&mut self, record: &AccessRecord) {
        self.max_elements = self.max_elements.max(record.elements);
        self.total_accesses = self.total_accesses.saturating_add(record.accesses);
        self.access_weight += record.accesses as f64;

        for pattern in &record.patterns {
            let count = access_count(pattern, record.accesses);
            match self.step_totals.get_mut(&pattern.step) {
                Some(total) => *total += count,
                None => {
                    self.step_totals.insert(pattern.step, count);
                    self.step_order.push(pattern.step);
                }
            }
        }
    }

    fn into_merged(self) -> MergedRecord {
        let total = self.access_weight;

        let mut patterns: Vec<PatternEntry> = self
            .step_order
            .iter()
            .map(|step| PatternEntry::new(*step, self.step_totals[step] / total * 100.0))
            .filter(|p| p.percentage >= SIGNIFICANCE_THRESHOLD_PERCENT)
            .collect();

        patterns.sort_by(compare_patterns);

        MergedRecord {
            thread_id: MERGED_THREAD_ID,
            var_name: self.var_name.to_string(),
            func_name: self.func_name.to_string(),
            elements: self.max_elements,
            accesses: self.total_accesses,
            patterns,
        }
    }
}

/// Percentage descending, then step ascending for equal percentages
fn compare_patterns(a: &PatternEntry, b: &PatternEntry) -> Ordering {
    b.percentage
        .partial_cmp(&a.percentage)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.step.cmp(&b.step))
}

/// Merge per-thread records into one record per (variable, function).
///
/// Groups come out in the order their key first appears in `records`.
/// Records with zero accesses are skipped. A group whose access total
/// exceeds `u64::MAX` reports `u64::MAX` accesses; its percentages are
/// still computed from the exact total.
pub fn merge_records(records: &[AccessRecord]) -> Vec<MergedRecord> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut groups: Vec<GroupAccumulator<'_>> = Vec::new();

    for record in records.iter().filter(|r| r.has_accesses()) {
        let key = (record.var_name.as_str(), record.func_name.as_str());
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(GroupAccumulator::new(key.0, key.1));
            groups.len() - 1
        });
        groups[slot].add(record);
    }

    tracing::debug!(
        input_records = records.len(),
        groups = groups.len(),
        "merged access records"
    );

    groups.into_iter().map(GroupAccumulator::into_merged).collect()
}

/// Widest pattern list across merged records (0 when empty)
pub fn max_pattern_count(records: &[MergedRecord]) -> usize {
    records.iter().map(|r| r.patterns.len()).max().unwrap_or(0)
}
