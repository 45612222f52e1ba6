//! Access record model
//!
//! One `AccessRecord` describes what a single thread observed for one
//! variable inside one function: the element count, the total number of
//! accesses, and a stride histogram expressed in percentages.

use serde::{Deserialize, Serialize};

/// Thread id carried by merged records, where thread identity no longer applies
pub const MERGED_THREAD_ID: u64 = 0;

/// Share of accesses made with a given stride
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternEntry {
    /// Stride between consecutive accesses, in elements
    pub step: u64,
    /// Percentage of the owning record's accesses (0-100)
    pub percentage: f64,
}

impl PatternEntry {
    pub fn new(step: u64, percentage: f64) -> Self {
        Self { step, percentage }
    }
}

/// Number of accesses a pattern stands for, given its owner's total.
///
/// Not rounded; callers accumulate these before converting back to a
/// percentage.
pub fn access_count(pattern: &PatternEntry, owner_accesses: u64) -> f64 {
    owner_accesses as f64 * pattern.percentage / 100.0
}

/// Accesses observed by one thread for one (variable, function) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub thread_id: u64,
    pub var_name: String,
    pub func_name: String,
    /// Element count of the array
    pub elements: u64,
    /// Total access count
    pub accesses: u64,
    /// Stride histogram, in log order (steps may repeat)
    pub patterns: Vec<PatternEntry>,
}

impl AccessRecord {
    /// Create a record with an empty pattern list
    pub fn new(
        thread_id: u64,
        var_name: impl Into<String>,
        func_name: impl Into<String>,
        elements: u64,
        accesses: u64,
    ) -> Self {
        Self {
            thread_id,
            var_name: var_name.into(),
            func_name: func_name.into(),
            elements,
            accesses,
            patterns: Vec::new(),
        }
    }

    /// Builder-style pattern append, mostly for tests and fixtures
    pub fn with_pattern(mut self, step: u64, percentage: f64) -> Self {
        self.patterns.push(PatternEntry::new(step, percentage));
        self
    }

    /// Records with no accesses carry no information and are never kept
    pub fn has_accesses(&self) -> bool {
        self.accesses > 0
    }
}

/// Aggregated view of one (variable, function) pair across all threads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    /// Always [`MERGED_THREAD_ID`]
    pub thread_id: u64,
    pub var_name: String,
    pub func_name: String,
    /// Largest element count reported by any thread
    pub elements: u64,
    /// Sum of accesses over all threads
    pub accesses: u64,
    /// Significant patterns, highest percentage first
    pub patterns: Vec<PatternEntry>,
}
