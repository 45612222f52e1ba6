//! stridemerge - Merge per-thread memory access stride histograms
//!
//! This library recovers memory access records from the noisy text logs an
//! instrumented program prints, merges the per-thread stride histograms for
//! each (variable, function) pair, and renders the result as CSV, JSON or a
//! text table.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod json_output;
pub mod parser;
pub mod record;
pub mod report;
pub mod sanitize;
pub mod text_output;
