//! Sprint 2: CLI and output format tests
#![allow(deprecated)] // assert_cmd::Command::cargo_bin deprecation
//!
//! End-to-end runs of the stridemerge binary against temporary logs.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TWO_THREAD_LOG: &str = "\
boot: 24 cores online
[Memory Analysis] thread 0: x in foo: elements=100, accesses=1000
  Pattern 1: step=4 (80.0%)
  Pattern 2: step=8 (20.0%)
[Memory Analysis] thread 1: y in bar: elements=64, accesses=500
  Pattern 1: step=2 (100.0%)
[Memory Analysis] thread 2: y in bar: elements=64, accesses=500
  Pattern 1: step=2 (100.0%)
[Memory Analysis] thread 3: z in bar: elements=8, accesses=0
  Pattern 1: step=1 (100.0%)
";

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/mixed_threads.log")
}

fn write_log(dir: &TempDir, content: &[u8]) -> PathBuf {
    let path = dir.path().join("run.log");
    fs::write(&path, content).unwrap();
    path
}

fn stridemerge() -> Command {
    Command::cargo_bin("stridemerge").unwrap()
}

// ============================================================================
// CSV output
// ============================================================================

#[test]
fn test_csv_default_output_file() {
    let tmp = TempDir::new().unwrap();
    let log = write_log(&tmp, TWO_THREAD_LOG.as_bytes());

    stridemerge()
        .current_dir(tmp.path())
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("Analysis complete"))
        .stdout(predicate::str::contains("memory_analysis.csv"));

    let csv = fs::read_to_string(tmp.path().join("memory_analysis.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Variable,Function,Elements,Accesses,Pattern_1_Step,Pattern_1_Percentage,Pattern_2_Step,Pattern_2_Percentage"
    );
    assert_eq!(lines[1], "x,foo,100,1000,4,80.0,8,20.0");
    assert_eq!(lines[2], "y,bar,64,1000,2,100.0,,");
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_csv_never_contains_zero_access_record() {
    let tmp = TempDir::new().unwrap();
    let log = write_log(&tmp, TWO_THREAD_LOG.as_bytes());
    let out = tmp.path().join("out.csv");

    stridemerge().arg("-o").arg(&out).arg(&log).assert().success();

    let csv = fs::read_to_string(out).unwrap();
    assert!(!csv.lines().any(|l| l.starts_with("z,")));
}

#[test]
fn test_csv_from_binary_fixture() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("fixture.csv");

    stridemerge()
        .arg("--output")
        .arg(&out)
        .arg(fixture_path())
        .assert()
        .success();

    let csv = fs::read_to_string(out).unwrap();
    assert!(csv.contains("matrix_a,gemm_kernel,4096,16384,1,80.0,64,20.0"));
    assert!(csv.contains("idx,scatter,1024,2000,3,98.0,,"));
    assert!(!csv.contains("scratch"));
    assert!(!csv.contains("lost"));
}

// ============================================================================
// Other formats
// ============================================================================

#[test]
fn test_json_format() {
    let tmp = TempDir::new().unwrap();
    let log = write_log(&tmp, TWO_THREAD_LOG.as_bytes());
    let out = tmp.path().join("report.json");

    stridemerge()
        .arg("--format")
        .arg("json")
        .arg("-o")
        .arg(&out)
        .arg(&log)
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
    assert_eq!(json["format"], "stridemerge-json-v1");
    assert_eq!(json["summary"]["total_records"], 2);
    assert_eq!(json["summary"]["total_accesses"], 2000);
    assert_eq!(json["records"][1]["variable"], "y");
    assert_eq!(json["parse_stats"]["zero_access_records"], 1);
}

#[test]
fn test_text_format_to_stdout() {
    let tmp = TempDir::new().unwrap();
    let log = write_log(&tmp, TWO_THREAD_LOG.as_bytes());

    stridemerge()
        .current_dir(tmp.path())
        .arg("--format")
        .arg("text")
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("Variable"))
        .stdout(predicate::str::contains("step=4 (80.0%)"))
        .stdout(predicate::str::contains("2 variable(s), 2000 total accesses"));

    assert!(!tmp.path().join("memory_analysis.csv").exists());
}

#[test]
fn test_config_file_sets_format() {
    let tmp = TempDir::new().unwrap();
    let log = write_log(&tmp, TWO_THREAD_LOG.as_bytes());
    let config = tmp.path().join("stridemerge.toml");
    fs::write(&config, "format = \"json\"\nchunk_size = 3\n").unwrap();

    stridemerge()
        .current_dir(tmp.path())
        .arg("--config")
        .arg(&config)
        .arg(&log)
        .assert()
        .success();

    assert!(tmp.path().join("memory_analysis.json").exists());
}

#[test]
fn test_stats_flag() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out.csv");

    stridemerge()
        .arg("--stats")
        .arg("-o")
        .arg(&out)
        .arg(fixture_path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Parse Statistics"))
        .stderr(predicate::str::contains("zero-access records: 1"));
}

// ============================================================================
// Exit behavior
// ============================================================================

#[test]
fn test_missing_input_exits_1() {
    stridemerge()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_nonexistent_input_exits_1() {
    stridemerge()
        .arg("/nonexistent/stridemerge/run.log")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("/nonexistent/stridemerge/run.log"));
}

#[test]
fn test_no_records_warns_and_succeeds() {
    let tmp = TempDir::new().unwrap();
    let log = write_log(&tmp, b"Pattern 1: step=4 (80.0%)\nnoise only\n");

    stridemerge()
        .current_dir(tmp.path())
        .arg(&log)
        .assert()
        .success()
        .stderr(predicate::str::contains("no valid memory analysis records found"));

    assert!(!tmp.path().join("memory_analysis.csv").exists());
}

#[test]
fn test_malformed_line_warns_and_continues() {
    let tmp = TempDir::new().unwrap();
    let log = write_log(
        &tmp,
        b"[Memory Analysis] thread 0: x in foo: elements=1, accesses=10\n\
          Pattern 1: step=1 (1.2.3%)\n\
          Pattern 2: step=2 (100.0%)\n",
    );
    let out = tmp.path().join("out.csv");

    stridemerge()
        .arg("-o")
        .arg(&out)
        .arg(&log)
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping line"));

    let csv = fs::read_to_string(out).unwrap();
    assert!(csv.contains("x,foo,1,10,2,100.0"));
}

#[test]
fn test_unusable_header_does_not_leak_patterns() {
    let tmp = TempDir::new().unwrap();
    let log = write_log(
        &tmp,
        b"[Memory Analysis] thread 0: x in foo: elements=8, accesses=100\n\
          Pattern 1: step=1 (100.0%)\n\
          [Memory Analysis] thread 1: y in bar: elements=8, accesses=99999999999999999999999\n\
          Pattern 1: step=64 (100.0%)\n",
    );
    let out = tmp.path().join("out.csv");

    stridemerge()
        .arg("-o")
        .arg(&out)
        .arg(&log)
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping line"));

    let csv = fs::read_to_string(out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Variable,Function,Elements,Accesses,Pattern_1_Step,Pattern_1_Percentage");
    assert_eq!(lines[1], "x,foo,8,100,1,100.0");
    assert_eq!(lines.len(), 2);
}

#[test]
fn test_zero_chunk_size_rejected() {
    let tmp = TempDir::new().unwrap();
    let log = write_log(&tmp, TWO_THREAD_LOG.as_bytes());

    stridemerge()
        .arg("--chunk-size")
        .arg("0")
        .arg(&log)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("chunk_size"));
}
