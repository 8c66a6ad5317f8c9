//! CLI integration tests.
//!
//! Runs the jsondoc binary as a subprocess against temporary files.

use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;

fn write_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn run(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_jsondoc"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to spawn jsondoc: {e}"));
    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}

fn path_of(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

// ============================================================================
// check
// ============================================================================

#[test]
fn cli_check_valid_document() {
    let file = write_file(r#"{"app_name": "weather-station", "version": 2}"#);
    let (code, stdout, _) = run(&["check", path_of(&file)]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");
}

#[test]
fn cli_check_malformed_document() {
    let file = write_file("[1, 2, 3,]");
    let (code, stdout, stderr) = run(&["check", path_of(&file)]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(
        stderr.contains("trailing comma before `]`"),
        "unexpected stderr: {stderr}"
    );
    assert!(stderr.contains("line 1, column 10"), "unexpected stderr: {stderr}");
}

#[test]
fn cli_check_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let (code, _, stderr) = run(&["check", missing.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("failed to read"), "unexpected stderr: {stderr}");
}

// ============================================================================
// dump
// ============================================================================

#[test]
fn cli_dump_compact() {
    let file = write_file("{ \"b\" : [1, 2.5, true] ,\n \"a\" : null }");
    let (code, stdout, _) = run(&["dump", path_of(&file)]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim_end(), r#"{"b":[1,2.5,true],"a":null}"#);
}

#[test]
fn cli_dump_pretty() {
    let file = write_file(r#"{"a": [1], "b": {}}"#);
    let (code, stdout, _) = run(&["dump", "--pretty", "--indent", "4", path_of(&file)]);
    assert_eq!(code, 0);
    assert_eq!(
        stdout.trim_end(),
        "{\n    \"a\": [\n        1\n    ],\n    \"b\": {}\n}"
    );
}

// ============================================================================
// get
// ============================================================================

#[test]
fn cli_get_nested_value() {
    let file = write_file(r#"{ "outer": [ { "inner": "deep" } ] }"#);
    let (code, stdout, _) = run(&["get", path_of(&file), "outer", "0", "inner"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim_end(), "\"deep\"");
}

#[test]
fn cli_get_missing_key() {
    let file = write_file(r#"{"a": 1}"#);
    let (code, stdout, stderr) = run(&["get", path_of(&file), "b"]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("no value at b"), "unexpected stderr: {stderr}");
}

#[test]
fn cli_get_through_scalar_is_type_mismatch() {
    let file = write_file(r#"{"a": 42}"#);
    let (code, _, stderr) = run(&["get", path_of(&file), "a", "b"]);
    assert_eq!(code, 1);
    assert!(
        stderr.contains("type mismatch: expected object, found number"),
        "unexpected stderr: {stderr}"
    );
}

// ============================================================================
// options
// ============================================================================

#[test]
fn cli_duplicate_keys_flag() {
    let file = write_file(r#"{"a": 1, "a": 2}"#);
    let (code, _, _) = run(&["check", path_of(&file)]);
    assert_eq!(code, 1);

    let (code, stdout, _) = run(&["dump", "--allow-duplicate-keys", path_of(&file)]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim_end(), r#"{"a":2}"#);
}

#[test]
fn cli_max_depth_flag() {
    let file = write_file("[[[1]]]");
    let (code, _, _) = run(&["check", path_of(&file)]);
    assert_eq!(code, 0);

    let (code, _, stderr) = run(&["check", "--max-depth", "2", path_of(&file)]);
    assert_eq!(code, 1);
    assert!(
        stderr.contains("nesting depth 3 exceeds limit 2"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn cli_max_depth_above_ceiling_rejected() {
    let file = write_file("[]");
    let (code, stdout, stderr) = run(&["check", "--max-depth", "5000", path_of(&file)]);
    assert_ne!(code, 0);
    assert!(stdout.is_empty());
    assert!(
        stderr.contains("at most 1024 is supported"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn cli_verbose_logs_parse_time() {
    let file = write_file("[]");
    let (code, _, stderr) = run(&["-v", "check", path_of(&file)]);
    assert_eq!(code, 0);
    assert!(stderr.contains("took"), "unexpected stderr: {stderr}");
}
