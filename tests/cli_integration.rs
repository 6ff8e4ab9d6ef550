// CLI integration tests for the foo-demo binary.
use std::process::Command;

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_foo-demo");
    let mut command = Command::new(exe);
    command.env_remove("RUST_LOG");
    command
}

fn parse_json(output: &[u8]) -> Value {
    let text = String::from_utf8_lossy(output);
    let line = text.lines().last().expect("json line");
    serde_json::from_str(line).expect("valid json")
}

#[test]
fn json_report_has_all_fields() {
    let output = cmd()
        .args(["--json", "--input", "7"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let report = parse_json(&output.stdout);
    assert_eq!(report["input"], 7);
    assert_eq!(report["output"], 14);
    assert_eq!(report["text"], "deadbeef");
    let handle = report["handle"].as_str().expect("handle string");
    assert!(u64::from_str_radix(handle, 16).expect("hex") != 0);
}

#[test]
fn extreme_input_wraps_instead_of_overflowing() {
    let output = cmd()
        .args(["--json", "--input", "2147483647"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let report = parse_json(&output.stdout);
    assert_eq!(report["input"], 2147483647);
    assert_eq!(report["output"], -2);
}

#[test]
fn text_report_is_human_readable() {
    let output = cmd().output().expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("doit(21) = 42"));
    assert!(stdout.contains("string is: deadbeef"));
}

#[test]
fn allocation_failure_maps_to_exit_code() {
    let output = cmd().arg("--fail-alloc").output().expect("run");
    assert_eq!(output.status.code(), Some(3));
    let err = parse_json(&output.stderr);
    assert_eq!(err["error"]["kind"], "Allocation");
}

#[test]
fn scan_limit_failure_maps_to_exit_code() {
    let output = cmd().args(["--scan-limit", "2"]).output().expect("run");
    assert_eq!(output.status.code(), Some(4));
    let err = parse_json(&output.stderr);
    assert_eq!(err["error"]["kind"], "Decode");
    assert_eq!(err["error"]["limit"], 2);
}

#[test]
fn bad_arguments_are_usage_errors() {
    let output = cmd().args(["--input", "nope"]).output().expect("run");
    assert_eq!(output.status.code(), Some(2));
    let err = parse_json(&output.stderr);
    assert_eq!(err["error"]["kind"], "Usage");
}
