//! CLI flag validation tests
//!
//! Exercise the argument surface without running full analyses: missing
//! required flags, rejected values, and the usage error exit code.

use std::process::Command;

fn run(args: &[&str]) -> (String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_ruletrace"))
        .args(args)
        .output()
        .expect("Failed to execute ruletrace binary");
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stderr, output.status.code().unwrap_or(-1))
}

#[test]
fn test_analyze_requires_graph_target_and_out() {
    let (stderr, code) = run(&["analyze"]);
    assert_eq!(code, 2, "clap usage errors exit 2");
    assert!(stderr.contains("--graph"));
    assert!(stderr.contains("--target"));
    assert!(stderr.contains("--out"));
}

#[test]
fn test_max_paths_zero_is_rejected() {
    let (stderr, code) = run(&[
        "analyze", "--graph", "g.dot", "--target", "t", "--out", "o.csv", "--max-paths", "0",
    ]);
    assert_eq!(code, 2);
    assert!(stderr.contains("at least 1"));
}

#[test]
fn test_bad_gating_value_is_rejected() {
    let (stderr, code) = run(&[
        "analyze", "--graph", "g.dot", "--target", "t", "--out", "o.csv", "--gating", "loose",
    ]);
    assert_eq!(code, 2);
    assert!(stderr.contains("strict") || stderr.contains("possible values"));
}

#[test]
fn test_bad_format_value_is_rejected() {
    let (_, code) = run(&[
        "analyze", "--graph", "g.dot", "--target", "t", "--out", "o.csv", "--format", "sarif",
    ]);
    assert_eq!(code, 2);
}

#[test]
fn test_bad_log_level_is_rejected() {
    let (_, code) = run(&["--log-level", "loud", "inspect", "--graph", "g.dot"]);
    assert_eq!(code, 2);
}

#[test]
fn test_version_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_ruletrace"))
        .arg("--version")
        .output()
        .expect("Failed to execute ruletrace binary");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ruletrace"));
}

#[test]
fn test_help_mentions_subcommands() {
    let output = Command::new(env!("CARGO_BIN_EXE_ruletrace"))
        .arg("--help")
        .output()
        .expect("Failed to execute ruletrace binary");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("analyze"));
    assert!(stdout.contains("inspect"));
    assert!(stdout.contains("init"));
}
