//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with its settings directory pointed at a
//! temporary location and verify outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(config_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_undo-cue"))
        .args(args)
        .env("UNDO_CUE_CONFIG_DIR", config_dir)
        .env_remove("UNDO_CUE_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn event_types(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(|line| {
            let json: serde_json::Value = serde_json::from_str(line).expect("JSON event line");
            json["type"].as_str().unwrap_or_default().to_string()
        })
        .collect()
}

#[test]
fn test_set_volume_clamps() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["set-volume", "-1"]);
    assert_eq!(code, 0, "set-volume failed");
    assert_eq!(stdout.trim(), "volume = 0");

    let (stdout, _, code) = run_cli(dir.path(), &["set-volume", "2"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "volume = 1");

    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "volume"]);
    assert_eq!(stdout.trim(), "1.0");
}

#[test]
fn test_set_delay_clamps() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["set-delay", "10"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "assistance_delay = 5");
}

#[test]
fn test_set_delay_rejects_text() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["set-delay", "abc"]);
    assert_ne!(code, 0, "set-delay abc unexpectedly succeeded");
    assert!(stderr.contains("not a valid number"), "stderr: {stderr}");

    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "assistance_delay"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "0.8");
}

#[test]
fn test_config_list_and_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["volume"], 0.5);
    assert_eq!(json["assistance_delay"], 0.8);

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "theme"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_set_and_reset() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "player", "aplay"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "player"]);
    assert_eq!(stdout.trim(), "aplay");

    let (_, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "player"]);
    assert_eq!(stdout.trim(), "null");
}

#[test]
fn test_simulate_sustained_burst() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &["simulate", "--at", "0,100,200,300", "--delay", "0.25"],
    );
    assert_eq!(code, 0, "simulate failed: {stderr}");
    assert_eq!(
        event_types(&stdout),
        vec![
            "undo_accumulated",
            "undo_accumulated",
            "undo_accumulated",
            "playback_started",
            "playback_stopped",
            "accumulator_reset",
        ]
    );
}

#[test]
fn test_simulate_spread_out_undos_never_play() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["simulate", "--at", "0,400,900"]);
    assert_eq!(code, 0);
    let types = event_types(&stdout);
    assert!(!types.iter().any(|t| t == "playback_started"));
    assert_eq!(types.iter().filter(|t| *t == "accumulator_reset").count(), 4);
}

#[test]
fn test_watch_reads_commands_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_undo-cue"))
        .arg("watch")
        .env("UNDO_CUE_CONFIG_DIR", dir.path())
        .env_remove("UNDO_CUE_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start watch");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"type hello\nu\nstatus\nquit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "watch failed: {stderr}");

    let types = event_types(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(types.first().map(String::as_str), Some("undo_accumulated"));
    assert!(types.iter().any(|t| t == "state_snapshot"));
    assert_eq!(types.last().map(String::as_str), Some("accumulator_reset"));
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("undo-cue"));
}
