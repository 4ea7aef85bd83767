//! End-to-end tests for the `meter` binary.
//!
//! Each test runs the real binary with `HOME` and `XDG_CONFIG_HOME` pointed at
//! a temp directory so no user configuration leaks in.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::{NamedTempFile, TempDir};

fn meter_binary() -> String {
    env!("CARGO_BIN_EXE_meter").to_string()
}

fn run_meter(home: &Path, args: &[&str]) -> Output {
    run_meter_with_env(home, &[], args)
}

fn run_meter_with_env(home: &Path, vars: &[(&str, &str)], args: &[&str]) -> Output {
    Command::new(meter_binary())
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .envs(vars.iter().copied())
        .args(args)
        .output()
        .expect("failed to run meter")
}

/// Parses `NAME=value` lines into a map.
fn parse_assignments(stdout: &[u8]) -> HashMap<String, String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

fn write_transcript(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

const SESSION: &[&str] = &[
    r#"{"type":"user","userType":"external","message":{"role":"user","content":"run the tests"},"timestamp":"2024-03-01T09:00:00Z"}"#,
    r#"{"type":"assistant","message":{"content":[{"type":"text","text":"Running them."},{"type":"tool_use","name":"Bash","input":{"command":"cargo test --workspace"}}]},"timestamp":"2024-03-01T09:00:10Z"}"#,
    r#"not json at all"#,
    r#"{"type":"assistant","message":{"content":[{"type":"tool_use","name":"Bash","input":{"command":"pytest -x"}}]},"timestamp":"2024-03-01T09:00:20Z"}"#,
    r#"{"type":"user","userType":"external","message":{"role":"user","content":"thanks"},"timestamp":"2024-03-01T09:00:30Z"}"#,
];

#[test]
fn test_transcript_outputs_sorted_assignments() {
    let home = TempDir::new().unwrap();
    let transcript = write_transcript(SESSION);

    let output = run_meter(home.path(), &["transcript", transcript.path().to_str().unwrap()]);
    assert!(
        output.status.success(),
        "meter transcript should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let names: Vec<_> = stdout.lines().filter_map(|l| l.split_once('=')).map(|(n, _)| n).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted, "assignments should be sorted by name");
    assert_eq!(names.len(), 16);

    let vars = parse_assignments(&output.stdout);
    // The session ended long ago, so the last tool call is stale.
    assert_eq!(vars["T_MODE"], "'idle'");
    assert_eq!(vars["T_USER_TOTAL"], "2");
    assert_eq!(vars["T_CLAUDE_TOTAL"], "1");
    assert_eq!(vars["T_INACTIVE_SECS"], "0");
    assert_eq!(vars["T_PACE_AVG"], "10.0");
    assert_eq!(vars["T_FOCUS_CURR_TYPE"], "'none'");
    assert_eq!(vars["T_TOP_EDIT_FILE"], "''");
}

#[test]
fn test_transcript_missing_file_is_silent_success() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("nope.jsonl");

    let output = run_meter(home.path(), &["transcript", missing.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("# Transcript not found"));
}

#[test]
fn test_transcript_without_path_is_silent_success() {
    let home = TempDir::new().unwrap();

    let output = run_meter(home.path(), &["transcript"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("# No transcript path provided"));
}

#[test]
fn test_transcript_malformed_override_uses_defaults() {
    let home = TempDir::new().unwrap();
    let transcript = write_transcript(SESSION);
    let path = transcript.path().to_str().unwrap();

    let baseline = run_meter(home.path(), &["transcript", path]);
    let output = run_meter(home.path(), &["transcript", path, "{broken"]);
    assert!(output.status.success());
    assert_eq!(output.stdout, baseline.stdout);
}

#[test]
fn test_transcript_override_applies() {
    let home = TempDir::new().unwrap();
    let transcript = write_transcript(SESSION);
    let path = transcript.path().to_str().unwrap();

    let output = run_meter(home.path(), &["transcript", path, r#"{"stride_window": 1}"#]);
    assert!(output.status.success());

    let vars = parse_assignments(&output.stdout);
    assert_eq!(vars["T_USER_RECENT"], "1");
    assert_eq!(vars["T_CLAUDE_RECENT"], "0");
    assert_eq!(vars["T_USER_TOTAL"], "2");
}

#[test]
fn test_transcript_reads_config_file() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config/meter");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "stride_window = 2\n").unwrap();
    let transcript = write_transcript(SESSION);

    let output = run_meter(home.path(), &["transcript", transcript.path().to_str().unwrap()]);
    assert!(output.status.success());

    let vars = parse_assignments(&output.stdout);
    assert_eq!(vars["T_USER_RECENT"], "1");
    assert_eq!(vars["T_CLAUDE_RECENT"], "1");
}

#[test]
fn test_transcript_skips_bad_config_file_values() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config/meter");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "stride_window = \"wide\"\n[mode]\nidle_threshold = 1e12\n",
    )
    .unwrap();
    let transcript = write_transcript(SESSION);

    let output = run_meter(home.path(), &["transcript", transcript.path().to_str().unwrap()]);
    assert!(
        output.status.success(),
        "bad config values should not fail the run: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let vars = parse_assignments(&output.stdout);
    assert_eq!(vars.len(), 16);
    assert_eq!(vars["T_USER_RECENT"], "2");
    // The valid idle threshold still applies, so the stale session is not idle.
    assert_eq!(vars["T_MODE"], "'testing'");
}

#[test]
fn test_transcript_skips_bad_env_values() {
    let home = TempDir::new().unwrap();
    let transcript = write_transcript(SESSION);
    let path = transcript.path().to_str().unwrap();

    let output = run_meter_with_env(
        home.path(),
        &[
            ("METER_STRIDE_WINDOW", "wide"),
            ("METER_MODE", "x"),
            ("METER_FOCUS_WINDOW", "5"),
        ],
        &["transcript", path],
    );
    assert!(
        output.status.success(),
        "bad env values should not fail the run: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let vars = parse_assignments(&output.stdout);
    assert_eq!(vars.len(), 16);
    assert_eq!(vars["T_USER_RECENT"], "2");
    assert_eq!(vars["T_MODE"], "'idle'");
}

#[test]
fn test_transcript_env_overrides_nested_keys() {
    let home = TempDir::new().unwrap();
    let transcript = write_transcript(SESSION);

    let output = run_meter_with_env(
        home.path(),
        &[("METER_MODE__IDLE_THRESHOLD", "1000000000000")],
        &["transcript", transcript.path().to_str().unwrap()],
    );
    assert!(output.status.success());
    assert_eq!(parse_assignments(&output.stdout)["T_MODE"], "'testing'");
}

#[test]
fn test_transcript_json_output() {
    let home = TempDir::new().unwrap();
    let transcript = write_transcript(SESSION);

    let output = run_meter(
        home.path(),
        &["transcript", transcript.path().to_str().unwrap(), "--json"],
    );
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["mode"], "idle");
    assert_eq!(value["stride"]["user_total"], 2);
    assert_eq!(value["timing"]["inactive_secs"], 0);
    assert_eq!(value["focus"]["current"]["type"], "none");
}

#[test]
fn test_transcript_after_compaction() {
    let home = TempDir::new().unwrap();
    let mut lines = SESSION.to_vec();
    lines.push(r#"{"type":"system","subtype":"compact_boundary","timestamp":"2024-03-01T10:00:00Z"}"#);
    lines.push(r#"{"type":"user","userType":"external","message":{"role":"user","content":"continue"},"timestamp":"2024-03-01T10:00:05Z"}"#);
    let transcript = write_transcript(&lines);

    let output = run_meter(home.path(), &["transcript", transcript.path().to_str().unwrap()]);
    assert!(output.status.success());

    let vars = parse_assignments(&output.stdout);
    assert_eq!(vars["T_USER_TOTAL"], "1");
    assert_eq!(vars["T_CLAUDE_TOTAL"], "0");
    assert_eq!(vars["T_MODE"], "'talking'");
    assert_eq!(vars["T_PACE_AVG"], "0.0");
}

#[test]
fn test_context_command() {
    let home = TempDir::new().unwrap();
    let transcript = write_transcript(&[
        r#"{"type":"user","message":{"content":"<local-command-stdout>Context Usage\nSystem prompt: 2.8k tokens\nMCP tools: 450 tokens\n</local-command-stdout>"}}"#,
    ]);

    let output = run_meter(home.path(), &["context", transcript.path().to_str().unwrap()]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["system_prompt"], 2800);
    assert_eq!(value["mcp_tools"], 450);
    assert!(value["timestamp"].is_string());
}

#[test]
fn test_context_command_without_report_prints_nothing() {
    let home = TempDir::new().unwrap();
    let transcript = write_transcript(SESSION);

    let output = run_meter(home.path(), &["context", transcript.path().to_str().unwrap()]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_no_subcommand_prints_help() {
    let home = TempDir::new().unwrap();

    let output = run_meter(home.path(), &[]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("transcript"));
}
