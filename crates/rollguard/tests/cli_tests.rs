//! End-to-end tests for the rollguard binary
//!
//! Each test runs the compiled binary from an empty temporary directory so
//! no stray rollguard.yaml is picked up.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

// ─── Helpers ───────────────────────────────────────────────────────────────

fn rollguard(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rollguard"))
        .args(args)
        .current_dir(dir)
        .env_remove("ROLLGUARD_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run rollguard binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

// ─── evaluate ──────────────────────────────────────────────────────────────

#[test]
fn test_evaluate_exit_codes_follow_threshold() {
    let dir = TempDir::new().unwrap();
    let cases = [("120", Some(2)), ("90", Some(0)), ("100", Some(2))];

    for (p95, expected) in cases {
        let output = rollguard(
            dir.path(),
            &["evaluate", "--p95-ms", p95, "--threshold-ms", "100"],
        );
        assert_eq!(output.status.code(), expected, "p95={}", p95);
    }
}

#[test]
fn test_evaluate_json_reports_reason() {
    let dir = TempDir::new().unwrap();
    let output = rollguard(
        dir.path(),
        &["evaluate", "--p95-ms", "150", "--threshold-ms", "100", "--json"],
    );

    assert_eq!(output.status.code(), Some(2));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["verdict"], "rollback");
    assert_eq!(json["metric"], "p95-latency");
    assert_eq!(json["threshold_ms"], 100.0);
}

#[test]
fn test_evaluate_uses_config_file_threshold() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "rollguard.yaml", "canary:\n  p95-threshold-ms: 50\n");

    let output = rollguard(dir.path(), &["evaluate", "--p95-ms", "60"]);
    assert_eq!(output.status.code(), Some(2));

    let output = rollguard(dir.path(), &["evaluate", "--p95-ms", "40"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_evaluate_error_rate_ignored_without_threshold() {
    let dir = TempDir::new().unwrap();

    let output = rollguard(
        dir.path(),
        &["evaluate", "--p95-ms", "10", "--error-rate", "0.9"],
    );
    assert_eq!(output.status.code(), Some(0));

    let output = rollguard(
        dir.path(),
        &[
            "evaluate",
            "--p95-ms",
            "10",
            "--error-rate",
            "0.9",
            "--error-rate-threshold",
            "0.5",
        ],
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_evaluate_rejects_non_positive_threshold() {
    let dir = TempDir::new().unwrap();
    let output = rollguard(
        dir.path(),
        &["evaluate", "--p95-ms", "10", "--threshold-ms", "0"],
    );
    assert_eq!(output.status.code(), Some(1));
}

// ─── gate ──────────────────────────────────────────────────────────────────

#[test]
fn test_gate_reads_metrics_file() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "rollguard.yaml", "canary:\n  p95-threshold-ms: 100\n");
    let metrics = write_file(&dir, "canary.json", r#"{"p95_latency_ms": 87.5}"#);

    let output = rollguard(dir.path(), &["gate", "--metrics-file", &metrics, "--json"]);
    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["verdict"], "healthy");
}

#[test]
fn test_gate_fails_after_retries_on_missing_file() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "rollguard.yaml",
        "retry:\n  max-attempts: 2\n  base-delay-ms: 1\n",
    );
    let missing = dir.path().join("missing.json");

    let output = rollguard(
        dir.path(),
        &["gate", "--metrics-file", missing.to_str().unwrap()],
    );
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("2 attempts"), "stderr: {}", stderr);
}

#[test]
fn test_gate_does_not_retry_malformed_metrics() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "rollguard.yaml",
        "retry:\n  max-attempts: 5\n  base-delay-ms: 60000\n",
    );
    let metrics = write_file(&dir, "canary.json", r#"{"p95_latency_ms": -3.0}"#);

    let started = std::time::Instant::now();
    let output = rollguard(dir.path(), &["gate", "--metrics-file", &metrics]);

    assert_eq!(output.status.code(), Some(1));
    assert!(started.elapsed() < std::time::Duration::from_secs(30));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("non-retryable"), "stderr: {}", stderr);
}

#[test]
fn test_gate_reports_rollback_once_on_stderr() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "rollguard.yaml", "canary:\n  p95-threshold-ms: 100\n");
    let metrics = write_file(&dir, "canary.json", r#"{"p95_latency_ms": 250.0}"#);

    let output = rollguard(dir.path(), &["gate", "--metrics-file", &metrics]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Rollback advised").count(), 1, "stderr: {}", stderr);
    assert!(!stderr.contains("canary breached threshold"), "stderr: {}", stderr);
}

// ─── config ────────────────────────────────────────────────────────────────

#[test]
fn test_config_validate_rejects_zero_attempts() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "bad.yaml", "retry:\n  max-attempts: 0\n");

    let output = rollguard(dir.path(), &["config", "validate", "--file", &path]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_config_show_defaults_as_json() {
    let dir = TempDir::new().unwrap();
    let output = rollguard(dir.path(), &["config", "show", "--json"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["retry"]["max-attempts"], 5);
    assert_eq!(json["retry"]["base-delay-ms"], 100);
    assert_eq!(json["canary"]["p95-threshold-ms"], 1000.0);
}

#[test]
fn test_quiet_flag_help_describes_log_filter() {
    let dir = TempDir::new().unwrap();
    let output = rollguard(dir.path(), &["--help"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Only log errors"));
}

#[test]
fn test_version_json() {
    let dir = TempDir::new().unwrap();
    let output = rollguard(dir.path(), &["version", "--json"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["defaults"]["retry"]["base-delay-ms"], 100);
}
