//! Tests for global flags and failure reporting.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help() {
    let t = Test::new();

    t.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage").and(predicate::str::contains("install")));
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    let output = t.cmd().arg("--version").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert_failure(&output);
}

#[test]
fn test_completions_bash() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mgsetup"));
}

#[test]
fn test_install_refuses_before_touching_host() {
    let t = Test::new();

    // Fails on privileges as a normal user and on the missing repository as
    // root; either way before any package or file step.
    let output = t
        .cmd()
        .envs(STANDARD_VALUES.iter().copied())
        .args(["install", "--skip-packages"])
        .output()
        .unwrap();

    assert_failure(&output);
    let err = stderr(&output);
    assert!(
        err.contains("root privileges required") || err.contains("no source repository"),
        "unexpected stderr: {}",
        err
    );
    assert!(err.contains("→"), "missing hint: {}", err);
    assert!(!t.env_file().exists());
    assert!(!t.schedule_file().exists());
}

#[test]
fn test_invalid_config_is_reported() {
    let t = Test::new();
    t.write(&t.config(), "[source]\nrepo = \"typo\"\n");

    t.cmd()
        .arg("status")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let t = Test::new();

    let output = t
        .cmd()
        .arg("--verbose")
        .envs(STANDARD_VALUES.iter().copied())
        .arg("secrets")
        .output()
        .unwrap();
    assert_success(&output);
    assert_stderr_contains(&output, "environment file updated");
}
