//! Tests for `mgsetup status`.

use crate::support::*;

#[test]
fn test_status_masks_sensitive_values() {
    let t = Test::with_host_files();
    assert_success(&t.secrets());
    assert_success(&t.schedule());

    let output = t.status();
    assert_success(&output);
    assert_stdout_contains(&output, "monitor");
    assert_stdout_contains(&output, "-1001234567890");
    assert_stdout_contains(&output, "********");
    assert_never_printed(&output, "pa\"ss");
    assert_never_printed(&output, "123456:ABC");
}

#[test]
fn test_status_reports_block_and_jobs() {
    let t = Test::with_host_files();
    assert_success(&t.schedule());

    let output = t.status();
    assert_success(&output);
    assert_stdout_contains(&output, "present");
    let jobs = stdout(&output)
        .lines()
        .find(|l| l.trim_start().starts_with("jobs"))
        .map(|l| l.split_whitespace().last().unwrap_or("").to_string());
    assert_eq!(jobs.as_deref(), Some("2"));
}

#[test]
fn test_status_without_files() {
    let t = Test::new();

    let output = t.status();
    assert_success(&output);
    assert_stdout_contains(&output, "environment file not found");
    assert_stdout_contains(&output, "absent");
}

#[test]
fn test_status_reports_missing_keys() {
    let t = Test::new();
    t.write(&t.env_file(), "MG_USER=\"monitor\"\n");

    let output = t.status();
    assert_success(&output);
    assert_stdout_contains(&output, "missing");
}
