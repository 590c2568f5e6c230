//! Tests for `mgsetup secrets`.

use crate::support::*;

#[test]
fn test_secrets_creates_environment_file() {
    let t = Test::new();

    let output = t.secrets();
    assert_success(&output);
    assert_stdout_contains(&output, "environment file updated");

    let expected: String = STANDARD_ASSIGNMENTS
        .iter()
        .map(|l| format!("{}\n", l))
        .collect();
    assert_eq!(t.read(&t.env_file()), expected);
}

#[test]
fn test_secrets_keeps_unrelated_lines_first() {
    let t = Test::with_host_files();

    assert_success(&t.secrets());

    let contents = t.read(&t.env_file());
    assert!(contents.starts_with(SAMPLE_ENVIRONMENT));
    for line in STANDARD_ASSIGNMENTS {
        assert_single_line(&contents, line);
    }
}

#[test]
fn test_secrets_twice_is_byte_identical() {
    let t = Test::with_host_files();

    assert_success(&t.secrets());
    let first = t.read(&t.env_file());
    assert_success(&t.secrets());
    let second = t.read(&t.env_file());

    assert_eq!(first, second);
}

#[test]
fn test_secrets_replaces_previous_values() {
    let t = Test::new();
    t.write(
        &t.env_file(),
        "MG_USER=\"old\"\nLANG=C\nMG_USER=\"older\"\nMG_USER_HOME=/home/mg\n",
    );

    assert_success(&t.secrets());

    let contents = t.read(&t.env_file());
    assert!(contents.starts_with("LANG=C\nMG_USER_HOME=/home/mg\n"));
    assert!(!contents.contains("old"));
    assert_single_line(&contents, r#"MG_USER="monitor""#);
}

#[test]
fn test_secrets_writes_backup_of_previous_file() {
    let t = Test::with_host_files();

    assert_success(&t.secrets());

    let backups: Vec<String> = t
        .entries()
        .into_iter()
        .filter(|n| n.starts_with("environment.bak."))
        .collect();
    assert_eq!(backups.len(), 1, "entries: {:?}", t.entries());
    let backup = t.dir.path().join(&backups[0]);
    assert_eq!(std::fs::read_to_string(backup).unwrap(), SAMPLE_ENVIRONMENT);
}

#[test]
fn test_secrets_never_prints_values() {
    let t = Test::new();

    let output = t.cmd().arg("--verbose").envs(STANDARD_VALUES.iter().copied()).arg("secrets").output().unwrap();
    assert_success(&output);
    assert_never_printed(&output, "pa\"ss");
    assert_never_printed(&output, "123456:ABC");
}

#[test]
fn test_secrets_missing_key_without_terminal_fails() {
    let t = Test::with_host_files();

    let output = t.secrets_with(&[("MG_USER", "monitor"), ("MG_PASSWORD", "pw")]);
    assert_failure(&output);
    assert_stderr_contains(&output, "MG_TG_TOKEN");
    assert_stderr_contains(&output, "sudo MG_USER=");
    assert_eq!(t.read(&t.env_file()), SAMPLE_ENVIRONMENT);
}

#[test]
fn test_secrets_empty_value_counts_as_missing() {
    let t = Test::new();

    let mut values = STANDARD_VALUES.to_vec();
    values[3] = ("MG_TG_CHAT", "");
    let output = t.secrets_with(&values);

    assert_failure(&output);
    assert_stderr_contains(&output, "MG_TG_CHAT");
    assert!(!t.env_file().exists());
}

#[test]
fn test_secrets_multiline_value_is_refused() {
    let t = Test::with_host_files();

    let mut values = STANDARD_VALUES.to_vec();
    values[1] = ("MG_PASSWORD", "first\nsecond");
    let output = t.secrets_with(&values);

    assert_failure(&output);
    assert_stderr_contains(&output, "MG_PASSWORD spans several lines");
    assert_eq!(t.read(&t.env_file()), SAMPLE_ENVIRONMENT);
}
