//! Tests for `mgsetup schedule`.

use crate::support::*;

#[test]
fn test_schedule_appends_block_after_operator_jobs() {
    let t = Test::with_host_files();

    let output = t.schedule();
    assert_success(&output);
    assert_stdout_contains(&output, "managed block added");

    let contents = t.read(&t.schedule_file());
    let expected = format!(
        "{}{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n",
        SAMPLE_CRONTAB,
        BLOCK_BEGIN,
        "MG_USER=monitor",
        r#"MG_PASSWORD=pa"ss\word"#,
        "MG_TG_TOKEN=123456:ABC-def_ghi",
        "MG_TG_CHAT=-1001234567890",
        "PATH=/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin",
        "SHELL=/bin/bash",
        "*/5 * * * * /usr/local/bin/proxysmart_modems_check.py >> /var/log/proxysmart_modems_check.log 2>&1",
        "0 * * * * /usr/local/bin/proxysmart_modems_list.py >> /var/log/proxysmart_modems_list.log 2>&1",
        BLOCK_END,
    );
    assert_eq!(contents, expected);
}

#[test]
fn test_schedule_twice_is_byte_identical() {
    let t = Test::with_host_files();

    assert_success(&t.schedule());
    let first = t.read(&t.schedule_file());

    let output = t.schedule();
    assert_success(&output);
    assert_stdout_contains(&output, "managed block replaced");
    assert_eq!(first, t.read(&t.schedule_file()));
    assert_single_line(&first, BLOCK_BEGIN);
}

#[test]
fn test_schedule_keeps_lines_around_existing_block() {
    let t = Test::new();
    t.write(&t.template(), SAMPLE_TEMPLATE);
    t.write(
        &t.schedule_file(),
        &format!(
            "MAILTO=ops\n{}\nMG_USER=stale\n* * * * * /old/job\n{}\n0 3 * * * /usr/bin/backup.sh\n",
            BLOCK_BEGIN, BLOCK_END
        ),
    );

    assert_success(&t.schedule());

    let contents = t.read(&t.schedule_file());
    assert!(contents.starts_with("MAILTO=ops\n0 3 * * * /usr/bin/backup.sh\n"));
    assert!(!contents.contains("/old/job"));
    assert!(!contents.contains("stale"));
}

#[test]
fn test_schedule_does_not_touch_environment_file() {
    let t = Test::with_host_files();

    assert_success(&t.schedule());
    assert_eq!(t.read(&t.env_file()), SAMPLE_ENVIRONMENT);
}

#[test]
fn test_schedule_missing_template_fails() {
    let t = Test::new();
    t.write(&t.schedule_file(), SAMPLE_CRONTAB);

    let output = t.schedule();
    assert_failure(&output);
    assert_stderr_contains(&output, "crontab.template");
    assert_eq!(t.read(&t.schedule_file()), SAMPLE_CRONTAB);
}

#[test]
fn test_schedule_refuses_value_that_would_add_a_job() {
    let t = Test::with_host_files();

    let mut values = STANDARD_VALUES.to_vec();
    values[3] = ("MG_TG_CHAT", "-100\n* * * * * root /tmp/evil.sh");
    let output = t
        .cmd()
        .envs(values.iter().copied())
        .arg("schedule")
        .arg("--template")
        .arg(t.template())
        .output()
        .unwrap();

    assert_failure(&output);
    assert_stderr_contains(&output, "MG_TG_CHAT");
    assert_eq!(t.read(&t.schedule_file()), SAMPLE_CRONTAB);
}
