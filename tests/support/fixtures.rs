//! Test fixtures and constants.

/// One value per configuration key, in declared order. The password carries
/// both characters that need escaping.
pub const STANDARD_VALUES: &[(&str, &str)] = &[
    ("MG_USER", "monitor"),
    ("MG_PASSWORD", r#"pa"ss\word"#),
    ("MG_TG_TOKEN", "123456:ABC-def_ghi"),
    ("MG_TG_CHAT", "-1001234567890"),
];

/// Environment file lines written by the escaping above.
pub const STANDARD_ASSIGNMENTS: &[&str] = &[
    r#"MG_USER="monitor""#,
    r#"MG_PASSWORD="pa\"ss\\word""#,
    r#"MG_TG_TOKEN="123456:ABC-def_ghi""#,
    r#"MG_TG_CHAT="-1001234567890""#,
];

/// A host environment file with unrelated content.
pub const SAMPLE_ENVIRONMENT: &str = "\
PATH=\"/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin\"
LANG=en_US.UTF-8
# managed by hand
";

/// A crontab with operator jobs.
pub const SAMPLE_CRONTAB: &str = "\
MAILTO=ops@example.org
0 3 * * * /usr/bin/backup.sh
";

/// Schedule template as shipped in the agent tree.
pub const SAMPLE_TEMPLATE: &str = "\
# Check modems every five minutes
*/5 * * * * /usr/local/bin/proxysmart_modems_check.py >> /var/log/proxysmart_modems_check.log 2>&1

  # Hourly inventory
0 * * * * /usr/local/bin/proxysmart_modems_list.py >> /var/log/proxysmart_modems_list.log 2>&1
";

pub const BLOCK_BEGIN: &str = "# BEGIN MG-MONITOR MANAGED BLOCK";
pub const BLOCK_END: &str = "# END MG-MONITOR MANAGED BLOCK";
