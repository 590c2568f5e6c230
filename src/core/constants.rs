//! Constants used throughout mgsetup.
//!
//! Centralizes fixed paths, sentinel literals and the declared key set.

use crate::core::types::ConfigKey;

/// Keys persisted to the environment file and injected into the schedule,
/// in declared order.
pub const CONFIG_KEYS: &[ConfigKey] = &[
    ConfigKey::new("MG_USER", false),
    ConfigKey::new("MG_PASSWORD", true),
    ConfigKey::new("MG_TG_TOKEN", true),
    ConfigKey::new("MG_TG_CHAT", false),
];

/// Default configuration file.
pub const CONFIG_FILE: &str = "/etc/mgsetup.toml";

/// Host-wide environment file read by new sessions.
pub const ENV_FILE: &str = "/etc/environment";

/// Mode for a freshly created environment file.
pub const ENV_FILE_MODE: u32 = 0o644;

/// Mode for deployed executables.
pub const EXEC_MODE: u32 = 0o755;

/// Directory on the execution search path that receives deployed scripts.
pub const BIN_DIR: &str = "/usr/local/bin";

/// Persistent state directory for the agent. The inventory job keeps its
/// modem state here unless `MG_STATE_DIR` says otherwise.
pub const STATE_DIR: &str = "/var/lib/proxysmart";

/// Directory holding the job logs.
pub const LOG_DIR: &str = "/var/log";

/// Log files created up front so redirects from cron never race on creation.
pub const LOG_FILES: &[&str] = &["proxysmart_modems_check.log", "proxysmart_modems_list.log"];

/// Principal whose schedule holds the managed block.
pub const SCHEDULE_USER: &str = "root";

/// First line of the managed schedule block.
pub const BLOCK_BEGIN: &str = "# BEGIN MG-MONITOR MANAGED BLOCK";

/// Last line of the managed schedule block.
pub const BLOCK_END: &str = "# END MG-MONITOR MANAGED BLOCK";

/// Search path exported to scheduled jobs.
pub const SCHEDULE_PATH: &str = "PATH=/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin";

/// Shell used by scheduled jobs.
pub const SCHEDULE_SHELL: &str = "SHELL=/bin/bash";

/// Interpreter line prepended to deployed scripts that lack one.
pub const INTERPRETER_MARKER: &str = "#!/usr/bin/env python3";

/// OS packages installed before anything else.
pub const PACKAGES: &[&str] = &["git", "cron", "python3", "python3-pip"];

/// Default branch or tag fetched from the source repository.
pub const SOURCE_REF: &str = "main";

/// Directory inside the fetched tree holding the scripts to deploy: the
/// tree root.
pub const SCRIPTS_DIR: &str = ".";

/// Extension of deployable scripts.
pub const SCRIPT_EXTENSION: &str = "py";

/// Schedule template inside the fetched tree.
pub const SCHEDULE_TEMPLATE: &str = "crontab.template";

/// Dependency manifest inside the fetched tree.
pub const DEPENDENCY_MANIFEST: &str = "requirements.txt";

/// Value shown in place of a sensitive value.
pub const MASK: &str = "********";
