//! Secrets command.
//!
//! Resolves every key and rewrites the environment file, nothing else.

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::constants::CONFIG_KEYS;
use crate::core::envfile;
use crate::core::prompt::{ProcessEnv, Prompter, Resolver};
use crate::error::Result;

pub fn execute(settings: &Settings, prompter: Box<dyn Prompter>) -> Result<()> {
    let values = Resolver::new(ProcessEnv, prompter).resolve_all(CONFIG_KEYS)?;
    let report = envfile::persist_to(&values, &settings.env_file)?;

    output::success("environment file updated");
    output::kv("environment", output::path(settings.env_file.display()));
    output::kv("keys", values.len());
    if let Some(backup) = &report.backup {
        output::kv("backup", output::path(backup.display()));
    }
    Ok(())
}
