//! Status command - read-only overview of what is installed.

use tracing::debug;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::constants::{CONFIG_KEYS, MASK};
use crate::core::envfile;
use crate::core::provision::schedule_for;
use crate::core::schedule::block;
use crate::core::system::ProcessRunner;
use crate::error::Result;

/// Show which keys are persisted and whether the schedule holds the block.
pub fn execute(settings: &Settings) -> Result<()> {
    output::header("Environment");
    output::kv("file", output::path(settings.env_file.display()));

    if settings.env_file.exists() {
        let assignments = envfile::read_assignments(&settings.env_file)?;
        for key in CONFIG_KEYS {
            // The last assignment wins when a file has duplicates.
            let value = assignments
                .iter()
                .rev()
                .find(|(name, _)| name == key.name())
                .map(|(_, v)| v.as_str());
            match value {
                Some(_) if key.is_sensitive() => output::kv(key.name(), MASK),
                Some(v) => output::kv(key.name(), v),
                None => output::kv(key.name(), "missing"),
            }
        }
    } else {
        output::warn("environment file not found");
    }

    println!();
    output::header("Schedule");

    let runner = ProcessRunner;
    let schedule = schedule_for(settings, &runner);
    output::kv("location", schedule.describe());

    match schedule.read() {
        Ok(lines) => match block::managed_lines(&lines) {
            Some(managed) => {
                output::kv("block", "present");
                output::kv("jobs", block::job_count(&managed));
            }
            None => output::kv("block", "absent"),
        },
        Err(e) => {
            debug!(error = %e, "schedule unreadable");
            output::warn(&format!("schedule unreadable: {}", e));
        }
    }

    Ok(())
}
