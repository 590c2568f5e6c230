//! Schedule command.

use std::path::Path;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::constants::CONFIG_KEYS;
use crate::core::prompt::{ProcessEnv, Prompter, Resolver};
use crate::core::provision::schedule_for;
use crate::core::schedule;
use crate::core::system::ProcessRunner;
use crate::error::{ConfigError, Result};

/// Resolve the keys and rewrite the managed block from a local template.
pub fn execute(settings: &Settings, prompter: Box<dyn Prompter>, template: &Path) -> Result<()> {
    // Unlike a fetched tree, a template named on the command line must exist.
    if !template.is_file() {
        return Err(ConfigError::Template {
            path: template.to_path_buf(),
            source: std::io::ErrorKind::NotFound.into(),
        }
        .into());
    }
    let template_lines = schedule::load_template(template)?;

    let values = Resolver::new(ProcessEnv, prompter).resolve_all(CONFIG_KEYS)?;

    let runner = ProcessRunner;
    let target = schedule_for(settings, &runner);
    let report = schedule::reconcile(&values, &template_lines, target.as_ref())?;

    output::success(if report.replaced {
        "managed block replaced"
    } else {
        "managed block added"
    });
    output::kv("schedule", target.describe());
    output::kv("jobs", report.jobs);
    output::kv("preserved", format!("{} lines", report.preserved));
    Ok(())
}
