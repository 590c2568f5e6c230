//! Reconciliation of the managed block in the administrative job schedule.
//!
//! The schedule belongs to the operator. This module owns exactly one region
//! of it, bounded by [`BLOCK_BEGIN`] and [`BLOCK_END`], and rewrites that
//! region from scratch on every run. Lines outside the region are carried
//! over without being interpreted.
//!
//! ## Backends
//!
//! - [`CrontabSchedule`]: a user's crontab, installed through `crontab(1)`
//! - [`FileSchedule`]: a crontab-format file written directly

use std::path::Path;

use tracing::{debug, info};

use crate::core::constants::{BLOCK_BEGIN, BLOCK_END, SCHEDULE_PATH, SCHEDULE_SHELL};
use crate::core::encode::strip_terminator;
use crate::core::table::{self, line, Line};
use crate::core::types::ResolvedValues;
use crate::error::{ConfigError, Result};

mod backend;
pub mod block;

pub use backend::{CrontabSchedule, FileSchedule};

/// A job schedule that can be read and replaced as a whole.
pub trait Schedule {
    /// Human-readable location, e.g. `crontab -u root` or a file path.
    fn describe(&self) -> String;

    /// Current lines. An absent schedule reads as empty.
    fn read(&self) -> Result<Vec<Line>>;

    /// Replace the whole schedule with `lines` in one operation.
    fn install(&self, lines: &[Line]) -> Result<()>;
}

/// Outcome of a [`reconcile`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Lines outside the managed block carried over unchanged.
    pub preserved: usize,
    /// Job entries written into the block.
    pub jobs: usize,
    /// Whether a managed block existed before this run.
    pub replaced: bool,
}

/// Build the managed block: sentinels around the key assignments, the fixed
/// execution environment and the normalized job entries.
///
/// Values are written unquoted, minus one trailing line terminator. The
/// block is regenerated from memory on every run, so it never has to survive
/// a parse of its own output.
pub fn render_block(values: &ResolvedValues, template: &[Line]) -> Vec<Line> {
    let jobs = block::normalize_template(template);

    let mut out = Vec::with_capacity(values.len() + jobs.len() + 4);
    out.push(line(BLOCK_BEGIN));
    out.extend(
        values
            .iter()
            .map(|(key, raw)| line(format!("{}={}", key.name(), strip_terminator(raw)))),
    );
    out.push(line(SCHEDULE_PATH));
    out.push(line(SCHEDULE_SHELL));
    out.extend(jobs);
    out.push(line(BLOCK_END));
    out
}

/// Rewrite the managed block of `schedule`.
///
/// # Errors
///
/// Fails if the schedule cannot be read or installed. A failed install
/// leaves the previous schedule in place.
pub fn reconcile(
    values: &ResolvedValues,
    template: &[Line],
    schedule: &dyn Schedule,
) -> Result<ReconcileReport> {
    let existing = schedule.read()?;
    let (outside, previous) = block::partition(&existing);
    let jobs = block::normalize_template(template).len();

    let mut lines = outside;
    let preserved = lines.len();
    lines.extend(render_block(values, template));

    debug!(
        schedule = %schedule.describe(),
        preserved,
        jobs,
        replaced = previous.is_some(),
        "installing schedule"
    );
    schedule.install(&lines)?;
    info!(schedule = %schedule.describe(), jobs, "schedule reconciled");

    Ok(ReconcileReport {
        preserved,
        jobs,
        replaced: previous.is_some(),
    })
}

/// Read a schedule template. A missing template yields no jobs.
pub fn load_template(path: &Path) -> Result<Vec<Line>> {
    match std::fs::read(path) {
        Ok(contents) => Ok(table::split_lines(&contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(template = %path.display(), "no schedule template");
            Ok(Vec::new())
        }
        Err(source) => Err(ConfigError::Template {
            path: path.to_path_buf(),
            source,
        }
        .into()),
    }
}
