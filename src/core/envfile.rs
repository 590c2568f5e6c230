//! Persistence of resolved values into the host environment file.
//!
//! Only lines assigning one of the persisted keys are replaced. Everything
//! else in the file is carried over verbatim and in order; the owned
//! assignments are appended at the end in declared key order.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::core::constants::ENV_FILE_MODE;
use crate::core::encode;
use crate::core::table::{line, FileTable, Line, TextTable};
use crate::core::types::ResolvedValues;
use crate::error::Result;

/// Outcome of a [`persist`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistReport {
    /// Number of unrelated lines carried over.
    pub preserved: usize,
    /// Number of prior assignments to persisted keys that were replaced.
    pub replaced: usize,
    /// Backup copy taken before the rewrite, if one was made.
    pub backup: Option<PathBuf>,
}

/// Whether `line` assigns one of the persisted keys.
///
/// Matches on the literal `KEY=` prefix regardless of the value.
fn is_owned(line: &[u8], values: &ResolvedValues) -> bool {
    values.keys().any(|key| {
        line.strip_prefix(key.name().as_bytes())
            .is_some_and(|rest| rest.starts_with(b"="))
    })
}

/// Compute the rewritten file: unrelated lines first, then one assignment
/// per persisted key.
pub fn merge(existing: &[Line], values: &ResolvedValues) -> Vec<Line> {
    let mut lines: Vec<Line> = existing
        .iter()
        .filter(|line| !is_owned(line, values))
        .cloned()
        .collect();

    lines.extend(
        values
            .iter()
            .map(|(key, raw)| line(encode::assignment(key.name(), raw))),
    );
    lines
}

/// Rewrite the environment file at `table` with `values`.
///
/// The file is created if missing. A timestamped backup of the previous
/// contents is attempted before the atomic replace; a failed backup is
/// logged and does not stop the rewrite.
///
/// # Errors
///
/// Returns a `StoreError` if the file cannot be read, staged or replaced.
/// The original file is untouched in every error case.
pub fn persist(values: &ResolvedValues, table: &impl TextTable) -> Result<PersistReport> {
    let existing = table.read()?;
    let merged = merge(&existing, values);

    let replaced = existing.iter().filter(|l| is_owned(l, values)).count();
    let preserved = merged.len() - values.len();
    debug!(
        path = %table.location().display(),
        preserved,
        replaced,
        keys = values.len(),
        "rewriting environment file"
    );

    let staged = table.stage(&merged)?;

    let backup = match backup(table.location()) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(path = %table.location().display(), error = %e, "backup failed, continuing");
            None
        }
    };

    table.commit(staged)?;
    info!(path = %table.location().display(), "environment file updated");

    Ok(PersistReport {
        preserved,
        replaced,
        backup,
    })
}

/// Persist `values` to the environment file at `path`, creating it if needed.
pub fn persist_to(values: &ResolvedValues, path: &Path) -> Result<PersistReport> {
    let table = FileTable::new(path, ENV_FILE_MODE);
    table.ensure_exists()?;
    persist(values, &table)
}

/// Copy `path` to `<path>.bak.<timestamp>`, never overwriting an older backup.
fn backup(path: &Path) -> std::io::Result<PathBuf> {
    let stamp = Local::now().format("%Y%m%d%H%M%S").to_string();
    let base = format!("{}.bak.{}", path.display(), stamp);

    let mut candidate = PathBuf::from(&base);
    let mut n = 1;
    while candidate.exists() {
        candidate = PathBuf::from(format!("{}-{}", base, n));
        n += 1;
    }

    fs::copy(path, &candidate)?;
    debug!(backup = %candidate.display(), "backup written");
    Ok(candidate)
}

/// Read every assignment currently present in the file at `path`.
///
/// Returns `(key, decoded value)` in file order. Bytes that are not valid
/// UTF-8 are shown as replacement characters.
pub fn read_assignments(path: &Path) -> Result<Vec<(String, String)>> {
    let table = FileTable::new(path, ENV_FILE_MODE);
    Ok(table
        .read()?
        .iter()
        .filter_map(|raw| {
            let text = String::from_utf8_lossy(raw);
            encode::parse_assignment(&text).map(|(k, v)| (k.to_string(), v))
        })
        .collect())
}
