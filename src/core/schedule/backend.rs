//! Schedule backends.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::Schedule;
use crate::core::system::{check, CommandRunner};
use crate::core::table::{self, FileTable, Line, TextTable};
use crate::error::{Result, StoreError};

/// A user's crontab, read with `crontab -l` and replaced with `crontab <file>`.
///
/// `crontab` swaps the spool file in one step, so the new table is staged in
/// a temporary file first and handed over whole.
pub struct CrontabSchedule<'a, R: CommandRunner> {
    runner: &'a R,
    user: String,
}

impl<'a, R: CommandRunner> CrontabSchedule<'a, R> {
    pub fn new(runner: &'a R, user: impl Into<String>) -> Self {
        Self {
            runner,
            user: user.into(),
        }
    }
}

impl<R: CommandRunner> Schedule for CrontabSchedule<'_, R> {
    fn describe(&self) -> String {
        format!("crontab -u {}", self.user)
    }

    fn read(&self) -> Result<Vec<Line>> {
        let output = self.runner.output("crontab", &["-u", self.user.as_str(), "-l"])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("no crontab for") {
                debug!(user = %self.user, "no existing crontab");
                return Ok(Vec::new());
            }
        }
        let output = check("crontab", output)?;
        Ok(table::split_lines(&output.stdout))
    }

    fn install(&self, lines: &[Line]) -> Result<()> {
        let mut staged = tempfile::Builder::new()
            .prefix("mgsetup-crontab.")
            .tempfile()
            .map_err(|source| stage_error(&self.user, source))?;
        staged
            .write_all(&table::render(lines))
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|source| stage_error(&self.user, source))?;

        let path = staged.path().to_string_lossy().into_owned();
        let output = self
            .runner
            .output("crontab", &["-u", self.user.as_str(), path.as_str()])?;
        check("crontab", output)?;
        Ok(())
    }
}

fn stage_error(user: &str, source: std::io::Error) -> crate::error::Error {
    StoreError::Stage {
        path: PathBuf::from(format!("crontab:{user}")),
        source,
    }
    .into()
}

/// A crontab-format file replaced through an atomic rename.
pub struct FileSchedule {
    table: FileTable,
}

impl FileSchedule {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            table: FileTable::new(path, 0o644),
        }
    }

    pub fn path(&self) -> &Path {
        self.table.location()
    }
}

impl Schedule for FileSchedule {
    fn describe(&self) -> String {
        self.table.location().display().to_string()
    }

    fn read(&self) -> Result<Vec<Line>> {
        self.table.read()
    }

    fn install(&self, lines: &[Line]) -> Result<()> {
        let staged = self.table.stage(lines)?;
        self.table.commit(staged)
    }
}
