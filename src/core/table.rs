//! Line-oriented text files replaced atomically.
//!
//! Every mutation goes through `read` → `stage` → `commit`: the new contents
//! are written to a temporary file in the target's directory and renamed over
//! the target, so an observer sees either the old file or the new one.
//!
//! Lines are carried as raw bytes. Operator content in any encoding goes back
//! out exactly as it came in.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Result, StoreError};

/// One line without its `\n` terminator.
pub type Line = Vec<u8>;

/// A persistent table of text lines.
pub trait TextTable {
    /// Where the table lives, for reporting.
    fn location(&self) -> &Path;

    /// Current lines. A missing table reads as empty.
    fn read(&self) -> Result<Vec<Line>>;

    /// Write `lines` to a staging area next to the table.
    fn stage(&self, lines: &[Line]) -> Result<Staged>;

    /// Atomically replace the table with staged contents.
    fn commit(&self, staged: Staged) -> Result<()>;
}

/// Contents written but not yet visible at the target path.
///
/// Dropping a `Staged` without committing removes the temporary file.
#[derive(Debug)]
pub struct Staged {
    file: NamedTempFile,
}

impl Staged {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// A [`TextTable`] backed by a regular file.
#[derive(Debug, Clone)]
pub struct FileTable {
    path: PathBuf,
    mode: u32,
}

impl FileTable {
    /// `mode` applies when the target does not exist yet; an existing target
    /// keeps its own permission bits.
    pub fn new(path: impl Into<PathBuf>, mode: u32) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    /// Create the file empty if it is missing.
    pub fn ensure_exists(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }

        let create = || -> std::io::Result<()> {
            #[cfg(unix)]
            {
                use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
                fs::OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(false)
                    .mode(self.mode)
                    .open(&self.path)?;
                // umask may have narrowed the mode at creation
                fs::set_permissions(&self.path, fs::Permissions::from_mode(self.mode))?;
            }
            #[cfg(not(unix))]
            {
                fs::OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(false)
                    .open(&self.path)?;
            }
            Ok(())
        };

        create().map_err(|source| StoreError::Create {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "created empty file");
        Ok(())
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    fn write_staged(&self, lines: &[Line]) -> std::io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix(".mgsetup.")
            .suffix(".tmp")
            .tempfile_in(self.parent_dir())?;

        file.write_all(&render(lines))?;
        file.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::{MetadataExt, PermissionsExt};

            let mode = match fs::metadata(&self.path) {
                Ok(meta) => {
                    // Keep the owner of a shared file when rewriting it as root.
                    if nix::unistd::geteuid().is_root() {
                        std::os::unix::fs::fchown(
                            file.as_file(),
                            Some(meta.uid()),
                            Some(meta.gid()),
                        )?;
                    }
                    meta.permissions().mode() & 0o7777
                }
                Err(_) => self.mode,
            };
            file.as_file()
                .set_permissions(fs::Permissions::from_mode(mode))?;
        }

        Ok(file)
    }
}

impl TextTable for FileTable {
    fn location(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<Line>> {
        match fs::read(&self.path) {
            Ok(contents) => Ok(split_lines(&contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(StoreError::Read {
                path: self.path.clone(),
                source,
            }
            .into()),
        }
    }

    fn stage(&self, lines: &[Line]) -> Result<Staged> {
        let file = self.write_staged(lines).map_err(|source| StoreError::Stage {
            path: self.path.clone(),
            source,
        })?;
        debug!(staged = %file.path().display(), lines = lines.len(), "staged replacement");
        Ok(Staged { file })
    }

    fn commit(&self, staged: Staged) -> Result<()> {
        staged
            .file
            .persist(&self.path)
            .map_err(|e| StoreError::Commit {
                path: self.path.clone(),
                source: e.error,
            })?;

        // Make the rename itself durable; losing this only weakens crash safety.
        if let Ok(dir) = fs::File::open(self.parent_dir()) {
            let _ = dir.sync_all();
        }

        debug!(path = %self.path.display(), "committed");
        Ok(())
    }
}

/// Split file contents into lines, keeping any `\r` so unrelated lines
/// survive a rewrite byte-for-byte.
pub fn split_lines(contents: &[u8]) -> Vec<Line> {
    if contents.is_empty() {
        return Vec::new();
    }
    let body = contents.strip_suffix(b"\n").unwrap_or(contents);
    body.split(|&b| b == b'\n').map(<[u8]>::to_vec).collect()
}

/// Join lines with a trailing newline. No lines renders as an empty file.
pub fn render(lines: &[Line]) -> Vec<u8> {
    let mut out = Vec::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        out.extend_from_slice(line);
        out.push(b'\n');
    }
    out
}

/// A line built from text.
pub fn line(text: impl Into<String>) -> Line {
    text.into().into_bytes()
}
