//! Exit-time cleanup for state that must not outlive a run.
//!
//! Two things need undoing no matter how the process ends: the temporary
//! workspace holding fetched sources, and a terminal left with echo disabled
//! mid-prompt. Normal and error paths handle both through `Drop`. For
//! SIGINT, SIGTERM and SIGHUP a listener thread runs the same cleanup from
//! the global [`CleanupRegistry`] before exiting with `128 + signal`.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

use nix::sys::termios::{self, SetArg, Termios};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::error::Result;

static REGISTRY: OnceLock<Mutex<CleanupRegistry>> = OnceLock::new();

/// Resources to release if the process is interrupted.
#[derive(Debug, Default)]
pub struct CleanupRegistry {
    workspaces: Vec<PathBuf>,
    terminal: Option<Termios>,
}

impl CleanupRegistry {
    /// Lock the process-wide registry. A poisoned lock is still usable since
    /// the registry holds no invariants a panic could break.
    pub fn global() -> MutexGuard<'static, CleanupRegistry> {
        let lock = REGISTRY.get_or_init(|| Mutex::new(CleanupRegistry::default()));
        match lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn track_workspace(&mut self, path: PathBuf) {
        debug!(workspace = %path.display(), "tracking workspace");
        self.workspaces.push(path);
    }

    pub fn release_workspace(&mut self, path: &Path) {
        self.workspaces.retain(|p| p != path);
    }

    pub fn workspace_count(&self) -> usize {
        self.workspaces.len()
    }

    /// Remember terminal settings to restore if interrupted mid-read.
    pub fn save_terminal(&mut self, saved: Termios) {
        self.terminal = Some(saved);
    }

    pub fn clear_terminal(&mut self) {
        self.terminal = None;
    }

    pub fn has_saved_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    /// Restore the terminal and remove every tracked workspace.
    pub fn run(&mut self) {
        if let Some(saved) = self.terminal.take() {
            // Terminal attributes belong to the device, so a fresh handle works.
            match std::fs::OpenOptions::new().read(true).write(true).open("/dev/tty") {
                Ok(tty) => {
                    if let Err(e) = termios::tcsetattr(&tty, SetArg::TCSANOW, &saved) {
                        warn!(error = %e, "failed to restore terminal");
                    }
                }
                Err(e) => warn!(error = %e, "failed to reopen terminal"),
            }
        }

        for path in self.workspaces.drain(..) {
            match std::fs::remove_dir_all(&path) {
                Ok(()) => debug!(workspace = %path.display(), "workspace removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(workspace = %path.display(), error = %e, "failed to remove workspace"),
            }
        }
    }
}

/// Run the cleanup registry on SIGINT, SIGTERM and SIGHUP, then exit.
///
/// Call once at program start.
pub fn install_signal_handlers() -> std::io::Result<()> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;

    std::thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            info!(signal = sig, "interrupted, cleaning up");
            CleanupRegistry::global().run();
            std::process::exit(128 + sig);
        }
    });

    Ok(())
}

/// A private temporary directory removed on drop and on interruption.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a directory with a unique, unpredictable name.
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("mgsetup-").tempdir()?;
        CleanupRegistry::global().track_workspace(dir.path().to_path_buf());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        CleanupRegistry::global().release_workspace(self.dir.path());
        debug!(workspace = %self.dir.path().display(), "releasing workspace");
        // TempDir removes the directory when it drops after this.
    }
}
