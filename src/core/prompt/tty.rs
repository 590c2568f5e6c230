//! Prompting on the controlling terminal.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};

use nix::sys::termios::{self, LocalFlags, SetArg, Termios};
use tracing::warn;
use zeroize::Zeroizing;

use super::Prompter;
use crate::core::cleanup::CleanupRegistry;
use crate::core::types::ConfigKey;
use crate::error::{PreconditionError, Result};

/// Reads answers from `/dev/tty`, hiding input for sensitive keys.
pub struct TtyPrompter {
    reader: BufReader<File>,
    writer: File,
}

impl TtyPrompter {
    /// Open the controlling terminal.
    pub fn open() -> io::Result<Self> {
        let tty = OpenOptions::new().read(true).write(true).open("/dev/tty")?;
        Self::from_file(tty)
    }

    /// Prompt on an already open terminal device.
    pub fn from_file(tty: File) -> io::Result<Self> {
        let writer = tty.try_clone()?;
        Ok(Self {
            reader: BufReader::new(tty),
            writer,
        })
    }
}

impl Prompter for TtyPrompter {
    fn read_value(&mut self, key: &ConfigKey) -> Result<Zeroizing<String>> {
        write!(self.writer, "Enter value for {}: ", key.name())?;
        self.writer.flush()?;

        let mut line = Zeroizing::new(String::new());
        let read = if key.is_sensitive() {
            let guard = EchoGuard::disable(&self.writer)?;
            let read = self.reader.read_line(&mut line);
            drop(guard);
            // The newline typed by the operator was not echoed.
            writeln!(self.writer)?;
            read?
        } else {
            self.reader.read_line(&mut line)?
        };

        if read == 0 {
            return Err(PreconditionError::InputClosed(key.name().to_string()).into());
        }

        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}

/// Turns terminal echo off until dropped.
struct EchoGuard<'a> {
    tty: &'a File,
    saved: Termios,
}

impl<'a> EchoGuard<'a> {
    fn disable(tty: &'a File) -> io::Result<Self> {
        let saved = termios::tcgetattr(tty).map_err(io::Error::from)?;

        let mut silent = saved.clone();
        silent.local_flags.remove(LocalFlags::ECHO);

        CleanupRegistry::global().save_terminal(saved.clone());
        if let Err(e) = termios::tcsetattr(tty, SetArg::TCSANOW, &silent) {
            CleanupRegistry::global().clear_terminal();
            return Err(io::Error::from(e));
        }

        Ok(Self { tty, saved })
    }
}

impl Drop for EchoGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = termios::tcsetattr(self.tty, SetArg::TCSANOW, &self.saved) {
            warn!(error = %e, "failed to restore terminal echo");
        }
        CleanupRegistry::global().clear_terminal();
    }
}
