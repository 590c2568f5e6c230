//! External programs.
//!
//! Everything that shells out goes through [`CommandRunner`], so tests can
//! substitute a recorder that never spawns a process.

use std::process::{Command, Output, Stdio};

use tracing::debug;

use crate::error::{ExternalError, PreconditionError, Result};

pub mod steps;

/// Runs external commands.
pub trait CommandRunner {
    /// Run to completion, capturing stdout and stderr.
    ///
    /// A non-zero exit is not an error here; callers inspect the status.
    fn output(&self, program: &str, args: &[&str]) -> Result<Output>;

    /// Run with inherited stdio so the operator sees progress.
    ///
    /// # Errors
    ///
    /// Returns `ExternalError::Failed` on a non-zero exit.
    fn run(&self, program: &str, args: &[&str]) -> Result<()>;

    /// Check that `program` can be found before relying on it.
    fn require(&self, program: &str) -> Result<()> {
        which::which(program)
            .map(|_| ())
            .map_err(|_| PreconditionError::MissingBinary(program.to_string()).into())
    }
}

/// Production runner backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn output(&self, program: &str, args: &[&str]) -> Result<Output> {
        debug!(program, ?args, "running");
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| spawn_error(program, source))
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        debug!(program, ?args, "running");
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| spawn_error(program, source))?;

        if status.success() {
            Ok(())
        } else {
            Err(ExternalError::Failed {
                program: program.to_string(),
                code: status.code(),
                stderr: String::new(),
            }
            .into())
        }
    }
}

fn spawn_error(program: &str, source: std::io::Error) -> crate::error::Error {
    ExternalError::Spawn {
        program: program.to_string(),
        source,
    }
    .into()
}

/// Turn a captured non-zero exit into an error.
pub fn check(program: &str, output: Output) -> Result<Output> {
    if output.status.success() {
        return Ok(output);
    }
    Err(ExternalError::Failed {
        program: program.to_string(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
    .into())
}

/// Whether the process runs with root privileges.
pub fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_output_captures_stdout() {
        let out = ProcessRunner.output("sh", &["-c", "echo hi"]).unwrap();
        assert!(out.status.success());
        assert_eq!(String::from_utf8_lossy(&out.stdout), "hi\n");
    }

    #[test]
    fn test_check_maps_failure() {
        let out = ProcessRunner
            .output("sh", &["-c", "echo boom >&2; exit 3"])
            .unwrap();
        let err = check("sh", out).unwrap_err();
        match err {
            Error::External(ExternalError::Failed { code, stderr, .. }) => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr.trim(), "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_run_failure_is_error() {
        let err = ProcessRunner.run("sh", &["-c", "exit 1"]).unwrap_err();
        assert!(matches!(err, Error::External(ExternalError::Failed { .. })));
    }

    #[test]
    fn test_spawn_missing_program() {
        let err = ProcessRunner
            .output("mgsetup-no-such-program", &[])
            .unwrap_err();
        assert!(matches!(err, Error::External(ExternalError::Spawn { .. })));
    }

    #[test]
    fn test_require_missing_program() {
        let err = ProcessRunner.require("mgsetup-no-such-program").unwrap_err();
        assert!(matches!(
            err,
            Error::Precondition(PreconditionError::MissingBinary(_))
        ));
    }
}
