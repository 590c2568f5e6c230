//! Error types for mgsetup.
//!
//! The top-level [`Error`] wraps one sub-error per failure domain so callers
//! can match on the class of failure (precondition, filesystem, external tool,
//! configuration) while still getting a precise message.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    External(#[from] ExternalError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A condition that must hold before a step may run.
#[derive(Error, Debug)]
pub enum PreconditionError {
    #[error("root privileges required")]
    NotRoot,

    #[error("{0} is not set and no terminal is available to prompt for it")]
    NoTerminal(String),

    #[error("terminal input closed while reading {0}")]
    InputClosed(String),

    #[error("{0} spans several lines; values must fit on one line")]
    MultilineValue(String),

    #[error("required program not found in PATH: {0}")]
    MissingBinary(String),
}

/// Failures reading or replacing a persistent text file.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to stage replacement for {path}: {source}")]
    Stage {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to replace {path}: {source}")]
    Commit {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// An external program could not be run or reported failure.
#[derive(Error, Debug)]
pub enum ExternalError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {}{}", describe_status(.code), format_stderr(.stderr))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn describe_status(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "a signal".to_string(),
    }
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("no source repository configured")]
    MissingRepository,

    #[error("failed to read schedule template {path}: {source}")]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    /// Operator-facing remediation for errors that have an obvious fix.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Precondition(PreconditionError::NotRoot) => Some("run again with sudo"),
            Error::Precondition(PreconditionError::NoTerminal(_)) => Some(
                "pass every key explicitly: sudo MG_USER=... MG_PASSWORD=... MG_TG_TOKEN=... MG_TG_CHAT=... mgsetup install",
            ),
            Error::Precondition(PreconditionError::MultilineValue(_)) => {
                Some("remove the line break from the value and run again")
            }
            Error::Config(ConfigError::MissingRepository) => {
                Some("set [source] repository in /etc/mgsetup.toml or pass --repo")
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
