//! Test support utilities for mgsetup integration tests.
//!
//! Every test gets its own temporary directory holding the environment file,
//! the schedule file and an empty settings file, so nothing on the host is
//! read or written and tests can run in parallel.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;

use tempfile::TempDir;

/// Isolated test environment.
pub struct Test {
    pub dir: TempDir,
}

impl Test {
    /// Create an empty environment with an empty settings file.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        std::fs::write(dir.path().join("mgsetup.toml"), "").expect("failed to write config");
        Self { dir }
    }

    /// Create an environment whose files already hold operator content.
    pub fn with_host_files() -> Self {
        let t = Self::new();
        t.write(&t.env_file(), SAMPLE_ENVIRONMENT);
        t.write(&t.schedule_file(), SAMPLE_CRONTAB);
        t.write(&t.template(), SAMPLE_TEMPLATE);
        t
    }

    pub fn config(&self) -> PathBuf {
        self.dir.path().join("mgsetup.toml")
    }

    pub fn env_file(&self) -> PathBuf {
        self.dir.path().join("environment")
    }

    pub fn schedule_file(&self) -> PathBuf {
        self.dir.path().join("crontab")
    }

    pub fn template(&self) -> PathBuf {
        self.dir.path().join("crontab.template")
    }

    pub fn write(&self, path: &PathBuf, contents: &str) {
        std::fs::write(path, contents).expect("failed to write fixture");
    }

    pub fn read(&self, path: &PathBuf) -> String {
        std::fs::read_to_string(path).expect("failed to read file")
    }

    /// Names of every entry in the test directory.
    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir.path())
            .expect("failed to list temp dir")
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
