//! Command helper methods for Test.

use super::{Test, STANDARD_VALUES};
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create an mgsetup command pointed at this test's files.
    ///
    /// Never prompts, never reads `/etc/mgsetup.toml`, and starts with none
    /// of the configuration keys set.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("mgsetup").expect("failed to find mgsetup binary");
        for (key, _) in STANDARD_VALUES {
            cmd.env_remove(key);
        }
        cmd.env_remove("MGSETUP_LOG");
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd.arg("--non-interactive")
            .arg("--config")
            .arg(self.config())
            .arg("--env-file")
            .arg(self.env_file())
            .arg("--schedule-file")
            .arg(self.schedule_file());
        cmd
    }

    /// `mgsetup secrets` with the given keys in the environment.
    pub fn secrets_with(&self, values: &[(&str, &str)]) -> Output {
        self.cmd()
            .envs(values.iter().copied())
            .arg("secrets")
            .output()
            .expect("failed to run mgsetup secrets")
    }

    /// `mgsetup secrets` with every key set.
    pub fn secrets(&self) -> Output {
        self.secrets_with(STANDARD_VALUES)
    }

    /// `mgsetup schedule` with every key set.
    pub fn schedule(&self) -> Output {
        self.cmd()
            .envs(STANDARD_VALUES.iter().copied())
            .arg("schedule")
            .arg("--template")
            .arg(self.template())
            .output()
            .expect("failed to run mgsetup schedule")
    }

    /// `mgsetup status`.
    pub fn status(&self) -> Output {
        self.cmd()
            .arg("status")
            .output()
            .expect("failed to run mgsetup status")
    }
}
