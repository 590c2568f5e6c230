//! Installer settings.
//!
//! Built-in defaults, optionally overridden by a TOML file (`/etc/mgsetup.toml`
//! unless `--config` names another). Command-line flags are applied on top by
//! the CLI layer.
//!
//! ```toml
//! env_file = "/etc/environment"
//! packages = ["git", "cron", "python3", "python3-pip"]
//!
//! [source]
//! repository = "https://example.org/mg-monitor.git"
//! reference = "main"
//!
//! [schedule]
//! file = "/etc/mg-monitor.cron"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Effective settings for a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub env_file: PathBuf,
    pub bin_dir: PathBuf,
    pub state_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Log files created empty under `log_dir`.
    pub log_files: Vec<String>,
    /// OS packages installed before anything else.
    pub packages: Vec<String>,
    pub source: SourceSettings,
    pub schedule: ScheduleSettings,
}

/// Where the agent's sources come from and how the tree is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSettings {
    /// Git URL of the agent. There is no default.
    pub repository: Option<String>,
    /// Branch or tag to clone.
    pub reference: String,
    /// Directory of the tree holding the scripts to deploy, `.` for the root.
    pub scripts_dir: String,
    /// Schedule template, relative to the tree root.
    pub template: String,
    /// Python dependency manifest, relative to the tree root.
    pub manifest: String,
}

/// Which schedule receives the managed block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleSettings {
    /// Crontab owner when no file is configured.
    pub user: String,
    /// Write a crontab-format file instead of the user's crontab.
    pub file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env_file: PathBuf::from(constants::ENV_FILE),
            bin_dir: PathBuf::from(constants::BIN_DIR),
            state_dir: PathBuf::from(constants::STATE_DIR),
            log_dir: PathBuf::from(constants::LOG_DIR),
            log_files: to_strings(constants::LOG_FILES),
            packages: to_strings(constants::PACKAGES),
            source: SourceSettings::default(),
            schedule: ScheduleSettings::default(),
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            repository: None,
            reference: constants::SOURCE_REF.to_string(),
            scripts_dir: constants::SCRIPTS_DIR.to_string(),
            template: constants::SCHEDULE_TEMPLATE.to_string(),
            manifest: constants::DEPENDENCY_MANIFEST.to_string(),
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            user: constants::SCHEDULE_USER.to_string(),
            file: None,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit `path` must exist. Without one, the system-wide file is
    /// read if present and defaults are used otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(constants::CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse a settings file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(settings)
    }

    /// The configured repository.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRepository` when none is set.
    pub fn repository(&self) -> Result<&str> {
        self.source
            .repository
            .as_deref()
            .filter(|r| !r.is_empty())
            .ok_or_else(|| ConfigError::MissingRepository.into())
    }
}
