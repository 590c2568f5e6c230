//! Command-line interface.

pub mod completions;
pub mod install;
pub mod output;
pub mod schedule;
pub mod secrets;
pub mod status;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::config::Settings;
use crate::core::prompt::{self, NoTerminal, Prompter};
use crate::error::Result;

/// mgsetup - Install and configure the MG modem monitoring agent.
#[derive(Parser)]
#[command(
    name = "mgsetup",
    about = "Install and configure the MG modem monitoring agent",
    version
)]
pub struct Cli {
    /// Enable debug logging (MGSETUP_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (default: /etc/mgsetup.toml if present)
    #[arg(long, global = true, env = "MGSETUP_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Never prompt; fail if a key is missing from the environment
    #[arg(long, global = true)]
    pub non_interactive: bool,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings that can be overridden per invocation.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Environment file to write
    #[arg(long, global = true, env = "MGSETUP_ENV_FILE", value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Write the schedule to this crontab-format file instead of root's crontab
    #[arg(long, global = true, env = "MGSETUP_SCHEDULE_FILE", value_name = "FILE")]
    pub schedule_file: Option<PathBuf>,

    /// Directory receiving deployed scripts
    #[arg(long, global = true, env = "MGSETUP_BIN_DIR", value_name = "DIR")]
    pub bin_dir: Option<PathBuf>,
}

impl Overrides {
    /// Apply every override that was given.
    pub fn apply(self, settings: &mut Settings) {
        if let Some(path) = self.env_file {
            settings.env_file = path;
        }
        if let Some(path) = self.schedule_file {
            settings.schedule.file = Some(path);
        }
        if let Some(dir) = self.bin_dir {
            settings.bin_dir = dir;
        }
    }
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Run the full installation (requires root)
    Install {
        /// Git repository of the agent
        #[arg(long, env = "MGSETUP_REPOSITORY")]
        repo: Option<String>,
        /// Branch or tag to install
        #[arg(long = "ref", env = "MGSETUP_REF", value_name = "REF")]
        reference: Option<String>,
        /// Leave OS packages alone
        #[arg(long)]
        skip_packages: bool,
    },

    /// Resolve the configuration keys and write the environment file
    Secrets,

    /// Rewrite the managed schedule block from a local template
    Schedule {
        /// Template with one job per line
        #[arg(long, value_name = "FILE")]
        template: PathBuf,
    },

    /// Show what is currently installed
    Status,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

/// Execute a parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    let Cli {
        config,
        non_interactive,
        overrides,
        command,
        ..
    } = cli;

    if let Command::Completions { shell } = &command {
        return completions::execute(shell.clone());
    }

    let mut settings = Settings::load(config.as_deref())?;
    overrides.apply(&mut settings);

    let prompter = || -> Box<dyn Prompter> {
        if non_interactive {
            Box::new(NoTerminal)
        } else {
            prompt::controlling_terminal()
        }
    };

    match command {
        Command::Install {
            repo,
            reference,
            skip_packages,
        } => {
            if let Some(repo) = repo {
                settings.source.repository = Some(repo);
            }
            if let Some(reference) = reference {
                settings.source.reference = reference;
            }
            install::execute(&settings, prompter(), skip_packages)
        }
        Command::Secrets => secrets::execute(&settings, prompter()),
        Command::Schedule { template } => schedule::execute(&settings, prompter(), &template),
        Command::Status => status::execute(&settings),
        Command::Completions { .. } => Ok(()),
    }
}
