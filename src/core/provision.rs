//! The full installation run.
//!
//! [`Provisioner::run`] sequences every step. Each step is idempotent, so a
//! failed run is fixed by correcting the cause and running again.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::core::cleanup::Workspace;
use crate::core::config::Settings;
use crate::core::constants::CONFIG_KEYS;
use crate::core::envfile::{self, PersistReport};
use crate::core::prompt::{EnvLookup, Prompter, Resolver};
use crate::core::schedule::{self, CrontabSchedule, FileSchedule, ReconcileReport, Schedule};
use crate::core::system::{self, steps, CommandRunner};
use crate::error::{PreconditionError, Result};

/// A stage of the run, reported to the observer before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    InstallPackages,
    ResolveValues,
    PersistEnvironment,
    FetchSources,
    InstallDependencies,
    PrepareFilesystem,
    DeployScripts,
    ReconcileSchedule,
}

impl Step {
    pub fn label(&self) -> &'static str {
        match self {
            Step::InstallPackages => "Installing packages",
            Step::ResolveValues => "Resolving configuration",
            Step::PersistEnvironment => "Writing environment file",
            Step::FetchSources => "Fetching sources",
            Step::InstallDependencies => "Installing dependencies",
            Step::PrepareFilesystem => "Preparing directories",
            Step::DeployScripts => "Deploying scripts",
            Step::ReconcileSchedule => "Updating schedule",
        }
    }
}

/// What a successful run changed, in reporting order.
#[derive(Debug)]
pub struct ProvisionReport {
    pub schedule: String,
    pub bin_dir: PathBuf,
    pub env_file: PathBuf,
    pub deployed: Vec<PathBuf>,
    pub dependencies_installed: bool,
    pub environment: PersistReport,
    pub reconcile: ReconcileReport,
}

/// The schedule selected by `settings`: a crontab-format file when one is
/// configured, the configured user's crontab otherwise.
pub fn schedule_for<'a, R: CommandRunner>(
    settings: &Settings,
    runner: &'a R,
) -> Box<dyn Schedule + 'a> {
    match &settings.schedule.file {
        Some(path) => Box::new(FileSchedule::new(path.clone())),
        None => Box::new(CrontabSchedule::new(runner, settings.schedule.user.clone())),
    }
}

/// Runs the installation against the host.
pub struct Provisioner<'a, R, E, P> {
    settings: &'a Settings,
    runner: &'a R,
    resolver: Resolver<E, P>,
    is_root: fn() -> bool,
    skip_packages: bool,
    observer: Box<dyn FnMut(Step) + 'a>,
}

impl<'a, R, E, P> Provisioner<'a, R, E, P>
where
    R: CommandRunner,
    E: EnvLookup,
    P: Prompter,
{
    pub fn new(settings: &'a Settings, runner: &'a R, resolver: Resolver<E, P>) -> Self {
        Self {
            settings,
            runner,
            resolver,
            is_root: system::is_root,
            skip_packages: false,
            observer: Box::new(|_| {}),
        }
    }

    /// Replace the privilege check.
    pub fn with_privilege_check(mut self, check: fn() -> bool) -> Self {
        self.is_root = check;
        self
    }

    /// Leave OS packages to whoever manages them on this host.
    pub fn skip_packages(mut self, skip: bool) -> Self {
        self.skip_packages = skip;
        self
    }

    /// Call `observer` as each step starts.
    pub fn on_step(mut self, observer: impl FnMut(Step) + 'a) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Provision the host.
    ///
    /// # Errors
    ///
    /// Fails before touching anything if not running as root or if no source
    /// repository is configured. Any later step failure aborts the run; the
    /// temporary workspace is removed either way.
    pub fn run(mut self) -> Result<ProvisionReport> {
        if !(self.is_root)() {
            return Err(PreconditionError::NotRoot.into());
        }
        let settings = self.settings;
        let repository = settings.repository()?;

        if self.skip_packages {
            debug!("skipping package installation");
        } else {
            (self.observer)(Step::InstallPackages);
            steps::install_packages(self.runner, &settings.packages)?;
        }

        (self.observer)(Step::ResolveValues);
        let values = self.resolver.resolve_all(CONFIG_KEYS)?;

        (self.observer)(Step::PersistEnvironment);
        let environment = envfile::persist_to(&values, &settings.env_file)?;

        (self.observer)(Step::FetchSources);
        let workspace = Workspace::create()?;
        let tree = workspace.path().join("agent");
        steps::fetch_sources(self.runner, repository, &settings.source.reference, &tree)?;

        (self.observer)(Step::InstallDependencies);
        let dependencies_installed =
            steps::install_dependencies(self.runner, &tree, &settings.source.manifest)?;

        (self.observer)(Step::PrepareFilesystem);
        steps::prepare_filesystem(&settings.state_dir, &settings.log_dir, &settings.log_files)?;

        (self.observer)(Step::DeployScripts);
        let deployed =
            steps::deploy_scripts(&tree.join(&settings.source.scripts_dir), &settings.bin_dir)?;

        (self.observer)(Step::ReconcileSchedule);
        let template = schedule::load_template(&tree.join(&settings.source.template))?;
        let target = schedule_for(settings, self.runner);
        let reconcile = schedule::reconcile(&values, &template, target.as_ref())?;

        drop(workspace);
        info!("provisioning complete");

        Ok(ProvisionReport {
            schedule: target.describe(),
            bin_dir: settings.bin_dir.clone(),
            env_file: settings.env_file.clone(),
            deployed,
            dependencies_installed,
            environment,
            reconcile,
        })
    }
}
