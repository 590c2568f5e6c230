//! Install command.

use tracing::debug;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::prompt::{ProcessEnv, Prompter, Resolver};
use crate::core::provision::Provisioner;
use crate::core::system::ProcessRunner;
use crate::error::Result;

/// Provision the host and print where everything went.
pub fn execute(settings: &Settings, prompter: Box<dyn Prompter>, skip_packages: bool) -> Result<()> {
    let runner = ProcessRunner;
    let resolver = Resolver::new(ProcessEnv, prompter);

    let report = Provisioner::new(settings, &runner, resolver)
        .skip_packages(skip_packages)
        .on_step(|step| output::step(step.label()))
        .run()?;

    debug!(
        deployed = report.deployed.len(),
        dependencies = report.dependencies_installed,
        jobs = report.reconcile.jobs,
        "install finished"
    );

    output::success("mg-monitor installed");
    output::kv("schedule", &report.schedule);
    output::kv("scripts", output::path(report.bin_dir.display()));
    output::kv("environment", output::path(report.env_file.display()));
    Ok(())
}
