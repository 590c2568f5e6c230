//! mgsetup - Idempotent installer for the MG modem monitoring agent.

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mgsetup::cli::output;
use mgsetup::cli::{execute, Cli};
use mgsetup::core::cleanup;

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("MGSETUP_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("mgsetup=debug")
        } else {
            EnvFilter::new("mgsetup=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = cleanup::install_signal_handlers() {
        warn!(error = %e, "signal handlers not installed");
    }

    if let Err(e) = execute(cli) {
        output::error(&e.to_string());
        if let Some(hint) = e.hint() {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
