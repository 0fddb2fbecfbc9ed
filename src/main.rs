//! Scenario Runner - Main entry point
//!
//! Parses the command line, runs the scenario, and maps the outcome to the
//! process exit code (0 on success or a false-condition stop, 1 otherwise).

use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use scenario_runner::cli::Cli;
use scenario_runner::{ActionRegistry, RunOutcome, run_scenario_file};

/// Initialize the logger with appropriate settings
fn init_logger() {
    tracing_subscriber::fmt()
        .with_env_filter(
            // Allows RUST_LOG env var to override
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<RunOutcome> {
    cli.validate()?;

    let registry = ActionRegistry::with_filesystem_actions();
    run_scenario_file(&registry, &cli.scenario, &cli.out)
        .with_context(|| format!("scenario {} failed", cli.scenario.display()))
}

fn main() -> ExitCode {
    init_logger();

    let cli = Cli::parse_args();
    match run(&cli) {
        Ok(RunOutcome::CompletedAll) => {
            info!("all steps completed, result saved to {}", cli.out.display());
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::StoppedAtFalseCondition { step }) => {
            info!(
                "stopped at false condition (step {}), result saved to {}",
                step,
                cli.out.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("app failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
