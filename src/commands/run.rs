// `clip-bootstrap run`: provision everything, then hand over to the application.
//
// The application is only started after every sidecar is present and
// executable; any failure before that exits non-zero without launching.

use crate::libs::launcher::LaunchCommand;
use crate::libs::orchestrator::{BootstrapOptions, bootstrap};
use crate::{log_debug, log_info};
use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;

pub fn run(
    options: &BootstrapOptions,
    launch: &str,
    no_launch: bool,
    args: &[String],
) -> Result<ExitCode> {
    // Parsed first so a bad launch command fails before any download.
    let command = if no_launch {
        None
    } else {
        Some(LaunchCommand::parse(launch, args)?)
    };

    let report = bootstrap(options).context("bootstrap did not complete")?;
    log_info!(
        "[Run] {} sidecars ready, settings in {}",
        report.sidecars.len(),
        report.config_dir.display().to_string().cyan()
    );

    for sidecar in &report.sidecars {
        log_debug!("[Run] {} -> {}", sidecar.spec.name, sidecar.path.display());
    }

    let Some(command) = command else {
        log_info!("[Run] {}", "--no-launch given, not starting the application".yellow());
        return Ok(ExitCode::SUCCESS);
    };

    let code = command
        .launch()
        .with_context(|| format!("could not start `{}`", command.display()))?;
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
