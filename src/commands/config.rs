// `clip-bootstrap config`: only the first-run settings step of `run`.

use crate::libs::orchestrator::{BootstrapOptions, ensure_user_config};
use crate::schemas::app_config::AppConfig;
use crate::log_info;
use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;

pub fn run(options: &BootstrapOptions) -> Result<ExitCode> {
    let dir = ensure_user_config(options).context("could not prepare the user configuration")?;
    log_info!("[Config] Settings directory ready: {}", dir.display().to_string().green());
    let settings = AppConfig::load(&dir)?;
    log_info!(
        "[Config] Downloads go to {} (on duplicate: {:?})",
        settings.download_directory.cyan(),
        settings.on_duplicate
    );
    println!("{}", dir.display());
    Ok(ExitCode::SUCCESS)
}
