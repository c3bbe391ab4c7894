//! # System lookup and Homebrew installer
//!
//! On macOS the transcoder pair is not downloaded. The tool is taken from the
//! operator's PATH (extended with the usual Homebrew and system bin
//! directories); if it is not there, `brew install` provides it. The located
//! binary is then copied into the resource tree like any other sidecar.
//!
//! When neither the tool nor `brew` exists the run stops with a
//! `MissingSystemDependency` error naming the Homebrew install page.

use crate::errors::{BootstrapError, Result};
use crate::installers::fetcher::place_sidecar;
use crate::libs::context::BootstrapContext;
use crate::libs::utilities::binary::{find_on_search_path, is_executable};
use crate::schemas::sidecar::{InstalledBinary, SidecarName, SidecarSpec};
use crate::schemas::sources::HOMEBREW_INSTALL_URL;
use crate::{log_debug, log_error, log_info, log_warn};
use colored::Colorize;
use std::path::PathBuf;
use std::process::Stdio;

/// Homebrew formula providing `name`. Both halves of the transcoder pair
/// come from the same formula.
pub fn formula_for(name: SidecarName) -> &'static str {
    match name {
        SidecarName::Transcoder | SidecarName::TranscoderProbe => "ffmpeg",
        SidecarName::Fetcher => "yt-dlp",
        SidecarName::Scraper => "gallery-dl",
    }
}

/// Path to `brew`, if Homebrew is installed.
pub fn brew_executable() -> Option<PathBuf> {
    find_on_search_path("brew")
}

/// The error reported when Homebrew is needed but absent.
pub fn homebrew_missing(tool: &str) -> BootstrapError {
    BootstrapError::missing(
        "Homebrew",
        format!(
            "{tool} was not found on PATH and Homebrew is needed to install it. \
             Install Homebrew from {HOMEBREW_INSTALL_URL} and re-run the bootstrap."
        ),
    )
}

/// Finds `spec`'s tool on the system, installing its formula first when needed,
/// and places it into the resource tree.
pub fn locate_or_install(ctx: &BootstrapContext, spec: &SidecarSpec) -> Result<InstalledBinary> {
    let tool = spec.name.tool();

    let source = match find_on_search_path(tool) {
        Some(path) => {
            log_info!(
                "[Brew] Using system {} at {}",
                tool.bold(),
                path.display().to_string().cyan()
            );
            path
        }
        None => install_formula(ctx, spec)?,
    };

    place_sidecar(ctx, spec, &source)
}

fn install_formula(ctx: &BootstrapContext, spec: &SidecarSpec) -> Result<PathBuf> {
    let tool = spec.name.tool();
    let formula = formula_for(spec.name);
    let Some(brew) = brew_executable() else {
        log_error!("[Brew] {} is not on PATH and Homebrew is missing", tool.red());
        return Err(homebrew_missing(tool));
    };

    log_info!(
        "[Brew] {} not found on PATH, running {}",
        tool.yellow(),
        format!("brew install {formula}").cyan()
    );

    let status = ctx
        .command(&brew, ctx.layout.root())
        .args(["install", formula])
        .env("HOMEBREW_NO_AUTO_UPDATE", "1")
        .env("HOMEBREW_NO_INSTALL_CLEANUP", "1")
        .stdin(Stdio::null())
        .status()?;

    if !status.success() {
        log_error!(
            "[Brew] brew install {} exited with {}",
            formula.red(),
            status.code().map_or("a signal".to_string(), |c| c.to_string())
        );
        return Err(BootstrapError::Build(format!(
            "`brew install {formula}` did not succeed"
        )));
    }

    if let Some(path) = formula_binary(ctx, &brew, formula, tool) {
        return Ok(path);
    }

    log_warn!(
        "[Brew] {} not under the formula prefix, searching PATH again",
        tool
    );
    find_on_search_path(tool).ok_or_else(|| {
        BootstrapError::Build(format!(
            "`brew install {formula}` succeeded but {tool} could not be found"
        ))
    })
}

/// `<brew --prefix formula>/bin/<tool>`, when it exists and is executable.
fn formula_binary(
    ctx: &BootstrapContext,
    brew: &std::path::Path,
    formula: &str,
    tool: &str,
) -> Option<PathBuf> {
    let output = ctx
        .command(brew, ctx.layout.root())
        .args(["--prefix", formula])
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let prefix = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let candidate = PathBuf::from(prefix).join("bin").join(tool);
    log_debug!("[Brew] Checking formula binary at {}", candidate.display());
    is_executable(&candidate).then_some(candidate)
}
