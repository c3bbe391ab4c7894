// `clip-bootstrap status`: what is provisioned under the resource root.
//
// Purely read-only. For every sidecar it reports the triple-qualified binary,
// its unsuffixed companion (if it has one), and whether the tool is also on
// the operator's PATH. Exits non-zero if any sidecar is missing.

use crate::libs::orchestrator::BootstrapOptions;
use crate::libs::paths::Layout;
use crate::libs::utilities::binary::{find_on_search_path, is_executable};
use crate::libs::utilities::platform::PlatformProfile;
use crate::log_warn;
use crate::schemas::sidecar::{SIDECARS, SidecarName};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarStatus {
    pub name: SidecarName,
    pub path: PathBuf,
    pub present: bool,
    pub executable: bool,
    /// `None` when the sidecar has no unsuffixed copy.
    pub companion_present: Option<bool>,
}

impl SidecarStatus {
    pub fn is_provisioned(&self) -> bool {
        self.present && self.executable && self.companion_present.unwrap_or(true)
    }
}

pub fn collect(layout: &Layout, profile: &PlatformProfile) -> Vec<SidecarStatus> {
    SIDECARS
        .iter()
        .map(|spec| {
            let path = layout.sidecar_path(spec, profile);
            SidecarStatus {
                name: spec.name,
                present: path.exists(),
                executable: is_executable(&path),
                companion_present: layout.unsuffixed_path(spec, profile).map(|p| p.exists()),
                path,
            }
        })
        .collect()
}

pub fn run(options: &BootstrapOptions) -> Result<ExitCode> {
    let profile = PlatformProfile::resolve().context("cannot determine the host target triple")?;
    let layout = Layout::new(&options.root);

    println!(
        "{} {} ({})",
        "Sidecars for".bold(),
        profile.target_triple.cyan(),
        layout.root().display()
    );

    let statuses = collect(&layout, &profile);
    for status in &statuses {
        let state = if status.is_provisioned() {
            "ok".green()
        } else if status.present {
            "incomplete".yellow()
        } else {
            "missing".red()
        };
        let companion = match status.companion_present {
            Some(true) => "companion ok",
            Some(false) => "companion missing",
            None => "no companion",
        };
        let on_path = match find_on_search_path(status.name.tool()) {
            Some(path) => format!("on PATH at {}", path.display()),
            None => "not on PATH".to_string(),
        };
        println!(
            "  {:<12} {:<10} {} ; {} ; {}",
            status.name.tool().bold(),
            state,
            status.path.display(),
            companion,
            on_path.dimmed()
        );
    }

    let placeholder = if layout.placeholder_path().is_file() {
        "placeholder ok".green()
    } else {
        "placeholder missing".yellow()
    };
    println!("  {:<12} {}", "resources".bold(), placeholder);

    let missing = statuses.iter().filter(|s| !s.is_provisioned()).count();
    if missing > 0 {
        log_warn!(
            "[Status] {} sidecar(s) not provisioned; run `clip-bootstrap run --no-launch`",
            missing
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
