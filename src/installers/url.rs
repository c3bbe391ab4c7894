//! # Prebuilt artifact installer
//!
//! Downloads "latest release" artifacts. A single binary goes straight to its
//! destination; an archive is unpacked and the transcoder pair is picked out
//! of it by file name, wherever the build put them.
//!
//! Downloads land in `<work>/downloads` as temp files and are deleted when
//! this module is done with them, so nothing partial ever reaches `binaries/`.

use crate::errors::{BootstrapError, Result};
use crate::installers::fetcher::place_sidecar;
use crate::libs::context::BootstrapContext;
use crate::libs::utilities::assets::{detect_file_type, download_to_temp};
use crate::libs::utilities::binary::find_named_file;
use crate::libs::utilities::compression::extract_archive;
use crate::schemas::sidecar::{InstalledBinary, SidecarName, SidecarSpec};
use crate::{log_debug, log_info, log_warn};
use colored::Colorize;
use std::fs;

/// Downloads a single-file binary from `url` and installs it as `spec`.
pub fn install_prebuilt(
    ctx: &BootstrapContext,
    spec: &SidecarSpec,
    url: &str,
) -> Result<InstalledBinary> {
    let download = download_to_temp(url, &ctx.staging_dir())?;

    let file_type = detect_file_type(download.path());
    if file_type != "binary" {
        log_warn!(
            "[URL] {} was expected to be a plain binary but looks like {}",
            url,
            file_type.yellow()
        );
    }

    place_sidecar(ctx, spec, download.path())
}

/// Downloads the transcoder archive from `url` and installs every member of
/// the transcoder pair that is still missing.
///
/// Both binaries come out of the same archive, so one download serves the
/// pair. Returns the installed entry for `spec`.
pub fn install_transcoder_archive(
    ctx: &BootstrapContext,
    spec: &SidecarSpec,
    url: &str,
) -> Result<InstalledBinary> {
    let download = download_to_temp(url, &ctx.staging_dir())?;
    let file_type = detect_file_type(download.path());
    log_debug!("[URL] Archive type for {}: {}", url, file_type.cyan());

    if file_type == "binary" {
        return Err(BootstrapError::Build(format!(
            "expected an archive containing {} at {url}, got a plain file",
            spec.name
        )));
    }

    let extracted = extract_archive(download.path(), &ctx.extract_dir(), Some(&file_type))?;

    let mut members = vec![spec.name];
    members.extend(spec.name.pair_member());

    let mut requested = None;
    for name in members {
        let member = SidecarSpec::by_name(name);
        if name != spec.name && ctx.layout.is_present(member, &ctx.profile) {
            log_debug!("[URL] {} already present, not reinstalling from archive", name);
            continue;
        }

        let wanted = member.unsuffixed_filename(ctx.profile.os_family);
        let Some(found) = find_named_file(&extracted, &wanted) else {
            return Err(BootstrapError::Build(format!(
                "archive from {url} does not contain {wanted}"
            )));
        };

        log_info!(
            "[URL] Installing {} from {}",
            name.to_string().bold(),
            found.display().to_string().cyan()
        );
        let installed = place_sidecar(ctx, member, &found)?;
        if name == spec.name {
            requested = Some(installed);
        }
    }

    if let Err(e) = fs::remove_dir_all(&extracted) {
        log_debug!("[URL] Could not remove {}: {}", extracted.display(), e);
    }

    requested.ok_or_else(|| {
        BootstrapError::Build(format!("{} was not installed from {url}", spec.name))
    })
}

/// The transcoder pair is the only archive-shipped sidecar.
pub fn ships_in_archive(name: SidecarName) -> bool {
    name.pair_member().is_some()
}
