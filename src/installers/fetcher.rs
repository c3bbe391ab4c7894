//! # Sidecar fetcher
//!
//! `ensure` is the single entry point the orchestrator calls per sidecar.
//! It returns immediately when every destination already exists (no network,
//! no subprocess); otherwise it dispatches on the sidecar's acquisition
//! strategy for this OS family to the selected platform provider.

use crate::errors::{BootstrapError, Result};
use crate::libs::context::BootstrapContext;
use crate::libs::utilities::file_operations::{install, link_or_copy};
use crate::libs::utilities::platform::OsFamily;
use crate::platforms::PlatformProvider;
use crate::schemas::sidecar::{Acquisition, InstalledBinary, SidecarSpec};
use crate::{log_debug, log_info};
use colored::Colorize;
use std::io;
use std::path::Path;

/// Makes sure `spec` is installed and executable, acquiring it if absent.
pub fn ensure(
    ctx: &BootstrapContext,
    provider: &dyn PlatformProvider,
    spec: &SidecarSpec,
) -> Result<InstalledBinary> {
    let dest = ctx.layout.sidecar_path(spec, &ctx.profile);

    if ctx.layout.is_present(spec, &ctx.profile) {
        log_info!(
            "[Fetcher] {} already present at {}",
            spec.name.to_string().bold(),
            dest.display().to_string().cyan()
        );
        return Ok(InstalledBinary::inspect(spec, dest));
    }

    let acquisition = spec.acquisition(ctx.profile.os_family);
    log_info!(
        "[Fetcher] Acquiring {} for {} ({:?})",
        spec.name.to_string().bold(),
        ctx.profile.target_triple.cyan(),
        acquisition
    );

    let installed = match acquisition {
        Acquisition::Download => provider.fetch_prebuilt(ctx, spec)?,
        Acquisition::SystemLookup => provider.locate_system(ctx, spec)?,
        Acquisition::Build => provider.build_from_source(ctx, spec)?,
    };

    if !installed.executable {
        return Err(BootstrapError::Install {
            path: installed.path,
            source: io::Error::new(
                io::ErrorKind::PermissionDenied,
                "installed file is not executable",
            ),
        });
    }

    log_info!(
        "[Fetcher] {} ready at {}",
        spec.name.to_string().green(),
        installed.path.display()
    );
    Ok(installed)
}

/// Installs `source` as the triple-qualified sidecar and, when the sidecar asks
/// for one, as the unsuffixed copy under `resources/`.
///
/// On Unix the copy is a link to the triple-qualified file. On Windows it is a
/// second full install because the two names differ by more than a suffix.
pub(crate) fn place_sidecar(
    ctx: &BootstrapContext,
    spec: &SidecarSpec,
    source: &Path,
) -> Result<InstalledBinary> {
    let dest = ctx.layout.sidecar_path(spec, &ctx.profile);
    install(source, &dest)?;

    if let Some(plain) = ctx.layout.unsuffixed_path(spec, &ctx.profile) {
        log_debug!(
            "[Fetcher] Placing unsuffixed copy of {} at {}",
            spec.name,
            plain.display()
        );
        match ctx.profile.os_family {
            OsFamily::Windows => install(source, &plain)?,
            OsFamily::MacOs | OsFamily::Linux => link_or_copy(&dest, &plain)?,
        }
    }

    Ok(InstalledBinary::inspect(spec, dest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::paths::Layout;
    use crate::libs::utilities::platform::PlatformProfile;
    use crate::platforms::LinuxProvider;
    use crate::schemas::sidecar::SidecarName;
    use crate::schemas::sources::DownloadSources;
    use std::fs;
    use tempfile::TempDir;

    fn linux_ctx(root: &Path) -> BootstrapContext {
        let profile = PlatformProfile::new(OsFamily::Linux, "x86_64-unknown-linux-gnu");
        let mut sources = DownloadSources::defaults_for(&profile);
        // Any network access in these tests would fail loudly.
        sources.fetcher = "http://127.0.0.1:9/yt-dlp".to_string();
        sources.transcoder_archive = Some("http://127.0.0.1:9/ffmpeg.tar.xz".to_string());
        BootstrapContext::new(profile, Layout::new(root), root.join(".bootstrap"), sources)
    }

    #[test]
    fn present_sidecar_short_circuits() {
        let tmp = TempDir::new().unwrap();
        let ctx = linux_ctx(tmp.path());
        let spec = SidecarSpec::by_name(SidecarName::Fetcher);
        let dest = ctx.layout.sidecar_path(spec, &ctx.profile);
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(&dest, b"existing").unwrap();

        let installed = ensure(&ctx, &LinuxProvider, spec).unwrap();

        assert_eq!(installed.path, dest);
        assert_eq!(fs::read(&dest).unwrap(), b"existing");
    }

    #[test]
    fn absent_sidecar_reaches_the_network() {
        let tmp = TempDir::new().unwrap();
        let ctx = linux_ctx(tmp.path());
        let spec = SidecarSpec::by_name(SidecarName::Fetcher);

        let err = ensure(&ctx, &LinuxProvider, spec).unwrap_err();

        assert!(matches!(err, BootstrapError::Network { .. }));
        assert!(!ctx.layout.sidecar_path(spec, &ctx.profile).exists());
    }

    #[test]
    fn place_sidecar_fills_both_trees() {
        let tmp = TempDir::new().unwrap();
        let ctx = linux_ctx(tmp.path());
        let source = tmp.path().join("ffmpeg");
        fs::write(&source, b"ffmpeg-bin").unwrap();
        let spec = SidecarSpec::by_name(SidecarName::Transcoder);

        let installed = place_sidecar(&ctx, spec, &source).unwrap();

        assert_eq!(
            installed.path,
            tmp.path().join("binaries/ffmpeg-x86_64-unknown-linux-gnu")
        );
        assert_eq!(fs::read(tmp.path().join("resources/ffmpeg")).unwrap(), b"ffmpeg-bin");
        assert!(installed.executable);
    }
}
