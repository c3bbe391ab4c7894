//! # Orchestrator
//!
//! Sequences one bootstrap run:
//!
//! 1. First-run user configuration.
//! 2. Platform profile (OS family and host triple).
//! 3. Preflight of the system dependencies the missing sidecars need.
//! 4. Every sidecar that is downloaded or taken from the system.
//! 5. Every sidecar that is built locally.
//! 6. The `resources/` placeholder.
//!
//! The first error stops the run; nothing after it is attempted and the
//! application is not launched.

use crate::errors::Result;
use crate::installers::fetcher;
use crate::libs::config_bootstrap::{default_download_dir, ensure_config, resolve_config_dir};
use crate::libs::context::BootstrapContext;
use crate::libs::paths::Layout;
use crate::libs::utilities::file_operations::ensure_placeholder;
use crate::libs::utilities::platform::{OsFamily, PlatformProfile};
use crate::platforms::{PlatformProvider, provider_for};
use crate::schemas::sidecar::{Acquisition, InstalledBinary, SIDECARS, SidecarSpec};
use crate::schemas::sources::DownloadSources;
use crate::{log_debug, log_info};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

/// Where one run reads and writes.
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// Application resource root holding `binaries/` and `resources/`.
    pub root: PathBuf,
    /// Scratch directory; `<root>/.bootstrap` when not given.
    pub work_dir: Option<PathBuf>,
    /// Overrides the per-OS user config directory.
    pub config_dir: Option<PathBuf>,
    pub app_name: String,
}

impl BootstrapOptions {
    pub fn work_dir(&self) -> PathBuf {
        self.work_dir
            .clone()
            .unwrap_or_else(|| self.root.join(".bootstrap"))
    }
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct BootstrapReport {
    pub config_dir: PathBuf,
    pub sidecars: Vec<InstalledBinary>,
}

/// Runs the whole bootstrap for the current machine.
pub fn bootstrap(options: &BootstrapOptions) -> Result<BootstrapReport> {
    let config_dir = ensure_user_config(options)?;

    let profile = PlatformProfile::resolve()?;
    log_info!(
        "[Bootstrap] Provisioning for {} ({})",
        profile.os_family.to_string().bold(),
        profile.target_triple.cyan()
    );

    let sources = DownloadSources::from_env(&profile);
    let provider = provider_for(profile.os_family);
    let ctx = BootstrapContext::new(
        profile,
        Layout::new(&options.root),
        options.work_dir(),
        sources,
    );

    let sidecars = provision(&ctx, provider.as_ref())?;
    Ok(BootstrapReport {
        config_dir,
        sidecars,
    })
}

/// Resolves the config directory and writes first-run settings there.
pub fn ensure_user_config(options: &BootstrapOptions) -> Result<PathBuf> {
    let dir = resolve_config_dir(
        OsFamily::current(),
        &options.app_name,
        options.config_dir.clone(),
    )?;
    ensure_config(&dir, &default_download_dir())?;
    Ok(dir)
}

/// Makes every sidecar present under the context's layout.
pub fn provision(
    ctx: &BootstrapContext,
    provider: &dyn PlatformProvider,
) -> Result<Vec<InstalledBinary>> {
    fs::create_dir_all(ctx.layout.root())?;

    let pending: Vec<&SidecarSpec> = SIDECARS
        .iter()
        .filter(|spec| !ctx.layout.is_present(spec, &ctx.profile))
        .collect();
    log_debug!(
        "[Bootstrap] {} of {} sidecars pending",
        pending.len(),
        SIDECARS.len()
    );
    provider.preflight(ctx, &pending)?;

    let os = ctx.profile.os_family;
    let is_build = |spec: &&SidecarSpec| spec.acquisition(os) == Acquisition::Build;

    let mut installed = Vec::with_capacity(SIDECARS.len());
    for spec in SIDECARS.iter().filter(|s| !is_build(s)) {
        installed.push(fetcher::ensure(ctx, provider, spec)?);
    }
    for spec in SIDECARS.iter().filter(|s| is_build(s)) {
        installed.push(fetcher::ensure(ctx, provider, spec)?);
    }

    ensure_placeholder(&ctx.layout.resources_dir())?;
    log_info!("[Bootstrap] {}", "All sidecars provisioned".green());
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BootstrapError;
    use crate::installers::brew;
    use crate::libs::utilities::binary::EXTRA_SEARCH_DIRS;
    use crate::platforms::{LinuxProvider, MacOsProvider};
    use crate::schemas::sidecar::SidecarName;
    use serial_test::serial;
    use std::path::Path;
    use std::thread;
    use tempfile::TempDir;
    use tiny_http::{Response, Server};

    fn linux_ctx(root: &Path, sources: DownloadSources) -> BootstrapContext {
        let profile = PlatformProfile::new(OsFamily::Linux, "x86_64-unknown-linux-gnu");
        BootstrapContext::new(profile, Layout::new(root), root.join(".bootstrap"), sources)
    }

    fn unreachable_sources() -> DownloadSources {
        DownloadSources {
            fetcher: "http://127.0.0.1:9/yt-dlp".into(),
            transcoder_archive: Some("http://127.0.0.1:9/ffmpeg.tar.xz".into()),
            scraper_prebuilt: None,
        }
    }

    fn fill_tree(ctx: &BootstrapContext) {
        for spec in SIDECARS.iter() {
            for path in ctx.layout.destinations(spec, &ctx.profile) {
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(&path, b"old").unwrap();
            }
        }
    }

    #[test]
    fn provisioned_tree_needs_no_network_and_keeps_files() {
        let tmp = TempDir::new().unwrap();
        let ctx = linux_ctx(tmp.path(), unreachable_sources());
        fill_tree(&ctx);

        let first = provision(&ctx, &LinuxProvider).unwrap();
        let second = provision(&ctx, &LinuxProvider).unwrap();

        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 4);
        for spec in SIDECARS.iter() {
            for path in ctx.layout.destinations(spec, &ctx.profile) {
                assert_eq!(fs::read(&path).unwrap(), b"old");
            }
        }
        assert!(ctx.layout.placeholder_path().is_file());
    }

    struct RefusingProvider;

    impl PlatformProvider for RefusingProvider {
        fn family(&self) -> OsFamily {
            OsFamily::MacOs
        }

        fn preflight(&self, _ctx: &BootstrapContext, pending: &[&SidecarSpec]) -> Result<()> {
            assert!(!pending.is_empty());
            Err(BootstrapError::missing("Homebrew", "Install it from https://brew.sh"))
        }
    }

    #[test]
    fn failed_preflight_writes_no_sidecar() {
        let tmp = TempDir::new().unwrap();
        let ctx = linux_ctx(tmp.path(), unreachable_sources());

        let err = provision(&ctx, &RefusingProvider).unwrap_err();

        assert!(matches!(err, BootstrapError::MissingSystemDependency { .. }));
        assert!(!ctx.layout.binaries_dir().exists());
        assert!(!ctx.layout.placeholder_path().exists());
    }

    /// No ffmpeg and no `brew` anywhere on the extended search path.
    fn host_lacks_transcoder_and_homebrew() -> bool {
        EXTRA_SEARCH_DIRS.iter().all(|dir| {
            let dir = Path::new(dir);
            !dir.join("ffmpeg").exists() && !dir.join("brew").exists()
        })
    }

    #[test]
    #[serial]
    fn macos_without_homebrew_stops_before_writing() {
        if !host_lacks_transcoder_and_homebrew() {
            eprintln!("skipping: ffmpeg or brew is installed on this host");
            return;
        }
        let tmp = TempDir::new().unwrap();
        let empty_bin = tmp.path().join("empty-bin");
        fs::create_dir_all(&empty_bin).unwrap();
        let root = tmp.path().join("src-tauri");
        let profile = PlatformProfile::new(OsFamily::MacOs, "aarch64-apple-darwin");
        let ctx = BootstrapContext::new(
            profile,
            Layout::new(&root),
            root.join(".bootstrap"),
            unreachable_sources(),
        );

        let previous = std::env::var_os("PATH");
        unsafe { std::env::set_var("PATH", &empty_bin) };
        let provisioned = provision(&ctx, &MacOsProvider);
        let located = brew::locate_or_install(&ctx, SidecarSpec::by_name(SidecarName::Transcoder));
        match previous {
            Some(value) => unsafe { std::env::set_var("PATH", value) },
            None => unsafe { std::env::remove_var("PATH") },
        }

        for result in [provisioned.map(|_| ()), located.map(|_| ())] {
            let err = result.unwrap_err();
            assert!(matches!(err, BootstrapError::MissingSystemDependency { .. }));
            assert!(err.to_string().contains("https://brew.sh"), "{err}");
        }
        assert!(!ctx.layout.binaries_dir().exists());
        assert!(!ctx.layout.resources_dir().exists());
    }

    fn ffmpeg_archive() -> Vec<u8> {
        let mut builder = tar::Builder::new(xz2::write::XzEncoder::new(Vec::new(), 6));
        for (name, data) in [("static/ffmpeg", "ffmpeg-bin"), ("static/ffprobe", "ffprobe-bin")] {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, data.as_bytes()).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn clean_linux_tree_is_filled_from_downloads() {
        let server = Server::http("127.0.0.1:0").unwrap();
        let base = format!("http://{}", server.server_addr().to_ip().unwrap());
        let archive = ffmpeg_archive();
        let handle = thread::spawn(move || {
            // One archive download serves both transcoder binaries.
            for _ in 0..2 {
                let Ok(request) = server.recv() else { return };
                let body = if request.url().ends_with(".tar.xz") {
                    archive.clone()
                } else {
                    b"#!/bin/sh\necho yt-dlp\n".to_vec()
                };
                let _ = request.respond(Response::from_data(body));
            }
        });

        let tmp = TempDir::new().unwrap();
        let ctx = linux_ctx(
            tmp.path(),
            DownloadSources {
                fetcher: format!("{base}/yt-dlp_linux"),
                transcoder_archive: Some(format!("{base}/ffmpeg-release-amd64-static.tar.xz")),
                scraper_prebuilt: None,
            },
        );
        // The scraper is a local build on Linux; pretend it already happened.
        let scraper = SidecarSpec::by_name(SidecarName::Scraper);
        let scraper_path = ctx.layout.sidecar_path(scraper, &ctx.profile);
        fs::create_dir_all(scraper_path.parent().unwrap()).unwrap();
        fs::write(&scraper_path, b"built").unwrap();
        crate::libs::utilities::binary::make_executable(&scraper_path).unwrap();

        let installed = provision(&ctx, &LinuxProvider).unwrap();
        handle.join().unwrap();

        assert!(installed.iter().all(|b| b.executable));
        for spec in SIDECARS.iter() {
            assert!(ctx.layout.is_present(spec, &ctx.profile), "{} missing", spec.name);
        }
        assert_eq!(
            fs::read(tmp.path().join("resources/ffmpeg")).unwrap(),
            b"ffmpeg-bin"
        );
        assert!(ctx.layout.placeholder_path().is_file());
    }
}
