// Resolves where sidecars live under the application resource root.
//
//   <root>/binaries/<tool>-<target_triple>[.exe]   triple-qualified sidecars
//   <root>/resources/<tool>[.exe]                  unsuffixed copies
//
// The two trees are what the application's bundler and sidecar registry read.

use crate::libs::utilities::file_operations::PLACEHOLDER_FILE;
use crate::libs::utilities::platform::PlatformProfile;
use crate::schemas::sidecar::SidecarSpec;
use std::path::{Path, PathBuf};

/// Paths under one application resource root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Usually `src-tauri`, relative to the directory the bootstrap runs in.
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Layout { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/binaries`, read by the sidecar registry.
    pub fn binaries_dir(&self) -> PathBuf {
        self.root.join("binaries")
    }

    /// `<root>/resources`, globbed by the bundler.
    pub fn resources_dir(&self) -> PathBuf {
        self.root.join("resources")
    }

    /// Keeps the bundler's resources glob from matching nothing.
    pub fn placeholder_path(&self) -> PathBuf {
        self.resources_dir().join(PLACEHOLDER_FILE)
    }

    /// Destination of the triple-qualified sidecar.
    pub fn sidecar_path(&self, spec: &SidecarSpec, profile: &PlatformProfile) -> PathBuf {
        // e.g. binaries/ffmpeg-aarch64-apple-darwin
        self.binaries_dir().join(spec.filename(profile))
    }

    /// Destination of the unsuffixed copy, for sidecars that need one.
    pub fn unsuffixed_path(&self, spec: &SidecarSpec, profile: &PlatformProfile) -> Option<PathBuf> {
        // Only the transcoder pair; the scraper finds them by plain name.
        spec.needs_unsuffixed_copy
            .then(|| self.resources_dir().join(spec.unsuffixed_filename(profile.os_family)))
    }

    /// Every path a provisioned sidecar occupies.
    pub fn destinations(&self, spec: &SidecarSpec, profile: &PlatformProfile) -> Vec<PathBuf> {
        // Triple-qualified first, so callers can treat paths[0] as the primary.
        let mut paths = vec![self.sidecar_path(spec, profile)];
        paths.extend(self.unsuffixed_path(spec, profile));
        paths
    }

    /// Existence implies current: no checksum or version comparison is made.
    pub fn is_present(&self, spec: &SidecarSpec, profile: &PlatformProfile) -> bool {
        // Contents are never inspected; an empty file counts.
        self.destinations(spec, profile).iter().all(|p| p.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::utilities::platform::OsFamily;
    use crate::schemas::sidecar::{SidecarName, SidecarSpec};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn windows_paths_carry_exe_in_both_trees() {
        let layout = Layout::new("/app/src-tauri");
        let profile = PlatformProfile::new(OsFamily::Windows, "x86_64-pc-windows-msvc");
        let ffmpeg = SidecarSpec::by_name(SidecarName::Transcoder);

        assert_eq!(
            layout.destinations(ffmpeg, &profile),
            vec![
                PathBuf::from("/app/src-tauri/binaries/ffmpeg-x86_64-pc-windows-msvc.exe"),
                PathBuf::from("/app/src-tauri/resources/ffmpeg.exe"),
            ]
        );
        let fetcher = SidecarSpec::by_name(SidecarName::Fetcher);
        assert_eq!(layout.unsuffixed_path(fetcher, &profile), None);
    }

    #[test]
    fn presence_requires_every_destination() {
        let tmp = TempDir::new().unwrap();
        let layout = Layout::new(tmp.path());
        let profile = PlatformProfile::new(OsFamily::Linux, "x86_64-unknown-linux-gnu");
        let ffprobe = SidecarSpec::by_name(SidecarName::TranscoderProbe);

        let triple = layout.sidecar_path(ffprobe, &profile);
        fs::create_dir_all(triple.parent().unwrap()).unwrap();
        fs::write(&triple, b"x").unwrap();
        assert!(!layout.is_present(ffprobe, &profile));

        let plain = layout.unsuffixed_path(ffprobe, &profile).unwrap();
        fs::create_dir_all(plain.parent().unwrap()).unwrap();
        fs::write(&plain, b"x").unwrap();
        assert!(layout.is_present(ffprobe, &profile));
    }
}
