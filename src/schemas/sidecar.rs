// Static description of every external tool the application shells out to,
// and the record of one that has been installed.

use crate::libs::utilities::binary::is_executable;
use crate::libs::utilities::platform::{OsFamily, PlatformProfile};
use std::fmt;
use std::path::PathBuf;

/// Logical role of a sidecar inside the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SidecarName {
    /// Video/media fetcher (`yt-dlp`).
    Fetcher,
    /// Audio/video transcoder (`ffmpeg`).
    Transcoder,
    /// Media prober shipped with the transcoder (`ffprobe`).
    TranscoderProbe,
    /// Site-scraping utility (`gallery-dl`).
    Scraper,
}

impl SidecarName {
    /// The conventional, unsuffixed command name of the tool.
    pub fn tool(self) -> &'static str {
        match self {
            SidecarName::Fetcher => "yt-dlp",
            SidecarName::Transcoder => "ffmpeg",
            SidecarName::TranscoderProbe => "ffprobe",
            SidecarName::Scraper => "gallery-dl",
        }
    }

    /// The other half of the transcoder pair, if this is one of them.
    pub fn pair_member(self) -> Option<SidecarName> {
        match self {
            SidecarName::Transcoder => Some(SidecarName::TranscoderProbe),
            SidecarName::TranscoderProbe => Some(SidecarName::Transcoder),
            SidecarName::Fetcher | SidecarName::Scraper => None,
        }
    }
}

impl fmt::Display for SidecarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool())
    }
}

/// How a sidecar is obtained when it is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    /// HTTPS GET of a prebuilt artifact (single binary or archive).
    Download,
    /// Probe PATH, then the OS package manager.
    SystemLookup,
    /// Build a onefile executable in an isolated Python environment.
    Build,
}

/// Compile-time description of one required tool.
#[derive(Debug, Clone, Copy)]
pub struct SidecarSpec {
    pub name: SidecarName,
    /// The scraper auto-detects these by their unsuffixed name under `resources/`.
    pub needs_unsuffixed_copy: bool,
    acquisition: fn(OsFamily) -> Acquisition,
}

impl SidecarSpec {
    pub fn acquisition(&self, os: OsFamily) -> Acquisition {
        (self.acquisition)(os)
    }

    /// `<tool>-<target_triple>[.exe]`, the name the sidecar registry expects.
    pub fn filename(&self, profile: &PlatformProfile) -> String {
        format!(
            "{}-{}{}",
            self.name.tool(),
            profile.target_triple,
            profile.os_family.exe_suffix()
        )
    }

    /// `<tool>[.exe]`, the conventional name other tools look for.
    pub fn unsuffixed_filename(&self, os: OsFamily) -> String {
        format!("{}{}", self.name.tool(), os.exe_suffix())
    }

    pub fn by_name(name: SidecarName) -> &'static SidecarSpec {
        // Indices follow the order of SIDECARS.
        match name {
            SidecarName::Transcoder => &SIDECARS[0],
            SidecarName::TranscoderProbe => &SIDECARS[1],
            SidecarName::Fetcher => &SIDECARS[2],
            SidecarName::Scraper => &SIDECARS[3],
        }
    }
}

fn transcoder_acquisition(os: OsFamily) -> Acquisition {
    match os {
        OsFamily::MacOs => Acquisition::SystemLookup,
        OsFamily::Linux | OsFamily::Windows => Acquisition::Download,
    }
}

fn fetcher_acquisition(_os: OsFamily) -> Acquisition {
    Acquisition::Download
}

fn scraper_acquisition(os: OsFamily) -> Acquisition {
    match os {
        OsFamily::MacOs | OsFamily::Linux => Acquisition::Build,
        // Windows takes the prebuilt upstream executable.
        OsFamily::Windows => Acquisition::Download,
    }
}

/// Every required sidecar, in provisioning order. The system-dependent
/// transcoder pair goes first so a missing package manager aborts the run
/// before any other sidecar file is written.
pub static SIDECARS: [SidecarSpec; 4] = [
    SidecarSpec {
        name: SidecarName::Transcoder,
        needs_unsuffixed_copy: true,
        acquisition: transcoder_acquisition,
    },
    SidecarSpec {
        name: SidecarName::TranscoderProbe,
        needs_unsuffixed_copy: true,
        acquisition: transcoder_acquisition,
    },
    SidecarSpec {
        name: SidecarName::Fetcher,
        needs_unsuffixed_copy: false,
        acquisition: fetcher_acquisition,
    },
    SidecarSpec {
        name: SidecarName::Scraper,
        needs_unsuffixed_copy: false,
        acquisition: scraper_acquisition,
    },
];

/// A sidecar as it exists on disk. The file itself is the record.
#[derive(Debug, Clone)]
pub struct InstalledBinary {
    pub spec: SidecarSpec,
    pub path: PathBuf,
    pub executable: bool,
}

impl InstalledBinary {
    pub fn inspect(spec: &SidecarSpec, path: PathBuf) -> Self {
        let executable = is_executable(&path);
        InstalledBinary {
            spec: *spec,
            path,
            executable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_are_triple_qualified() {
        let linux = PlatformProfile::new(OsFamily::Linux, "x86_64-unknown-linux-gnu");
        let windows = PlatformProfile::new(OsFamily::Windows, "x86_64-pc-windows-msvc");
        let fetcher = SidecarSpec::by_name(SidecarName::Fetcher);

        assert_eq!(fetcher.filename(&linux), "yt-dlp-x86_64-unknown-linux-gnu");
        assert_eq!(fetcher.filename(&windows), "yt-dlp-x86_64-pc-windows-msvc.exe");
        assert_eq!(
            SidecarSpec::by_name(SidecarName::TranscoderProbe).unsuffixed_filename(OsFamily::Windows),
            "ffprobe.exe"
        );
    }

    #[test]
    fn by_name_returns_the_matching_entry() {
        for spec in SIDECARS.iter() {
            assert_eq!(SidecarSpec::by_name(spec.name).name, spec.name);
        }
    }

    #[test]
    fn acquisition_depends_on_os_family() {
        let ffmpeg = SidecarSpec::by_name(SidecarName::Transcoder);
        assert_eq!(ffmpeg.acquisition(OsFamily::MacOs), Acquisition::SystemLookup);
        assert_eq!(ffmpeg.acquisition(OsFamily::Linux), Acquisition::Download);

        let gallery = SidecarSpec::by_name(SidecarName::Scraper);
        assert_eq!(gallery.acquisition(OsFamily::Linux), Acquisition::Build);
        assert_eq!(gallery.acquisition(OsFamily::MacOs), Acquisition::Build);
        assert_eq!(gallery.acquisition(OsFamily::Windows), Acquisition::Download);
    }

    #[test]
    fn only_the_transcoder_pair_needs_unsuffixed_copies() {
        let copies: Vec<_> = SIDECARS
            .iter()
            .filter(|s| s.needs_unsuffixed_copy)
            .map(|s| s.name)
            .collect();
        assert_eq!(
            copies,
            vec![SidecarName::Transcoder, SidecarName::TranscoderProbe]
        );
        assert_eq!(
            SidecarName::Transcoder.pair_member(),
            Some(SidecarName::TranscoderProbe)
        );
        assert_eq!(SidecarName::Fetcher.pair_member(), None);
    }
}
