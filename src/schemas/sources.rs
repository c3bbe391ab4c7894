// "Latest release" locations for every downloadable sidecar.
//
// Defaults point at the upstream release channels; each URL can be replaced
// from the environment so mirrors (and tests) can serve the same artifacts.

use crate::libs::utilities::platform::{OsFamily, PlatformProfile};

pub const FETCHER_URL_ENV: &str = "CLIP_BOOTSTRAP_YTDLP_URL";
pub const TRANSCODER_URL_ENV: &str = "CLIP_BOOTSTRAP_FFMPEG_URL";
pub const SCRAPER_URL_ENV: &str = "CLIP_BOOTSTRAP_GALLERY_DL_URL";

/// Named in the remediation message when Homebrew is missing on macOS.
pub const HOMEBREW_INSTALL_URL: &str = "https://brew.sh";

const YT_DLP_RELEASES: &str = "https://github.com/yt-dlp/yt-dlp/releases/latest/download";
const FFMPEG_WINDOWS_ARCHIVE: &str =
    "https://github.com/BtbN/FFmpeg-Builds/releases/latest/download/ffmpeg-master-latest-win64-gpl.zip";
const GALLERY_DL_WINDOWS_EXE: &str =
    "https://github.com/mikf/gallery-dl/releases/latest/download/gallery-dl.exe";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSources {
    /// Single-file fetcher binary for this OS.
    pub fetcher: String,
    /// Archive holding both transcoder binaries. `None` where the pair comes
    /// from the system instead (macOS).
    pub transcoder_archive: Option<String>,
    /// Prebuilt scraper executable. Only Windows downloads it; elsewhere it is built.
    pub scraper_prebuilt: Option<String>,
}

impl DownloadSources {
    pub fn defaults_for(profile: &PlatformProfile) -> Self {
        let fetcher_asset = match profile.os_family {
            OsFamily::MacOs => "yt-dlp_macos",
            OsFamily::Linux => "yt-dlp_linux",
            OsFamily::Windows => "yt-dlp.exe",
        };

        let transcoder_archive = match profile.os_family {
            OsFamily::MacOs => None,
            OsFamily::Linux => {
                let arch = match profile.arch().as_str() {
                    "arm64" => "arm64",
                    _ => "amd64",
                };
                Some(format!(
                    "https://johnvansickle.com/ffmpeg/releases/ffmpeg-release-{arch}-static.tar.xz"
                ))
            }
            OsFamily::Windows => Some(FFMPEG_WINDOWS_ARCHIVE.to_string()),
        };

        let scraper_prebuilt = match profile.os_family {
            OsFamily::Windows => Some(GALLERY_DL_WINDOWS_EXE.to_string()),
            OsFamily::MacOs | OsFamily::Linux => None,
        };

        DownloadSources {
            fetcher: format!("{YT_DLP_RELEASES}/{fetcher_asset}"),
            transcoder_archive,
            scraper_prebuilt,
        }
    }

    /// Applies `CLIP_BOOTSTRAP_*_URL` overrides found through `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = non_empty(FETCHER_URL_ENV) {
            self.fetcher = url;
        }
        if let Some(url) = non_empty(TRANSCODER_URL_ENV) {
            self.transcoder_archive = Some(url);
        }
        if let Some(url) = non_empty(SCRAPER_URL_ENV) {
            self.scraper_prebuilt = Some(url);
        }
        self
    }

    /// Defaults plus overrides from the process environment.
    pub fn from_env(profile: &PlatformProfile) -> Self {
        Self::defaults_for(profile).with_overrides(|key| std::env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetcher_url_is_os_specific() {
        let mac = DownloadSources::defaults_for(&PlatformProfile::new(
            OsFamily::MacOs,
            "aarch64-apple-darwin",
        ));
        let win = DownloadSources::defaults_for(&PlatformProfile::new(
            OsFamily::Windows,
            "x86_64-pc-windows-msvc",
        ));
        assert!(mac.fetcher.ends_with("/yt-dlp_macos"));
        assert!(win.fetcher.ends_with("/yt-dlp.exe"));
        assert_eq!(mac.transcoder_archive, None);
        assert!(win.transcoder_archive.as_deref().unwrap().ends_with(".zip"));
        assert!(win.scraper_prebuilt.is_some());
        assert!(mac.scraper_prebuilt.is_none());
    }

    #[test]
    fn linux_archive_follows_the_triple_architecture() {
        let arm = DownloadSources::defaults_for(&PlatformProfile::new(
            OsFamily::Linux,
            "aarch64-unknown-linux-gnu",
        ));
        assert!(
            arm.transcoder_archive
                .as_deref()
                .unwrap()
                .ends_with("ffmpeg-release-arm64-static.tar.xz")
        );
    }

    #[test]
    fn overrides_replace_defaults_and_ignore_blanks() {
        let profile = PlatformProfile::new(OsFamily::Linux, "x86_64-unknown-linux-gnu");
        let sources = DownloadSources::defaults_for(&profile).with_overrides(|key| match key {
            FETCHER_URL_ENV => Some("http://127.0.0.1:9/yt-dlp".to_string()),
            TRANSCODER_URL_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(sources.fetcher, "http://127.0.0.1:9/yt-dlp");
        assert!(
            sources
                .transcoder_archive
                .as_deref()
                .unwrap()
                .contains("johnvansickle")
        );
    }
}
