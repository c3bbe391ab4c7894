// Downloading release artifacts and figuring out what was downloaded.

use crate::errors::{BootstrapError, Result};
use crate::libs::utilities::file_operations::sweep_stale;
use crate::{log_debug, log_info};
use colored::Colorize;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use tempfile::NamedTempFile;

const USER_AGENT: &str = concat!("clip-bootstrap/", env!("CARGO_PKG_VERSION"));

/// Prefix of every temp file created in the staging directory.
const DOWNLOAD_PREFIX: &str = "download-";

/// Downloads `url` into a fresh temporary file inside `staging_dir`.
///
/// The body is streamed to disk and the file is only returned once the
/// transfer completed, so callers never see a partial download. The temp
/// file keeps the URL's archive suffix (e.g. `.tar.xz`) so its type can be
/// detected from the name. It is deleted when the returned handle drops.
///
/// Downloads left behind by an interrupted run are removed first.
///
/// No retry and no timeout: the call blocks until the transfer ends, a failed
/// transfer aborts the bootstrap and re-running it is the retry.
pub fn download_to_temp(url: &str, staging_dir: &Path) -> Result<NamedTempFile> {
    log_info!("[Download] Fetching {}", url.blue());
    fs::create_dir_all(staging_dir)?;
    sweep_stale(staging_dir, DOWNLOAD_PREFIX);

    let agent = ureq::AgentBuilder::new().user_agent(USER_AGENT).build();
    let response = agent
        .get(url)
        .call()
        .map_err(|e| BootstrapError::network(url, e))?;

    let mut file = tempfile::Builder::new()
        .prefix(DOWNLOAD_PREFIX)
        .suffix(archive_suffix(url))
        .tempfile_in(staging_dir)?;

    let mut reader = response.into_reader();
    let bytes = io::copy(&mut reader, file.as_file_mut())
        .map_err(|e| BootstrapError::network(url, e))?;
    file.as_file().sync_all()?;

    log_debug!(
        "[Download] {} bytes written to {}",
        bytes,
        file.path().display().to_string().green()
    );
    Ok(file)
}

/// Archive suffix of the last URL path segment, or `""` for plain binaries.
fn archive_suffix(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_lowercase();
    [".tar.gz", ".tar.xz", ".tgz", ".txz", ".zip", ".tar"]
        .into_iter()
        .find(|suffix| path.ends_with(suffix))
        .unwrap_or("")
}

/// Detects the type of a downloaded file: `"zip"`, `"tar.gz"`, `"tar.xz"`,
/// `"tar"` or `"binary"`.
///
/// The file name is checked first; if it carries no known suffix the
/// leading magic bytes decide.
pub fn detect_file_type(path: &Path) -> String {
    if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
        let lower = name.to_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            return "tar.gz".to_string();
        } else if lower.ends_with(".tar.xz") || lower.ends_with(".txz") {
            return "tar.xz".to_string();
        } else if lower.ends_with(".zip") {
            return "zip".to_string();
        } else if lower.ends_with(".tar") {
            return "tar".to_string();
        }
    }

    let mut magic = [0u8; 6];
    let read = File::open(path)
        .and_then(|mut f| f.read(&mut magic))
        .unwrap_or(0);
    let magic = &magic[..read];

    if magic.starts_with(b"PK\x03\x04") {
        "zip".to_string()
    } else if magic.starts_with(&[0xFD, b'7', b'z', b'X', b'Z', 0x00]) {
        "tar.xz".to_string()
    } else if magic.starts_with(&[0x1F, 0x8B]) {
        "tar.gz".to_string()
    } else {
        "binary".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn suffix_is_taken_from_url_path() {
        assert_eq!(
            archive_suffix("https://x.org/ffmpeg-release-amd64-static.tar.xz"),
            ".tar.xz"
        );
        assert_eq!(archive_suffix("https://x.org/build.ZIP?token=1"), ".zip");
        assert_eq!(archive_suffix("https://x.org/download/yt-dlp_linux"), "");
    }

    #[test]
    fn file_type_from_name_then_magic() {
        let tmp = TempDir::new().unwrap();

        let named = tmp.path().join("bundle.tar.xz");
        fs::write(&named, b"whatever").unwrap();
        assert_eq!(detect_file_type(&named), "tar.xz");

        let zip_magic = tmp.path().join("noext-zip");
        File::create(&zip_magic)
            .unwrap()
            .write_all(b"PK\x03\x04rest")
            .unwrap();
        assert_eq!(detect_file_type(&zip_magic), "zip");

        let plain = tmp.path().join("yt-dlp");
        fs::write(&plain, b"\x7fELF....").unwrap();
        assert_eq!(detect_file_type(&plain), "binary");
    }

    #[test]
    fn unreachable_host_is_a_network_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("download-stale.tar.xz"), b"partial").unwrap();

        // Port 9 (discard) on loopback is closed in test environments.
        let err = download_to_temp("http://127.0.0.1:9/yt-dlp", tmp.path()).unwrap_err();
        assert!(matches!(err, BootstrapError::Network { .. }));
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
