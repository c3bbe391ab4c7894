// Helpers for executables: permission bits, executability checks, locating a
// named binary inside an extracted archive, and probing the operator's PATH.

use crate::{log_debug, log_warn};
use colored::Colorize;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Bin directories that GUI-launched processes often miss on PATH
/// (Homebrew on Apple Silicon and Intel, plus the standard system dirs).
pub const EXTRA_SEARCH_DIRS: [&str; 5] = [
    "/opt/homebrew/bin",
    "/usr/local/bin",
    "/usr/bin",
    "/bin",
    "/usr/local/sbin",
];

/// Makes a file executable (`0o755`). Files written by the installer or
/// extracted from archives do not reliably carry the execute bit.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    log_debug!("[Binary] Making {:?} executable", path.to_string_lossy().yellow());
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
}

// Windows decides executability by extension.
#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// True when `path` is a file the current platform would run.
pub fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        fs::metadata(path)
            .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
    }
}

/// Recursively searches `dir` for a regular file called exactly `file_name`.
/// Archive layouts differ between builds (`ffmpeg-7.1-amd64-static/ffmpeg`
/// vs `ffmpeg-master-latest-win64-gpl/bin/ffmpeg.exe`), so the depth is not fixed.
pub fn find_named_file(dir: &Path, file_name: &str) -> Option<PathBuf> {
    log_debug!(
        "[Binary] Searching for '{}' in {:?}",
        file_name.cyan(),
        dir.to_string_lossy().yellow()
    );

    let found = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .find(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.eq_ignore_ascii_case(file_name))
        })
        .map(|entry| entry.into_path());

    if found.is_none() {
        log_warn!(
            "[Binary] No '{}' found within {:?}",
            file_name,
            dir.to_string_lossy().purple()
        );
    }
    found
}

/// PATH plus [`EXTRA_SEARCH_DIRS`], deduplicated, as an OS path list.
pub fn extended_search_path() -> Option<OsString> {
    let mut dirs: Vec<PathBuf> = std::env::var_os("PATH")
        .map(|value| {
            std::env::split_paths(&value)
                .filter(|p| !p.as_os_str().is_empty())
                .collect()
        })
        .unwrap_or_default();

    for extra in EXTRA_SEARCH_DIRS {
        let extra = PathBuf::from(extra);
        if !dirs.contains(&extra) {
            dirs.push(extra);
        }
    }
    std::env::join_paths(dirs).ok()
}

/// Looks `tool` up on the extended search path.
pub fn find_on_search_path(tool: &str) -> Option<PathBuf> {
    let search_path = extended_search_path()?;
    let cwd = std::env::current_dir().ok()?;
    which::which_in(tool, Some(search_path), cwd).ok()
}
