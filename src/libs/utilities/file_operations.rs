//! # Safe installation of sidecar files
//!
//! `install` places a file at a destination so that, afterwards, a readable,
//! owner-writable, executable copy of the source exists there, whatever was
//! at the destination before: nothing, a read-only file, or (on macOS) a file
//! carrying the immutable `uchg` flag.
//!
//! ## Steps
//!
//! 1. Create the parent directory.
//! 2. Best-effort: give the owner write access to the parent directory.
//! 3. Best-effort, macOS only: clear `uchg` on the destination.
//! 4. Best-effort: make an existing destination writable, then remove it.
//! 5. Copy the source into a staging file in the same directory, set `0o755`,
//!    and rename it over the destination.
//!
//! Steps 2-4 swallow their errors: relaxing a protection that was never set
//! must not abort the run. Only step 5 failing is reported. Because the copy
//! lands under a temporary name first, an interrupted run never leaves a
//! truncated file at the destination path. Staging files an interrupted run
//! did leave in the parent directory are swept during step 4.

use crate::errors::{BootstrapError, Result};
use crate::libs::utilities::binary::make_executable;
use crate::{log_debug, log_info};
use colored::Colorize;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Name of the file that keeps `resources/` from ever being empty.
pub const PLACEHOLDER_FILE: &str = "placeholder.txt";

/// Prefix of the temporary copy made next to each destination.
const STAGING_PREFIX: &str = ".staging-";

/// Installs `source` at `dest` (see module docs).
pub fn install(source: &Path, dest: &Path) -> Result<()> {
    log_debug!(
        "[Installer] Installing {} -> {}",
        source.display().to_string().yellow(),
        dest.display().to_string().cyan()
    );
    let parent = prepare_destination(dest)?;

    let staged = stage_copy(source, &parent).map_err(|e| install_error(dest, e))?;
    staged
        .persist(dest)
        .map_err(|e| install_error(dest, e.error))?;

    clear_quarantine(dest);
    log_debug!("[Installer] {} is in place", dest.display().to_string().green());
    Ok(())
}

/// Makes `source` also appear at `dest`: hard link first, then a symbolic
/// link, then a full [`install`] copy.
pub fn link_or_copy(source: &Path, dest: &Path) -> Result<()> {
    prepare_destination(dest)?;

    match fs::hard_link(source, dest) {
        Ok(()) => {
            log_debug!("[Installer] Hard-linked {} -> {}", source.display(), dest.display());
            return Ok(());
        }
        Err(e) => log_debug!("[Installer] Hard link failed ({e}), trying a symbolic link"),
    }

    let absolute_source = fs::canonicalize(source).unwrap_or_else(|_| source.to_path_buf());
    match symlink_file(&absolute_source, dest) {
        Ok(()) => {
            log_debug!("[Installer] Symlinked {} -> {}", dest.display(), absolute_source.display());
            Ok(())
        }
        Err(e) => {
            log_debug!("[Installer] Symbolic link failed ({e}), copying instead");
            install(source, dest)
        }
    }
}

/// Ensures `dir` holds at least one file, writing [`PLACEHOLDER_FILE`] if absent.
/// The application's packaging step globs this directory and fails on an empty match.
pub fn ensure_placeholder(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| install_error(dir, e))?;
    let placeholder = dir.join(PLACEHOLDER_FILE);
    if !placeholder.exists() {
        fs::write(
            &placeholder,
            "Unsuffixed sidecar copies are placed here by clip-bootstrap.\n",
        )
        .map_err(|e| install_error(&placeholder, e))?;
        log_info!(
            "[Installer] Created resources placeholder at {}",
            placeholder.display().to_string().cyan()
        );
    }
    Ok(placeholder)
}

/// Steps 1-4: parent exists, protections relaxed, old destination gone.
fn prepare_destination(dest: &Path) -> Result<PathBuf> {
    let parent = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&parent).map_err(|e| install_error(dest, e))?;

    relax_dir_permissions(&parent);
    clear_immutable_flag(dest);
    sweep_stale(&parent, STAGING_PREFIX);

    if fs::symlink_metadata(dest).is_ok() {
        relax_file_permissions(dest);
        if let Err(e) = fs::remove_file(dest) {
            log_debug!("[Installer] Could not remove existing {}: {e}", dest.display());
        }
    }
    Ok(parent)
}

/// Best-effort removal of files in `dir` whose name starts with `prefix`,
/// left there by a run that was interrupted mid-copy or mid-download.
pub fn sweep_stale(dir: &Path, prefix: &str) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file || !entry.file_name().to_string_lossy().starts_with(prefix) {
            continue;
        }
        let path = entry.path();
        relax_file_permissions(&path);
        match fs::remove_file(&path) {
            Ok(()) => log_debug!("[Installer] Removed stale {}", path.display()),
            Err(e) => log_debug!("[Installer] Could not remove stale {}: {e}", path.display()),
        }
    }
}

fn stage_copy(source: &Path, dir: &Path) -> io::Result<tempfile::NamedTempFile> {
    let mut staged = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempfile_in(dir)?;
    let mut reader = File::open(source)?;
    io::copy(&mut reader, staged.as_file_mut())?;
    staged.as_file().sync_all()?;
    make_executable(staged.path())?;
    Ok(staged)
}

fn install_error(path: &Path, source: io::Error) -> BootstrapError {
    BootstrapError::Install {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(unix)]
fn relax_dir_permissions(dir: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(meta) = fs::metadata(dir) {
        let mut perms = meta.permissions();
        perms.set_mode(perms.mode() | 0o700);
        if let Err(e) = fs::set_permissions(dir, perms) {
            log_debug!("[Installer] Could not relax {}: {e}", dir.display());
        }
    }
}

#[cfg(not(unix))]
fn relax_dir_permissions(dir: &Path) {
    relax_file_permissions(dir);
}

#[cfg(unix)]
fn relax_file_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(meta) = fs::symlink_metadata(path) {
        if meta.file_type().is_symlink() {
            return;
        }
        let mut perms = meta.permissions();
        perms.set_mode(perms.mode() | 0o200);
        if let Err(e) = fs::set_permissions(path, perms) {
            log_debug!("[Installer] Could not relax {}: {e}", path.display());
        }
    }
}

#[cfg(not(unix))]
fn relax_file_permissions(path: &Path) {
    if let Ok(meta) = fs::metadata(path) {
        let mut perms = meta.permissions();
        if perms.readonly() {
            #[allow(clippy::permissions_set_readonly_false)]
            perms.set_readonly(false);
            if let Err(e) = fs::set_permissions(path, perms) {
                log_debug!("[Installer] Could not relax {}: {e}", path.display());
            }
        }
    }
}

#[cfg(target_os = "macos")]
fn clear_immutable_flag(path: &Path) {
    if fs::symlink_metadata(path).is_err() {
        return;
    }
    match std::process::Command::new("chflags").arg("nouchg").arg(path).output() {
        Ok(out) if !out.status.success() => log_debug!(
            "[Installer] chflags nouchg {} exited with {}",
            path.display(),
            out.status
        ),
        Err(e) => log_debug!("[Installer] chflags unavailable: {e}"),
        Ok(_) => {}
    }
}

#[cfg(not(target_os = "macos"))]
fn clear_immutable_flag(_path: &Path) {}

/// Removes the Gatekeeper quarantine attribute so the binary runs without a prompt.
#[cfg(target_os = "macos")]
pub fn clear_quarantine(path: &Path) {
    match std::process::Command::new("xattr")
        .args(["-d", "com.apple.quarantine"])
        .arg(path)
        .output()
    {
        // xattr exits non-zero when the attribute was never set.
        Ok(_) => {}
        Err(e) => log_debug!("[Installer] xattr unavailable: {e}"),
    }
}

#[cfg(not(target_os = "macos"))]
pub fn clear_quarantine(_path: &Path) {}

#[cfg(unix)]
fn symlink_file(source: &Path, dest: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, dest)
}

#[cfg(windows)]
fn symlink_file(source: &Path, dest: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(source, dest)
}
