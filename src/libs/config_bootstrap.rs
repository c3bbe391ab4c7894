// First-run user configuration.
//
// Resolves the per-OS user config directory of the application, creates it,
// and writes `settings.json` with defaults plus an empty `downloads.db` state
// marker, each only when absent. An existing settings file is never read,
// rewritten or validated here: the application owns it after the first run.
//
//   macOS    ~/Library/Application Support/<app>
//   Linux    $XDG_CONFIG_HOME/<app>, else ~/.config/<app>
//   Windows  %APPDATA%\<app>, else %USERPROFILE%\AppData\Roaming\<app>

use crate::errors::{BootstrapError, Result};
use crate::libs::utilities::path_helpers::home_from_env;
use crate::libs::utilities::platform::OsFamily;
use crate::schemas::app_config::{AppConfig, SETTINGS_FILE};
use crate::{log_debug, log_info};
use colored::Colorize;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Persisted download history of the application. Opaque here; only its
/// existence is ensured.
pub const STATE_MARKER: &str = "downloads.db";

/// The application's config directory for `os`, read through `env`.
pub fn config_dir_for(
    os: OsFamily,
    app_name: &str,
    env: &dyn Fn(&str) -> Option<OsString>,
) -> Option<PathBuf> {
    let non_empty = |key: &str| env(key).filter(|v| !v.is_empty()).map(PathBuf::from);

    let base = match os {
        OsFamily::MacOs => home_from_env(env)?.join("Library").join("Application Support"),
        OsFamily::Linux => match non_empty("XDG_CONFIG_HOME") {
            Some(xdg) => xdg,
            None => home_from_env(env)?.join(".config"),
        },
        OsFamily::Windows => match non_empty("APPDATA") {
            Some(appdata) => appdata,
            None => non_empty("USERPROFILE")?.join("AppData").join("Roaming"),
        },
    };
    Some(base.join(app_name))
}

/// `explicit` when given, otherwise the OS default from the process environment.
pub fn resolve_config_dir(
    os: OsFamily,
    app_name: &str,
    explicit: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    config_dir_for(os, app_name, &|key| std::env::var_os(key)).ok_or_else(|| {
        BootstrapError::Config(format!(
            "cannot determine the user config directory for {app_name} on {os}: no home directory in the environment"
        ))
    })
}

/// The platform's conventional Downloads folder.
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("Downloads"))
}

/// Creates `dir`, then writes default settings and the state marker if absent.
///
/// Returns the written defaults on first run and `None` when a settings file
/// already existed; callers that need its values use [`AppConfig::load`].
pub fn ensure_config(dir: &Path, default_download: &Path) -> Result<Option<AppConfig>> {
    fs::create_dir_all(dir).map_err(|e| config_error(dir, e))?;

    let settings_path = dir.join(SETTINGS_FILE);
    let written = if settings_path.exists() {
        log_debug!(
            "[Config] {} exists, leaving it untouched",
            settings_path.display()
        );
        None
    } else {
        let defaults = AppConfig::with_download_directory(default_download.to_string_lossy());
        write_new(&settings_path, defaults.to_pretty_json()?.as_bytes())?;
        log_info!(
            "[Config] Wrote default settings to {}",
            settings_path.display().to_string().green()
        );
        Some(defaults)
    };

    let marker = dir.join(STATE_MARKER);
    if !marker.exists() {
        write_new(&marker, b"")?;
        log_debug!("[Config] Created empty state marker {}", marker.display());
    }

    Ok(written)
}

/// Creates `path` with `contents`, refusing to replace anything that appeared
/// in the meantime.
fn write_new(path: &Path, contents: &[u8]) -> Result<()> {
    let result = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .and_then(|mut file| {
            file.write_all(contents)?;
            file.sync_all()
        });
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(config_error(path, e)),
    }
}

fn config_error(path: &Path, e: io::Error) -> BootstrapError {
    BootstrapError::Config(format!("cannot write {}: {e}", path.display()))
}
