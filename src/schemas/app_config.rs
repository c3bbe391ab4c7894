// Shape of `settings.json`, the application's user settings file.
//
// The bootstrapper writes it once with defaults and never again; the
// application owns it afterwards.

use crate::errors::{BootstrapError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name of the settings file inside the user config directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// What the downloader does when the target file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OnDuplicate {
    /// Pick a fresh, unused file name.
    #[default]
    #[serde(alias = "create_new")]
    CreateNew,
    #[serde(alias = "overwrite")]
    Overwrite,
    #[serde(alias = "do_nothing", alias = "DoNothing", alias = "skip")]
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Reserved; always `null` when written by the bootstrapper.
    pub id: Option<String>,
    pub download_directory: String,
    #[serde(default)]
    pub on_duplicate: OnDuplicate,
}

impl AppConfig {
    /// First-run defaults: the platform Downloads folder and `CreateNew`.
    pub fn with_download_directory(download_directory: impl Into<String>) -> Self {
        AppConfig {
            id: None,
            download_directory: download_directory.into(),
            on_duplicate: OnDuplicate::CreateNew,
        }
    }

    /// Reads `settings.json` from `dir`. The bootstrapper only writes the file
    /// on first run, so callers that need the values re-read them here.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(SETTINGS_FILE);
        let text = fs::read_to_string(&path)
            .map_err(|e| BootstrapError::Config(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| BootstrapError::Config(format!("invalid {}: {e}", path.display())))
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BootstrapError::Config(format!("cannot serialize settings: {e}")))
    }
}
