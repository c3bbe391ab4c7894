// Host platform detection: which OS family we are provisioning for and which
// target triple qualifies every sidecar filename.

use crate::errors::{BootstrapError, Result};
use crate::{log_debug, log_warn};
use colored::Colorize;
use std::fmt;
use std::process::Command;

/// The three OS families the bootstrapper knows how to provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    MacOs,
    Linux,
    Windows,
}

impl OsFamily {
    /// Maps an OS identifier (`uname -s` output or `std::env::consts::OS`) to a family.
    ///
    /// "Darwin" is macOS, "Linux" is Linux, and anything else takes the Windows
    /// branch, which includes Unix-like shells running on Windows (MSYS, MinGW, Cygwin).
    pub fn from_identifier(identifier: &str) -> Self {
        let lower = identifier.trim().to_lowercase();
        match lower.as_str() {
            "darwin" | "macos" | "apple-darwin" => OsFamily::MacOs,
            "linux" => OsFamily::Linux,
            other => {
                let windows_like = ["windows", "win32", "win64", "mingw", "msys", "cygwin"]
                    .iter()
                    .any(|alias| other.contains(alias));
                if !windows_like {
                    log_warn!(
                        "[Platform] Unknown OS identifier '{}', treating it as Windows-compatible.",
                        identifier.purple()
                    );
                }
                OsFamily::Windows
            }
        }
    }

    /// The family of the machine this binary is running on.
    pub fn current() -> Self {
        Self::from_identifier(std::env::consts::OS)
    }

    /// Executable suffix appended to every sidecar filename.
    pub fn exe_suffix(self) -> &'static str {
        match self {
            OsFamily::Windows => ".exe",
            OsFamily::MacOs | OsFamily::Linux => "",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OsFamily::MacOs => "macOS",
            OsFamily::Linux => "Linux",
            OsFamily::Windows => "Windows",
        };
        f.write_str(label)
    }
}

/// Host OS family plus the toolchain's host triple. Computed once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    pub os_family: OsFamily,
    pub target_triple: String,
}

impl PlatformProfile {
    pub fn new(os_family: OsFamily, target_triple: impl Into<String>) -> Self {
        PlatformProfile {
            os_family,
            target_triple: target_triple.into(),
        }
    }

    /// Resolves the profile of the current host.
    ///
    /// The triple comes from `rustc -vV`; every artifact filename depends on it,
    /// so a missing toolchain is fatal.
    pub fn resolve() -> Result<Self> {
        let os_family = OsFamily::current();
        let rustc = which::which("rustc").map_err(|e| {
            BootstrapError::MissingToolchain(format!("'rustc' not found on PATH ({e})"))
        })?;
        log_debug!("[Platform] Querying host triple from {}", rustc.display());

        let output = Command::new(&rustc)
            .arg("-vV")
            .output()
            .map_err(|e| BootstrapError::MissingToolchain(format!("failed to run rustc: {e}")))?;
        if !output.status.success() {
            return Err(BootstrapError::MissingToolchain(format!(
                "rustc -vV exited with {}",
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let target_triple = parse_host_triple(&stdout).ok_or_else(|| {
            BootstrapError::MissingToolchain("rustc -vV reported no 'host:' field".to_string())
        })?;

        log_debug!(
            "[Platform] Resolved {} / {}",
            os_family.to_string().cyan(),
            target_triple.cyan()
        );
        Ok(PlatformProfile::new(os_family, target_triple))
    }

    /// Normalized CPU architecture taken from the first triple component.
    pub fn arch(&self) -> String {
        let first = self.target_triple.split('-').next().unwrap_or_default();
        normalize_arch(first)
    }
}

/// Extracts the value of the `host:` line from `rustc -vV` output.
pub fn parse_host_triple(version_output: &str) -> Option<String> {
    version_output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("host:"))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Normalizes CPU architecture spellings ("aarch64" vs "arm64", "amd64" vs "x86_64").
pub fn normalize_arch(arch: &str) -> String {
    match arch.to_lowercase().as_str() {
        "aarch64" | "arm64" => "arm64".to_string(),
        "amd64" | "x86_64" => "x86_64".to_string(),
        other => {
            log_warn!(
                "[Platform] Unknown ARCH variant '{}', using as-is.",
                other.purple()
            );
            other.to_string()
        }
    }
}
