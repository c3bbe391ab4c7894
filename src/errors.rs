// Error taxonomy for the bootstrapper.
//
// Every variant is fatal to the run: the orchestrator stops at the first error,
// `main` logs it and exits non-zero before the application is launched.
// Permission relaxation failures never become one of these; they are logged
// at debug level and swallowed where they happen.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    /// `rustc -vV` could not be run or did not report a `host:` line.
    #[error("Rust toolchain unavailable: {0}. Install it from https://rustup.rs")]
    MissingToolchain(String),

    /// A download did not complete. Re-running the bootstrap is the retry.
    #[error("download of {url} failed: {reason}")]
    Network { url: String, reason: String },

    /// A package manager or interpreter the pending steps need is absent.
    #[error("{what} is not available. {remediation}")]
    MissingSystemDependency { what: String, remediation: String },

    /// The packaging utility or another build step did not produce its artifact.
    #[error("build failed: {0}")]
    Build(String),

    /// The acquisition strategy has no implementation for this OS family.
    #[error("{step} is not supported on {os}")]
    Unsupported { step: String, os: String },

    /// The final write of a destination file failed.
    #[error("failed to install {}: {source}", path.display())]
    Install {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The user config directory could not be resolved or written.
    #[error("configuration error: {0}")]
    Config(String),

    /// The main application could not be started.
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, BootstrapError>;

impl BootstrapError {
    pub fn network(url: &str, reason: impl ToString) -> Self {
        BootstrapError::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn missing(what: impl Into<String>, remediation: impl Into<String>) -> Self {
        BootstrapError::MissingSystemDependency {
            what: what.into(),
            remediation: remediation.into(),
        }
    }
}
