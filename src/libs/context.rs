// Everything one provisioning run needs, passed explicitly instead of living
// in process-wide state. Child processes get their working directory and
// environment from here; the bootstrapper itself never changes either.

use crate::libs::paths::Layout;
use crate::libs::utilities::platform::PlatformProfile;
use crate::schemas::sources::DownloadSources;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Variables removed from every child process so tool output stays predictable.
pub const CLEARED_ENV: [&str; 6] = [
    // Warnings on stderr end up in the failure tail otherwise.
    "PYTHONWARNINGS",
    // Operator packages must not leak into the isolated build environment.
    "PYTHONPATH",
    "PYTHONHOME",
    "PYTHONSTARTUP",
    // `pip install` into a fresh venv trips this when set globally.
    "PIP_REQUIRE_VIRTUALENV",
    "HOMEBREW_VERBOSE",
];

#[derive(Debug, Clone)]
pub struct BootstrapContext {
    /// OS family and host triple, resolved once per run.
    pub profile: PlatformProfile,
    /// Where sidecars land.
    pub layout: Layout,
    /// Scratch space: downloads, extraction, the build environment.
    pub work_dir: PathBuf,
    /// Release URLs, defaults overridden from the environment.
    pub sources: DownloadSources,
}

impl BootstrapContext {
    pub fn new(
        profile: PlatformProfile,
        layout: Layout,
        work_dir: PathBuf,
        sources: DownloadSources,
    ) -> Self {
        BootstrapContext {
            profile,
            layout,
            work_dir,
            sources,
        }
    }

    /// Temp files of in-flight downloads.
    pub fn staging_dir(&self) -> PathBuf {
        self.work_dir.join("downloads")
    }

    /// Archive contents; replaced on every extraction.
    pub fn extract_dir(&self) -> PathBuf {
        self.work_dir.join("unpack")
    }

    /// Isolated Python environment for the onefile build. Kept between runs.
    pub fn venv_dir(&self) -> PathBuf {
        self.work_dir.join("venv")
    }

    /// PyInstaller hook files, rewritten before each build.
    pub fn hooks_dir(&self) -> PathBuf {
        self.work_dir.join("hooks")
    }

    /// A `Command` for `program` running in `cwd` with the noise variables cleared.
    pub fn command(&self, program: impl AsRef<std::ffi::OsStr>, cwd: &Path) -> Command {
        let mut cmd = Command::new(program);
        // Children never inherit the operator's working directory.
        cmd.current_dir(cwd);
        for key in CLEARED_ENV {
            cmd.env_remove(key);
        }
        cmd
    }
}
