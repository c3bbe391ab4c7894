// Per-OS capability providers.
//
// Each OS family obtains sidecars differently (download, system package
// manager, local build). The orchestrator talks to one `PlatformProvider`,
// chosen once from the resolved profile, instead of branching on the OS at
// every step.

use crate::errors::{BootstrapError, Result};
use crate::installers::url::{install_prebuilt, install_transcoder_archive, ships_in_archive};
use crate::libs::context::BootstrapContext;
use crate::libs::utilities::platform::OsFamily;
use crate::schemas::sidecar::{InstalledBinary, SidecarName, SidecarSpec};

mod linux;
mod macos;
mod windows;

pub use linux::LinuxProvider;
pub use macos::MacOsProvider;
pub use windows::WindowsProvider;

pub trait PlatformProvider {
    fn family(&self) -> OsFamily;

    /// Checks the system dependencies that the `pending` sidecars need,
    /// before anything is downloaded or written.
    fn preflight(&self, ctx: &BootstrapContext, pending: &[&SidecarSpec]) -> Result<()>;

    /// Downloads a prebuilt artifact from the context's download sources.
    fn fetch_prebuilt(&self, ctx: &BootstrapContext, spec: &SidecarSpec) -> Result<InstalledBinary> {
        let url = match spec.name {
            SidecarName::Fetcher => Some(ctx.sources.fetcher.as_str()),
            SidecarName::Transcoder | SidecarName::TranscoderProbe => {
                ctx.sources.transcoder_archive.as_deref()
            }
            SidecarName::Scraper => ctx.sources.scraper_prebuilt.as_deref(),
        };
        let Some(url) = url else {
            return Err(self.unsupported(&format!("downloading a prebuilt {}", spec.name)));
        };

        if ships_in_archive(spec.name) {
            install_transcoder_archive(ctx, spec, url)
        } else {
            install_prebuilt(ctx, spec, url)
        }
    }

    /// Takes the tool from the system, installing it through the OS package
    /// manager when needed.
    fn locate_system(&self, _ctx: &BootstrapContext, spec: &SidecarSpec) -> Result<InstalledBinary> {
        Err(self.unsupported(&format!("locating a system {}", spec.name)))
    }

    /// Builds the tool locally.
    fn build_from_source(
        &self,
        _ctx: &BootstrapContext,
        spec: &SidecarSpec,
    ) -> Result<InstalledBinary> {
        Err(self.unsupported(&format!("building {} from source", spec.name)))
    }

    fn unsupported(&self, step: &str) -> BootstrapError {
        BootstrapError::Unsupported {
            step: step.to_string(),
            os: self.family().to_string(),
        }
    }
}

pub fn provider_for(os: OsFamily) -> Box<dyn PlatformProvider> {
    match os {
        OsFamily::MacOs => Box::new(MacOsProvider),
        OsFamily::Linux => Box::new(LinuxProvider),
        OsFamily::Windows => Box::new(WindowsProvider),
    }
}
