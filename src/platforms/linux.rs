// Linux: everything but the scraper is downloaded; the scraper is built.

use super::PlatformProvider;
use crate::errors::Result;
use crate::installers::pyinstaller;
use crate::libs::context::BootstrapContext;
use crate::libs::utilities::platform::OsFamily;
use crate::schemas::sidecar::{Acquisition, InstalledBinary, SidecarSpec};

pub struct LinuxProvider;

impl PlatformProvider for LinuxProvider {
    fn family(&self) -> OsFamily {
        OsFamily::Linux
    }

    fn preflight(&self, _ctx: &BootstrapContext, pending: &[&SidecarSpec]) -> Result<()> {
        let needs_build = pending
            .iter()
            .any(|spec| spec.acquisition(OsFamily::Linux) == Acquisition::Build);
        if needs_build {
            pyinstaller::find_interpreter()?;
        }
        Ok(())
    }

    fn build_from_source(&self, ctx: &BootstrapContext, spec: &SidecarSpec) -> Result<InstalledBinary> {
        pyinstaller::ensure_onefile(ctx, spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::paths::Layout;
    use crate::libs::utilities::platform::PlatformProfile;
    use crate::schemas::sidecar::SidecarName;
    use crate::schemas::sources::DownloadSources;

    #[test]
    fn downloads_alone_need_no_interpreter() {
        let profile = PlatformProfile::new(OsFamily::Linux, "x86_64-unknown-linux-gnu");
        let sources = DownloadSources::defaults_for(&profile);
        let ctx = BootstrapContext::new(profile, Layout::new("/nonexistent"), "/nonexistent/w".into(), sources);
        let pending = [
            SidecarSpec::by_name(SidecarName::Transcoder),
            SidecarSpec::by_name(SidecarName::Fetcher),
        ];

        assert!(LinuxProvider.preflight(&ctx, &pending).is_ok());
    }
}
