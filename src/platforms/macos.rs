// macOS: the transcoder pair comes from the system (PATH or Homebrew), the
// fetcher is downloaded and the scraper is built as a onefile executable.

use super::PlatformProvider;
use crate::errors::Result;
use crate::installers::{brew, pyinstaller};
use crate::libs::context::BootstrapContext;
use crate::libs::utilities::binary::find_on_search_path;
use crate::libs::utilities::platform::OsFamily;
use crate::log_debug;
use crate::schemas::sidecar::{Acquisition, InstalledBinary, SidecarSpec};

pub struct MacOsProvider;

impl PlatformProvider for MacOsProvider {
    fn family(&self) -> OsFamily {
        OsFamily::MacOs
    }

    fn preflight(&self, _ctx: &BootstrapContext, pending: &[&SidecarSpec]) -> Result<()> {
        for spec in pending {
            match spec.acquisition(OsFamily::MacOs) {
                Acquisition::SystemLookup => {
                    let tool = spec.name.tool();
                    if find_on_search_path(tool).is_none() && brew::brew_executable().is_none() {
                        return Err(brew::homebrew_missing(tool));
                    }
                }
                Acquisition::Build => {
                    pyinstaller::find_interpreter()?;
                }
                Acquisition::Download => {}
            }
        }
        log_debug!("[macOS] Preflight passed for {} pending sidecar(s)", pending.len());
        Ok(())
    }

    fn locate_system(&self, ctx: &BootstrapContext, spec: &SidecarSpec) -> Result<InstalledBinary> {
        brew::locate_or_install(ctx, spec)
    }

    fn build_from_source(&self, ctx: &BootstrapContext, spec: &SidecarSpec) -> Result<InstalledBinary> {
        pyinstaller::ensure_onefile(ctx, spec)
    }
}
