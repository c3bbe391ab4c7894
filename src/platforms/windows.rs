// Windows: every sidecar is a download. No package manager, no interpreter.

use super::PlatformProvider;
use crate::errors::Result;
use crate::libs::context::BootstrapContext;
use crate::libs::utilities::platform::OsFamily;
use crate::schemas::sidecar::SidecarSpec;

pub struct WindowsProvider;

impl PlatformProvider for WindowsProvider {
    fn family(&self) -> OsFamily {
        OsFamily::Windows
    }

    fn preflight(&self, _ctx: &BootstrapContext, _pending: &[&SidecarSpec]) -> Result<()> {
        Ok(())
    }
}
