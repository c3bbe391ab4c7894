// One module per way of obtaining a sidecar.
//
// `fetcher` is the entry point: it checks presence and dispatches to the
// platform provider, which in turn uses the source-specific modules below.

/// Presence check, acquisition dispatch and placement into both trees.
pub(crate) mod fetcher;

/// Prebuilt artifacts fetched from "latest release" URLs.
pub(crate) mod url;

/// Tools already installed on the system, or installable through Homebrew.
pub(crate) mod brew;

/// Onefile executables built with PyInstaller in an isolated virtualenv.
pub(crate) mod pyinstaller;
