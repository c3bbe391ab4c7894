// Core bootstrap logic, independent of the command-line layer.

// First-run user settings and state marker.
pub mod config_bootstrap;
// Per-run context handed to every acquisition step.
pub mod context;
// Starts the application after provisioning.
pub mod launcher;
// Sequences configuration, preflight and sidecar acquisition.
pub mod orchestrator;
// Sidecar destinations under the resource root.
pub mod paths;
// Filesystem, archive, download and platform helpers.
pub mod utilities;
