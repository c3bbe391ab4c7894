// Register application subcommands.
// Each module corresponds to one `clip-bootstrap` command-line action.

use crate::libs::orchestrator::BootstrapOptions;
use crate::libs::utilities::path_helpers::expand_tilde;

// Writes first-run settings and prints the config directory.
pub mod config;
// Full bootstrap followed by the application launch.
pub mod run;
// Read-only report of the sidecar tree.
pub mod status;
// Prints the bootstrapper version.
pub mod version;

/// Builds the orchestrator options from the global command-line flags.
pub fn bootstrap_options(
    root: &str,
    config_dir: Option<&str>,
    work_dir: Option<&str>,
    app_name: &str,
) -> BootstrapOptions {
    BootstrapOptions {
        root: expand_tilde(root),
        work_dir: work_dir.map(expand_tilde),
        config_dir: config_dir.map(expand_tilde),
        app_name: app_name.to_string(),
    }
}
