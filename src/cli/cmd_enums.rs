use crate::libs::launcher::{DEFAULT_LAUNCH, LAUNCH_ENV};
use clap::{Parser, Subcommand};

/// Command-line interface of `clip-bootstrap`.
#[derive(Parser, Debug)]
#[command(name = "clip-bootstrap", version)]
#[command(about = "Provision sidecar binaries and first-run settings, then start clip-downloader")]
pub struct Cli {
    /// Enables detailed debug output for troubleshooting.
    #[arg(short, long, global = true)]
    pub(crate) debug: bool,

    /// Application resource root that receives `binaries/` and `resources/`.
    #[arg(long, global = true, env = "CLIP_BOOTSTRAP_ROOT", default_value = "src-tauri")]
    pub(crate) root: String,

    /// User config directory. Defaults to the OS convention for the app name.
    #[arg(long, global = true, env = "CLIP_BOOTSTRAP_CONFIG_DIR")]
    pub(crate) config_dir: Option<String>,

    /// Scratch directory for downloads and builds (defaults to `<root>/.bootstrap`).
    #[arg(long, global = true, env = "CLIP_BOOTSTRAP_WORK_DIR")]
    pub(crate) work_dir: Option<String>,

    /// Application name used for the config directory.
    #[arg(long, global = true, default_value = "clip-downloader")]
    pub(crate) app_name: String,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Writes first-run settings, provisions every sidecar, then launches the app.
    Run {
        /// Command line that starts the application.
        #[arg(long, env = LAUNCH_ENV, default_value = DEFAULT_LAUNCH)]
        launch: String,
        /// Stop after provisioning.
        #[arg(long)]
        no_launch: bool,
        /// Extra arguments handed to the launch command unchanged.
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Writes first-run settings only and prints the config directory.
    Config,
    /// Reports which sidecars are provisioned. Changes nothing.
    Status,
    /// Show the current version.
    Version,
}
