// Hands control to the main application once provisioning succeeded.
//
// On Unix the bootstrap process is replaced by the application (`exec`), so
// signals and the exit status belong to the application directly. Windows has
// no exec: the application is spawned, waited on, and its exit code returned.

use crate::errors::{BootstrapError, Result};
use crate::log_info;
use colored::Colorize;
use std::process::Command;

/// Environment variable holding the launch command line.
pub const LAUNCH_ENV: &str = "CLIP_BOOTSTRAP_LAUNCH";

/// Development entry point of the desktop application.
pub const DEFAULT_LAUNCH: &str = "cargo tauri dev";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchCommand {
    /// Splits `command_line` on whitespace and appends `extra` unchanged.
    pub fn parse(command_line: &str, extra: &[String]) -> Result<Self> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let Some(program) = words.next() else {
            return Err(BootstrapError::Config(
                "launch command is empty; pass --launch or --no-launch".to_string(),
            ));
        };

        let mut args: Vec<String> = words.collect();
        args.extend(extra.iter().cloned());
        Ok(LaunchCommand { program, args })
    }

    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Replaces the current process with the application. Only returns on failure.
    #[cfg(unix)]
    pub fn launch(&self) -> Result<i32> {
        use std::os::unix::process::CommandExt;

        log_info!("[Launch] Starting {}", self.display().bold());
        let source = self.command().exec();
        Err(BootstrapError::Launch {
            command: self.display(),
            source,
        })
    }

    /// Runs the application to completion and returns its exit code.
    #[cfg(not(unix))]
    pub fn launch(&self) -> Result<i32> {
        log_info!("[Launch] Starting {}", self.display().bold());
        let status = self
            .command()
            .status()
            .map_err(|source| BootstrapError::Launch {
                command: self.display(),
                source,
            })?;
        Ok(status.code().unwrap_or(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_arguments_are_appended_unchanged() {
        let cmd = LaunchCommand::parse(
            DEFAULT_LAUNCH,
            &["--".to_string(), "--port".to_string(), "1420".to_string()],
        )
        .unwrap();
        assert_eq!(cmd.program, "cargo");
        assert_eq!(cmd.args, vec!["tauri", "dev", "--", "--port", "1420"]);
        assert_eq!(cmd.display(), "cargo tauri dev -- --port 1420");
    }

    #[test]
    fn blank_command_is_rejected() {
        let err = LaunchCommand::parse("   ", &[]).unwrap_err();
        assert!(matches!(err, BootstrapError::Config(_)));
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        let cmd = LaunchCommand::parse("clip-bootstrap-no-such-program-7f3a", &[]).unwrap();
        let err = cmd.launch().unwrap_err();
        assert!(matches!(err, BootstrapError::Launch { .. }));
    }
}
