// Entry point of `clip-bootstrap`.
//
// Parses the command line, initializes the logger and dispatches to one
// command. Any error is logged once with its cause chain and turned into a
// non-zero exit code; the application is never launched after a failure.

mod cli;
mod commands;
mod errors;
mod installers;
mod libs;
mod logger;
mod platforms;
mod schemas;

use clap::Parser;
use cli::cmd_enums::{Cli, Commands};
use commands::{bootstrap_options, config, run, status, version};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.debug);

    let options = bootstrap_options(
        &cli.root,
        cli.config_dir.as_deref(),
        cli.work_dir.as_deref(),
        &cli.app_name,
    );

    let result = match &cli.command {
        Commands::Run {
            launch,
            no_launch,
            args,
        } => run::run(&options, launch, *no_launch, args),
        Commands::Config => config::run(&options),
        Commands::Status => status::run(&options),
        Commands::Version => {
            version::run();
            Ok(ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            log_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
