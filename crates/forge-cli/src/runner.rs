//! Command execution and runtime logic.
//!
//! Contains the command dispatcher and logging initialization.

use anyhow::Result;
use clap::CommandFactory;
use forge_core::cli::{ExitCode, OutputFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::commands;

/// Initializes logging.
///
/// Logs go to stderr so stdout carries only command output. `--verbose`
/// forces `debug`; otherwise `RUST_LOG` applies, defaulting to `info`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

/// Executes the specified CLI command.
///
/// Routes commands to their respective handlers and returns an exit code.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn execute_command(command: Commands, output_format: OutputFormat) -> Result<ExitCode> {
    match command {
        Commands::Generate {
            project,
            output_dir,
            emit_on_error,
        } => commands::generate::run(project, output_dir, emit_on_error, output_format),
        Commands::Validate { project } => commands::validate::run(project, output_format),
        Commands::Inspect { module, project } => {
            commands::inspect::run(module.as_deref(), project, output_format)
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}
