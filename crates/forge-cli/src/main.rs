//! manifest-forge: manifest-driven code generation for ESP32 firmware.
//!
//! # Examples
//!
//! ```bash
//! # Validate and regenerate
//! manifest-forge generate --project-root ~/fw
//!
//! # Validate only, machine-readable summary
//! manifest-forge --format json validate
//!
//! # Show one module's contract
//! manifest-forge inspect SensorManager
//! ```

use clap::Parser;
use colored::Colorize;
use forge_cli::cli::Cli;
use forge_cli::runner::{execute_command, init_logging};
use forge_core::cli::{ExitCode, OutputFormat};
use std::process;

fn main() {
    let cli = Cli::parse();

    let result = init_logging(cli.verbose)
        .and_then(|()| cli.format.parse::<OutputFormat>().map_err(anyhow::Error::from))
        .and_then(|format| execute_command(cli.command, format));

    let exit_code = result.unwrap_or_else(|err| {
        eprintln!("{} {err:#}", "error:".red().bold());
        ExitCode::INVALID_INPUT
    });
    process::exit(exit_code.as_i32());
}
