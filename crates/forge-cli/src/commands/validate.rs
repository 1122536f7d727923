//! Validate command implementation.
//!
//! Runs discovery, parsing and validation and writes the report. Never
//! touches generated artifacts.

use anyhow::Result;
use forge_core::cli::{ExitCode, OutputFormat};
use tracing::info;

use crate::cli::ProjectArgs;
use crate::formatters::format_output;
use crate::pipeline::{self, Mode, PipelineOptions};

/// Runs the validate command.
///
/// # Errors
///
/// Returns an error for environment failures, as `generate` does.
pub fn run(project: ProjectArgs, output_format: OutputFormat) -> Result<ExitCode> {
    let options = PipelineOptions::from(project);
    info!("Validating {}", options.project_root.display());

    let summary = pipeline::run(&options, Mode::Validate)?;
    println!("{}", format_output(&summary, output_format)?);
    Ok(summary.exit_code())
}
