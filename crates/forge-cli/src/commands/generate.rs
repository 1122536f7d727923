//! Generate command implementation.
//!
//! Runs the full pipeline: discovery, parsing, validation, the report, and
//! artifact emission when validation passes.

use anyhow::Result;
use forge_core::cli::{ExitCode, OutputFormat};
use std::path::PathBuf;
use tracing::info;

use crate::cli::ProjectArgs;
use crate::formatters::format_output;
use crate::pipeline::{self, Mode, PipelineOptions};

/// Runs the generate command.
///
/// Returns [`ExitCode::VALIDATION_FAILED`] when the validator reported an
/// ERROR, even if `emit_on_error` let emission go ahead.
///
/// # Errors
///
/// Returns an error for environment failures: a missing project root, an
/// invalid configuration or schema file, or an unwritable output directory.
pub fn run(
    project: ProjectArgs,
    output_dir: Option<PathBuf>,
    emit_on_error: bool,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let mut options = PipelineOptions::from(project);
    options.output_dir = output_dir;
    options.emit_on_error = emit_on_error;

    info!("Generating from {}", options.project_root.display());
    let summary = pipeline::run(&options, Mode::Generate)?;

    println!("{}", format_output(&summary, output_format)?);
    Ok(summary.exit_code())
}
