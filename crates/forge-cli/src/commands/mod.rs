//! Command implementations for manifest-forge.
//!
//! Each command builds [`PipelineOptions`](crate::pipeline::PipelineOptions)
//! from its arguments, drives the pipeline, and prints a result in the
//! requested output format.

pub mod completions;
pub mod generate;
pub mod inspect;
pub mod validate;

use crate::cli::ProjectArgs;
use crate::pipeline::PipelineOptions;

impl From<ProjectArgs> for PipelineOptions {
    fn from(args: ProjectArgs) -> Self {
        let mut options = Self::new(args.project_root);
        options.config_path = args.config;
        options
    }
}
