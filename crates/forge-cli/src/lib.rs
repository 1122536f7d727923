//! manifest-forge CLI library.
//!
//! Exposes the command-line definitions, the pipeline runner and the
//! output formatters so they can be tested without spawning the binary.
//!
//! # Exit codes
//!
//! | Code | Meaning |
//! |---|---|
//! | 0 | success |
//! | 1 | the validator reported at least one ERROR |
//! | 2 | invalid arguments or a broken environment |

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod cli;
pub mod commands;
pub mod formatters;
pub mod pipeline;
pub mod runner;

pub use pipeline::{Mode, PipelineOptions, RunSummary};
