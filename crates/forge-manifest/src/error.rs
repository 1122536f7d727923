//! Per-file manifest failures.
//!
//! A failure skips one file; the run continues with the rest.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a single manifest file was skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ManifestFailure {
    /// The file is unreadable or not valid JSON.
    #[error("failed to parse {}: {message}", file.display())]
    Parse {
        /// Manifest path relative to the project root
        file: PathBuf,
        /// Parser message
        message: String,
    },

    /// The JSON is well-formed but violates the schema or the record
    /// structure.
    #[error("invalid manifest {}: {message}", file.display())]
    Validation {
        /// Manifest path relative to the project root
        file: PathBuf,
        /// Violation description
        message: String,
    },
}

impl ManifestFailure {
    /// Returns the manifest path the failure refers to.
    #[must_use]
    pub fn file(&self) -> &Path {
        match self {
            Self::Parse { file, .. } | Self::Validation { file, .. } => file,
        }
    }

    /// Returns the failure message without the path.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Parse { message, .. } | Self::Validation { message, .. } => message,
        }
    }

    /// Returns `true` for JSON syntax and read failures.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Returns `true` for schema and structure violations.
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
