//! Core types for the artifact tree.
//!
//! # Examples
//!
//! ```
//! use forge_files::FileEntry;
//!
//! let entry = FileEntry::new("#pragma once\n");
//! assert_eq!(entry.content(), "#pragma once\n");
//! assert_eq!(entry.size(), 13);
//! assert_eq!(entry.content_hash().len(), 64);
//! ```

use std::io;
use std::path::{Component, Path};
use thiserror::Error;

/// Errors raised while assembling or exporting artifacts.
#[derive(Error, Debug)]
pub enum FilesError {
    /// A path that should exist does not.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The missing path
        path: String,
    },

    /// A path is empty or has no file name.
    #[error("Invalid path: {path}")]
    InvalidPath {
        /// The rejected path
        path: String,
    },

    /// A path escapes its directory through `..`.
    #[error("Path contains invalid components: {path}")]
    InvalidPathComponent {
        /// The rejected path
        path: String,
    },

    /// A target directory cannot be created or written.
    #[error("Directory not writable: {path}: {reason}")]
    NotWritable {
        /// The directory
        path: String,
        /// Why the probe failed
        reason: String,
    },

    /// An I/O operation failed while writing an artifact.
    #[error("I/O error at {path}: {source}")]
    IoError {
        /// The file being written
        path: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl FilesError {
    /// Returns `true` if the path itself was rejected.
    #[must_use]
    pub const fn is_invalid_path(&self) -> bool {
        matches!(
            self,
            Self::InvalidPath { .. } | Self::InvalidPathComponent { .. }
        )
    }

    /// Returns `true` if a target directory failed the writability probe.
    #[must_use]
    pub const fn is_not_writable(&self) -> bool {
        matches!(self, Self::NotWritable { .. })
    }
}

impl From<FilesError> for forge_core::Error {
    fn from(err: FilesError) -> Self {
        match err {
            FilesError::NotWritable { path, reason } => Self::OutputNotWritable {
                path: path.into(),
                reason,
            },
            FilesError::IoError { path, source } => Self::Io {
                path: path.into(),
                source,
            },
            other => Self::InvalidArgument(other.to_string()),
        }
    }
}

/// Result type for artifact operations.
pub type Result<T> = std::result::Result<T, FilesError>;

/// Checks that an artifact path names a file and never climbs out of its
/// directory.
///
/// # Errors
///
/// Returns `FilesError::InvalidPath` for an empty path or one without a
/// file name, and `FilesError::InvalidPathComponent` for a path with `..`.
pub fn validate_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() || path.file_name().is_none() {
        return Err(FilesError::InvalidPath {
            path: path.display().to_string(),
        });
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(FilesError::InvalidPathComponent {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

/// One artifact held in memory before export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    content: String,
}

impl FileEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// File content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content length in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Hex-encoded BLAKE3 hash of the content.
    #[must_use]
    pub fn content_hash(&self) -> String {
        blake3::hash(self.content.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path(Path::new("/fw/main/generated/a.cpp")).is_ok());
        assert!(validate_path(Path::new("build/report.md")).is_ok());
        assert!(validate_path(Path::new("")).unwrap_err().is_invalid_path());
        assert!(
            validate_path(Path::new("/fw/../etc/passwd"))
                .unwrap_err()
                .is_invalid_path()
        );
        assert!(validate_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_content_hash_is_stable() {
        let a = FileEntry::new("same");
        let b = FileEntry::new("same");
        let c = FileEntry::new("different");
        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash());
    }

    #[test]
    fn test_conversion_to_core_error() {
        let err: forge_core::Error = FilesError::NotWritable {
            path: "/fw/main/generated".into(),
            reason: "read-only file system".into(),
        }
        .into();
        assert!(err.is_environment_error());
        assert!(err.to_string().contains("/fw/main/generated"));
    }
}
