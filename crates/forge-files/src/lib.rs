//! Artifact tree assembly and safe export for manifest-forge.
//!
//! Generated artifacts are collected in memory by [`FilesBuilder`], keyed by
//! their absolute destination, and written by [`FileSystem::export`]. Export
//! checks every target directory before it writes anything, so a run that
//! cannot write all of its output leaves existing files untouched.
//!
//! # Examples
//!
//! ```
//! use forge_files::{ExportOptions, FilesBuilder};
//! # use tempfile::TempDir;
//!
//! # let temp = TempDir::new().unwrap();
//! let root = temp.path();
//! let files = FilesBuilder::new()
//!     .add_file(root.join("main/generated/generated_module_info.cpp"), "// info\n")
//!     .add_file(root.join("docs/generated/README.md"), "# Modules\n")
//!     .build()
//!     .unwrap();
//!
//! let first = files.export(&ExportOptions::default()).unwrap();
//! assert_eq!(first.written.len(), 2);
//!
//! // Same content again: nothing is rewritten.
//! let second = files.export(&ExportOptions::default()).unwrap();
//! assert!(second.written.is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod builder;
pub mod filesystem;
pub mod types;

pub use builder::FilesBuilder;
pub use filesystem::{ExportOptions, ExportSummary, ExportedFile, FileSystem};
pub use types::{FileEntry, FilesError, Result, validate_path};
