//! Builder for artifact trees.
//!
//! # Examples
//!
//! ```
//! use forge_files::FilesBuilder;
//!
//! let files = FilesBuilder::new()
//!     .add_file("/fw/main/generated/generated_api_registry.cpp", "// api")
//!     .add_file("/fw/docs/generated/README.md", "# Modules")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(files.file_count(), 2);
//! ```

use crate::filesystem::{ExportOptions, ExportSummary, FileSystem};
use crate::types::{FilesError, Result};
use forge_codegen::GeneratedCode;
use forge_core::ResolvedPaths;
use std::path::Path;

/// Collects artifacts and path errors, reporting the first error on
/// [`build`](Self::build).
///
/// # Examples
///
/// ```
/// use forge_codegen::{GeneratedCode, GeneratedFile, OutputTarget};
/// use forge_core::PathsConfig;
/// use forge_files::FilesBuilder;
/// use std::path::Path;
///
/// let mut code = GeneratedCode::new();
/// code.add_file(GeneratedFile::new(OutputTarget::Docs, "events.md", "# Events"));
///
/// let paths = PathsConfig::default().resolve(Path::new("/fw"));
/// let files = FilesBuilder::from_generated_code(code, &paths).build().unwrap();
///
/// assert_eq!(files.read_file(paths.docs_dir.join("events.md")).unwrap(), "# Events");
/// ```
#[derive(Debug, Default)]
pub struct FilesBuilder {
    fs: FileSystem,
    errors: Vec<FilesError>,
}

impl FilesBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places every generated file in the directory its target resolves to.
    #[must_use]
    pub fn from_generated_code(code: GeneratedCode, paths: &ResolvedPaths) -> Self {
        code.files.into_iter().fold(Self::new(), |builder, file| {
            let destination = file.destination(paths);
            builder.add_file(destination, file.content)
        })
    }

    /// Adds a file. An invalid path is recorded and returned by `build()`.
    #[must_use]
    pub fn add_file(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        if let Err(e) = self.fs.add_file(path, content) {
            self.errors.push(e);
        }
        self
    }

    /// Adds many files at once.
    #[must_use]
    pub fn add_files<P, C>(self, files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<Path>,
        C: Into<String>,
    {
        files
            .into_iter()
            .fold(self, |builder, (path, content)| builder.add_file(path, content))
    }

    /// Number of files added so far.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.fs.file_count()
    }

    /// Consumes the builder and returns the tree.
    ///
    /// # Errors
    ///
    /// Returns the first path error recorded while adding files.
    pub fn build(self) -> Result<FileSystem> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.fs),
        }
    }

    /// Builds the tree and writes it to disk.
    ///
    /// # Errors
    ///
    /// Returns a path error from [`build`](Self::build), or any error from
    /// [`FileSystem::export`].
    pub fn build_and_export(self, options: &ExportOptions) -> Result<(FileSystem, ExportSummary)> {
        let fs = self.build()?;
        let summary = fs.export(options)?;
        Ok((fs, summary))
    }
}
