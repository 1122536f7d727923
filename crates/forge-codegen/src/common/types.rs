//! Generated-file model shared by every emitter.
//!
//! # Examples
//!
//! ```
//! use forge_codegen::{GeneratedCode, GeneratedFile, OutputTarget};
//!
//! let mut code = GeneratedCode::new();
//! code.add_file(GeneratedFile::new(
//!     OutputTarget::Docs,
//!     "README.md",
//!     "# System Contract Documentation\n",
//! ));
//!
//! assert_eq!(code.file_count(), 1);
//! ```

use forge_core::ResolvedPaths;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Directory an artifact is written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputTarget {
    /// Generated sources (`main/generated` by default)
    Output,
    /// Shared contract header (`components/core/include` by default)
    Constants,
    /// Contract documentation (`components/system_contract` by default)
    Docs,
}

impl OutputTarget {
    /// Every target, in a fixed order.
    pub const ALL: [Self; 3] = [Self::Output, Self::Constants, Self::Docs];

    /// Returns the directory this target maps to.
    #[must_use]
    pub fn directory(self, paths: &ResolvedPaths) -> PathBuf {
        match self {
            Self::Output => paths.output_dir.clone(),
            Self::Constants => paths.constants_dir.clone(),
            Self::Docs => paths.docs_dir.clone(),
        }
    }

    /// Returns the lowercase target name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Output => "output",
            Self::Constants => "constants",
            Self::Docs => "docs",
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one generation pass.
///
/// Files appear in emitter registration order, which is fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratedCode {
    /// Generated artifacts
    pub files: Vec<GeneratedFile>,
}

impl GeneratedCode {
    /// Creates an empty container.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Adds a generated file.
    pub fn add_file(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    /// Returns the number of generated files.
    #[inline]
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Returns an iterator over the generated files.
    #[inline]
    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter()
    }

    /// Looks up a file by name.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|file| file.path == name)
    }

    /// Returns the files destined for one target directory.
    pub fn for_target(&self, target: OutputTarget) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter().filter(move |file| file.target == target)
    }
}

/// A single generated artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    /// Directory the file belongs to
    pub target: OutputTarget,
    /// File name relative to the target directory
    pub path: String,
    /// File content
    pub content: String,
}

impl GeneratedFile {
    /// Creates a generated file.
    #[must_use]
    pub fn new(target: OutputTarget, path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            target,
            path: path.into(),
            content: content.into(),
        }
    }

    /// Returns the file name.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the file content.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the absolute destination of this file.
    #[must_use]
    pub fn destination(&self, paths: &ResolvedPaths) -> PathBuf {
        self.target.directory(paths).join(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::PathsConfig;
    use std::path::Path;

    #[test]
    fn test_destination_per_target() {
        let paths = PathsConfig::default().resolve(Path::new("/project"));
        let header = GeneratedFile::new(OutputTarget::Constants, "generated_system_contract.h", "");
        let readme = GeneratedFile::new(OutputTarget::Docs, "README.md", "");

        assert_eq!(
            header.destination(&paths),
            Path::new("/project/components/core/include/generated_system_contract.h")
        );
        assert_eq!(
            readme.destination(&paths),
            Path::new("/project/components/system_contract/README.md")
        );
    }

    #[test]
    fn test_lookup_and_filter() {
        let mut code = GeneratedCode::new();
        code.add_file(GeneratedFile::new(OutputTarget::Output, "a.cpp", "a"));
        code.add_file(GeneratedFile::new(OutputTarget::Docs, "b.md", "b"));
        code.add_file(GeneratedFile::new(OutputTarget::Output, "c.h", "c"));

        assert_eq!(code.file_count(), 3);
        assert_eq!(code.file("b.md").map(GeneratedFile::content), Some("b"));
        assert!(code.file("missing").is_none());
        assert_eq!(code.for_target(OutputTarget::Output).count(), 2);
    }
}
