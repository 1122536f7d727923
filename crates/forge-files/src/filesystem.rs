//! In-memory artifact tree and its export to disk.
//!
//! Export runs in three phases:
//!
//! 1. **Preflight**: create every target directory and probe it for
//!    writability. Any failure aborts before a single artifact is touched.
//! 2. **Compare**: skip files whose on-disk content already matches.
//! 3. **Write**: write each remaining file to a sibling temp file, sync it,
//!    then rename it over the destination.
//!
//! # Examples
//!
//! ```
//! use forge_files::{ExportOptions, FilesBuilder};
//! # use tempfile::TempDir;
//!
//! # let temp = TempDir::new().unwrap();
//! # let out = temp.path().join("main/generated");
//! let files = FilesBuilder::new()
//!     .add_file(out.join("generated_module_info.cpp"), "// modules\n")
//!     .build()
//!     .unwrap();
//!
//! let summary = files.export(&ExportOptions::default()).unwrap();
//! assert_eq!(summary.written.len(), 1);
//! assert!(out.join("generated_module_info.cpp").exists());
//! ```

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::{FileEntry, FilesError, Result, validate_path};

const PROBE_FILE: &str = ".manifest-forge-write-probe";

/// Options for export operations.
///
/// Writes are always atomic: each file goes to a sibling temp file that is
/// synced and renamed over the destination.
///
/// # Examples
///
/// ```
/// use forge_files::ExportOptions;
///
/// let options = ExportOptions::default().with_skip_unchanged(false);
/// assert!(!options.skip_unchanged);
/// assert!(ExportOptions::new().skip_unchanged);
/// ```
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Leave files whose content is already up to date untouched
    pub skip_unchanged: bool,
}

impl ExportOptions {
    /// Creates export options that skip unchanged files.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            skip_unchanged: true,
        }
    }

    /// Sets whether files with identical content are skipped.
    #[must_use]
    pub const fn with_skip_unchanged(mut self, skip: bool) -> Self {
        self.skip_unchanged = skip;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// One exported file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedFile {
    /// Destination path
    pub path: PathBuf,
    /// Content size in bytes
    pub size: usize,
    /// Hex-encoded BLAKE3 content hash
    pub hash: String,
}

/// What an export did, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Files written
    pub written: Vec<ExportedFile>,
    /// Files left alone because their content already matched
    pub unchanged: Vec<ExportedFile>,
}

impl ExportSummary {
    /// Every file the export accounted for.
    pub fn all(&self) -> impl Iterator<Item = &ExportedFile> {
        self.written.iter().chain(&self.unchanged)
    }
}

/// An in-memory tree of artifacts keyed by destination path.
///
/// Paths are kept sorted, so export order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSystem {
    files: BTreeMap<PathBuf, FileEntry>,
}

impl FileSystem {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            files: BTreeMap::new(),
        }
    }

    /// Adds or replaces a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no file name or contains `..`.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Result<()> {
        let path = path.as_ref();
        validate_path(path)?;
        self.files
            .insert(path.to_path_buf(), FileEntry::new(content));
        Ok(())
    }

    /// Reads a file's content.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::FileNotFound` if the path is not in the tree.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<&str> {
        let path = path.as_ref();
        self.files
            .get(path)
            .map(FileEntry::content)
            .ok_or_else(|| FilesError::FileNotFound {
                path: path.display().to_string(),
            })
    }

    /// Number of files in the tree.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Iterates files in path order.
    pub fn files(&self) -> impl Iterator<Item = (&Path, &FileEntry)> {
        self.files.iter().map(|(path, entry)| (path.as_path(), entry))
    }

    /// Directories that must exist before export.
    #[must_use]
    pub fn directories(&self) -> BTreeSet<PathBuf> {
        self.files
            .keys()
            .filter_map(|path| path.parent())
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .collect()
    }

    /// Creates every target directory and checks that each accepts a new
    /// file.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::NotWritable` for the first directory that
    /// cannot be created or written.
    pub fn preflight(&self) -> Result<()> {
        for dir in self.directories() {
            probe_directory(&dir)?;
        }
        debug!("Preflight passed for {} directories", self.directories().len());
        Ok(())
    }

    /// Exports the tree to disk.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::NotWritable` if preflight fails, in which case
    /// nothing was written, or `FilesError::IoError` if a write fails.
    pub fn export(&self, options: &ExportOptions) -> Result<ExportSummary> {
        self.preflight()?;

        let mut summary = ExportSummary::default();
        for (path, entry) in &self.files {
            let record = ExportedFile {
                path: path.clone(),
                size: entry.size(),
                hash: entry.content_hash(),
            };

            if options.skip_unchanged && is_unchanged(path, entry) {
                debug!("Unchanged: {}", path.display());
                summary.unchanged.push(record);
                continue;
            }

            write_file(path, entry.content())?;
            debug!("Wrote {} ({} bytes)", path.display(), entry.size());
            summary.written.push(record);
        }

        info!(
            "Exported {} file(s): {} written, {} unchanged",
            self.files.len(),
            summary.written.len(),
            summary.unchanged.len()
        );
        Ok(summary)
    }
}

fn not_writable(dir: &Path, reason: impl Into<String>) -> FilesError {
    FilesError::NotWritable {
        path: dir.display().to_string(),
        reason: reason.into(),
    }
}

/// Creates `dir` if needed and proves it accepts a new file.
fn probe_directory(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| not_writable(dir, e.to_string()))?;
    if !dir.is_dir() {
        return Err(not_writable(dir, "not a directory"));
    }

    let probe = dir.join(PROBE_FILE);
    fs::File::create(&probe)
        .and_then(|mut file| file.write_all(b"probe"))
        .map_err(|e| not_writable(dir, e.to_string()))?;
    fs::remove_file(&probe).map_err(|e| not_writable(dir, e.to_string()))?;
    Ok(())
}

fn is_unchanged(path: &Path, entry: &FileEntry) -> bool {
    fs::read(path).is_ok_and(|existing| existing == entry.content().as_bytes())
}

fn io_error(path: &Path, source: std::io::Error) -> FilesError {
    FilesError::IoError {
        path: path.display().to_string(),
        source,
    }
}

/// Sibling temp path: `name.ext` becomes `name.ext.tmp`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes content through a synced sibling temp file and renames it into
/// place. The temp file never outlives a failed write.
fn write_file(path: &Path, content: &str) -> Result<()> {
    let temp = temp_path(path);
    let written = fs::File::create(&temp)
        .and_then(|mut file| {
            file.write_all(content.as_bytes())?;
            file.sync_all()
        })
        .map_err(|e| io_error(&temp, e))
        .and_then(|()| fs::rename(&temp, path).map_err(|e| io_error(path, e)));

    if written.is_err() {
        let _ = fs::remove_file(&temp);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree(base: &Path, files: &[(&str, &str)]) -> FileSystem {
        let mut fs = FileSystem::new();
        for (path, content) in files {
            fs.add_file(base.join(path), *content).unwrap();
        }
        fs
    }

    #[test]
    fn test_export_single_file() {
        let temp = TempDir::new().unwrap();
        let files = tree(temp.path(), &[("out/a.cpp", "int a;")]);

        let summary = files.export(&ExportOptions::default()).unwrap();
        assert_eq!(summary.written.len(), 1);
        assert_eq!(
            fs::read_to_string(temp.path().join("out/a.cpp")).unwrap(),
            "int a;"
        );
        assert!(!temp.path().join("out/a.cpp.tmp").exists());
        assert!(!temp.path().join("out").join(PROBE_FILE).exists());
    }

    #[test]
    fn test_export_skips_unchanged() {
        let temp = TempDir::new().unwrap();
        let files = tree(temp.path(), &[("a.h", "x"), ("b.h", "y")]);
        files.export(&ExportOptions::default()).unwrap();

        let again = files.export(&ExportOptions::default()).unwrap();
        assert!(again.written.is_empty());
        assert_eq!(again.unchanged.len(), 2);

        let forced = files
            .export(&ExportOptions::default().with_skip_unchanged(false))
            .unwrap();
        assert_eq!(forced.written.len(), 2);
    }

    #[test]
    fn test_export_overwrites_changed() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.h"), "old").unwrap();
        let files = tree(temp.path(), &[("a.h", "new")]);

        let summary = files.export(&ExportOptions::default()).unwrap();
        assert_eq!(summary.written.len(), 1);
        assert_eq!(fs::read_to_string(temp.path().join("a.h")).unwrap(), "new");
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a file.
        let target = temp.path().join("out/a.cpp");
        fs::create_dir_all(target.join("inner")).unwrap();
        let files = tree(temp.path(), &[("out/a.cpp", "int a;")]);

        let err = files.export(&ExportOptions::default()).unwrap_err();
        assert!(matches!(err, FilesError::IoError { .. }));
        assert!(!temp.path().join("out/a.cpp.tmp").exists());
        assert!(target.join("inner").is_dir());
    }

    #[test]
    fn test_failed_temp_write_is_cleaned_up() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a.h");
        // A directory squatting on the temp path makes creation fail and
        // must survive the cleanup.
        fs::create_dir(temp_path(&target)).unwrap();

        let err = write_file(&target, "x").unwrap_err();
        assert!(matches!(err, FilesError::IoError { .. }));
        assert!(temp_path(&target).is_dir());
        assert!(!target.exists());
    }

    #[test]
    fn test_preflight_failure_writes_nothing() {
        let temp = TempDir::new().unwrap();
        // A regular file where a directory is needed.
        fs::write(temp.path().join("blocked"), "").unwrap();
        let files = tree(
            temp.path(),
            &[("aaa/first.cpp", "first"), ("blocked/generated/b.cpp", "b")],
        );

        let err = files.export(&ExportOptions::default()).unwrap_err();
        assert!(err.is_not_writable());
        assert!(!temp.path().join("aaa/first.cpp").exists());
    }

    #[test]
    fn test_directories_deduplicated() {
        let files = tree(
            Path::new("/fw"),
            &[("gen/a.cpp", ""), ("gen/b.cpp", ""), ("docs/c.md", "")],
        );
        let dirs: Vec<PathBuf> = files.directories().into_iter().collect();
        assert_eq!(dirs, vec![PathBuf::from("/fw/docs"), PathBuf::from("/fw/gen")]);
    }

    #[test]
    fn test_read_file() {
        let files = tree(Path::new("/fw"), &[("a.cpp", "content")]);
        assert_eq!(files.file_count(), 1);
        assert_eq!(files.read_file("/fw/a.cpp").unwrap(), "content");
        assert!(matches!(
            files.read_file("/fw/b.cpp").unwrap_err(),
            FilesError::FileNotFound { .. }
        ));
    }

    #[test]
    fn test_temp_path_keeps_extension() {
        assert_eq!(
            temp_path(Path::new("/fw/gen/a.cpp")),
            PathBuf::from("/fw/gen/a.cpp.tmp")
        );
    }
}
