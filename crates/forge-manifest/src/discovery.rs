//! Manifest discovery in the component tree.

use forge_core::{Error, ManifestKind, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A manifest file found on disk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DiscoveredManifest {
    /// Absolute or root-joined path to the file
    pub path: PathBuf,
    /// Kind derived from the file name
    pub kind: ManifestKind,
}

/// Recursively finds every manifest under `components_dir`.
///
/// The result is sorted by path so that later stages never observe
/// filesystem enumeration order. A missing component directory yields an
/// empty list.
///
/// # Errors
///
/// Returns `Error::Io` if a directory inside the tree cannot be read.
///
/// # Examples
///
/// ```
/// use forge_core::ManifestKind;
/// use forge_manifest::discover_manifests;
/// # use tempfile::TempDir;
/// # use std::fs;
///
/// # let temp = TempDir::new().unwrap();
/// # fs::create_dir_all(temp.path().join("drivers/ntc")).unwrap();
/// # fs::write(temp.path().join("drivers/ntc/ntc_driver_manifest.json"), "{}").unwrap();
/// # fs::write(temp.path().join("module_manifest.json"), "{}").unwrap();
/// # fs::write(temp.path().join("notes.json"), "{}").unwrap();
/// let found = discover_manifests(temp.path())?;
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0].kind, ManifestKind::Driver);
/// # Ok::<(), forge_core::Error>(())
/// ```
pub fn discover_manifests(components_dir: &Path) -> Result<Vec<DiscoveredManifest>> {
    if !components_dir.is_dir() {
        warn!(
            "Components directory {} does not exist, no manifests to process",
            components_dir.display()
        );
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(components_dir).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map_or_else(|| components_dir.to_path_buf(), Path::to_path_buf);
            Error::Io {
                path,
                source: e.into(),
            }
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let Some(kind) = entry.file_name().to_str().and_then(ManifestKind::from_file_name) else {
            continue;
        };

        debug!("Discovered {} manifest {}", kind.as_str(), entry.path().display());
        found.push(DiscoveredManifest {
            path: entry.into_path(),
            kind,
        });
    }

    found.sort();
    info!(
        "Discovered {} manifest(s) under {}",
        found.len(),
        components_dir.display()
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        let found = discover_manifests(&temp.path().join("components")).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_nested_discovery_sorted() {
        let temp = TempDir::new().unwrap();
        for dir in ["zeta", "alpha/inner", "mid"] {
            let path = temp.path().join(dir);
            fs::create_dir_all(&path).unwrap();
            fs::write(path.join("module_manifest.json"), "{}").unwrap();
        }

        let found = discover_manifests(temp.path()).unwrap();
        let paths: Vec<_> = found
            .iter()
            .map(|m| m.path.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("alpha/inner/module_manifest.json"),
                PathBuf::from("mid/module_manifest.json"),
                PathBuf::from("zeta/module_manifest.json"),
            ]
        );
        assert!(found.iter().all(|m| m.kind == ManifestKind::Module));
    }

    #[test]
    fn test_ignores_unrelated_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("module_manifest.json.bak"), "{}").unwrap();
        fs::write(temp.path().join("driver_manifest.json"), "{}").unwrap();
        fs::create_dir_all(temp.path().join("module_manifest.json.d")).unwrap();
        assert!(discover_manifests(temp.path()).unwrap().is_empty());
    }
}
