//! Parallel loading of discovered manifests.

use forge_core::{DriverRecord, EventSpec, ManifestKind, ManifestRecord, StateSpec};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

use crate::discovery::DiscoveredManifest;
use crate::error::ManifestFailure;
use crate::parser::{parse_driver_manifest, parse_module_manifest};
use crate::schema::SchemaSet;

/// Every record parsed in one run, plus the files that were skipped.
///
/// Records are sorted by `(name, source_path)` and failures by file, so the
/// set is identical regardless of discovery order or thread scheduling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestSet {
    /// Parsed module manifests
    pub modules: Vec<ManifestRecord>,
    /// Parsed driver manifests
    pub drivers: Vec<DriverRecord>,
    /// Files skipped because of parse or validation failures
    pub failures: Vec<ManifestFailure>,
}

impl ManifestSet {
    /// Builds a set from records, applying the canonical ordering.
    #[must_use]
    pub fn new(
        mut modules: Vec<ManifestRecord>,
        mut drivers: Vec<DriverRecord>,
        mut failures: Vec<ManifestFailure>,
    ) -> Self {
        modules.sort_by(|a, b| (&a.name, &a.source_path).cmp(&(&b.name, &b.source_path)));
        drivers.sort_by(|a, b| (&a.name, &a.source_path).cmp(&(&b.name, &b.source_path)));
        failures.sort_by(|a, b| a.file().cmp(b.file()));
        Self {
            modules,
            drivers,
            failures,
        }
    }

    /// Finds a module by name. With duplicate names the first in canonical
    /// order is returned.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&ManifestRecord> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Returns the distinct module names.
    #[must_use]
    pub fn module_names(&self) -> BTreeSet<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }

    /// Declaration of an event, taken from its first publisher in name
    /// order, or its first subscriber when nobody publishes it.
    #[must_use]
    pub fn event_spec(&self, event: &str) -> Option<&EventSpec> {
        self.modules
            .iter()
            .find_map(|m| m.events.publishes.get(event))
            .or_else(|| {
                self.modules
                    .iter()
                    .find_map(|m| m.events.subscribes.get(event))
            })
    }

    /// Declaration of a state key, taken from its first writer in name
    /// order, or its first reader when nobody writes it.
    #[must_use]
    pub fn state_spec(&self, key: &str) -> Option<&StateSpec> {
        self.modules
            .iter()
            .find_map(|m| m.shared_state.publishes.get(key))
            .or_else(|| {
                self.modules
                    .iter()
                    .find_map(|m| m.shared_state.subscribes.get(key))
            })
    }

    /// Returns `true` if no manifest was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.drivers.is_empty()
    }
}

enum Parsed {
    Module(ManifestRecord),
    Driver(DriverRecord),
}

/// Parses every discovered manifest.
///
/// Failures are collected per file; the remaining files are still parsed.
/// With `parallel` set, files are parsed on the rayon thread pool and the
/// collect is the barrier before indexing.
#[must_use]
pub fn load_manifests(
    project_root: &Path,
    discovered: &[DiscoveredManifest],
    schemas: &SchemaSet,
    parallel: bool,
) -> ManifestSet {
    let parse_one = |manifest: &DiscoveredManifest| -> Result<Parsed, ManifestFailure> {
        let relative = manifest
            .path
            .strip_prefix(project_root)
            .unwrap_or(&manifest.path)
            .to_path_buf();
        match manifest.kind {
            ManifestKind::Module => {
                parse_module_manifest(&manifest.path, relative, schemas).map(Parsed::Module)
            }
            ManifestKind::Driver => {
                parse_driver_manifest(&manifest.path, relative, schemas).map(Parsed::Driver)
            }
        }
    };

    let results: Vec<Result<Parsed, ManifestFailure>> = if parallel {
        discovered.par_iter().map(parse_one).collect()
    } else {
        discovered.iter().map(parse_one).collect()
    };

    let mut modules = Vec::new();
    let mut drivers = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(Parsed::Module(record)) => modules.push(record),
            Ok(Parsed::Driver(record)) => drivers.push(record),
            Err(failure) => {
                warn!("Skipping manifest: {failure}");
                failures.push(failure);
            }
        }
    }

    info!(
        "Loaded {} module(s), {} driver(s), {} failure(s)",
        modules.len(),
        drivers.len(),
        failures.len()
    );
    ManifestSet::new(modules, drivers, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover_manifests;
    use std::fs;
    use tempfile::TempDir;

    fn write_module(root: &Path, dir: &str, content: &str) {
        let path = root.join("components").join(dir);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("module_manifest.json"), content).unwrap();
    }

    #[test]
    fn test_partial_failure_continues() {
        let temp = TempDir::new().unwrap();
        write_module(temp.path(), "good", r#"{"module": {"name": "Good"}}"#);
        write_module(temp.path(), "broken", "{ nope");
        write_module(temp.path(), "nameless", r#"{"module": {}}"#);

        let discovered = discover_manifests(&temp.path().join("components")).unwrap();
        let set = load_manifests(temp.path(), &discovered, &SchemaSet::empty(), true);

        assert_eq!(set.modules.len(), 1);
        assert_eq!(set.modules[0].name, "Good");
        assert_eq!(
            set.modules[0].source_path,
            Path::new("components/good/module_manifest.json")
        );
        assert_eq!(set.failures.len(), 2);
        assert!(set.failures[0].is_parse_error());
        assert!(set.failures[1].is_validation_error());
    }

    #[test]
    fn test_sorted_by_name_not_path() {
        let temp = TempDir::new().unwrap();
        write_module(temp.path(), "a", r#"{"module": {"name": "Zeta"}}"#);
        write_module(temp.path(), "b", r#"{"module": {"name": "Alpha"}}"#);

        let discovered = discover_manifests(&temp.path().join("components")).unwrap();
        let set = load_manifests(temp.path(), &discovered, &SchemaSet::empty(), false);
        let names: Vec<_> = set.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let temp = TempDir::new().unwrap();
        for i in 0..20 {
            write_module(
                temp.path(),
                &format!("m{i}"),
                &format!(r#"{{"module": {{"name": "Module{i}"}}}}"#),
            );
        }
        let discovered = discover_manifests(&temp.path().join("components")).unwrap();
        let sequential = load_manifests(temp.path(), &discovered, &SchemaSet::empty(), false);
        let parallel = load_manifests(temp.path(), &discovered, &SchemaSet::empty(), true);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_module_lookup() {
        let set = ManifestSet::new(
            vec![ManifestRecord::new("B"), ManifestRecord::new("A")],
            vec![],
            vec![],
        );
        assert!(set.module("A").is_some());
        assert!(set.module("C").is_none());
        assert_eq!(set.module_names().into_iter().collect::<Vec<_>>(), vec!["A", "B"]);
        assert!(!set.is_empty());
        assert!(ManifestSet::default().is_empty());
    }

    #[test]
    fn test_event_spec_prefers_publisher() {
        let described = |text: &str| EventSpec {
            description: text.to_string(),
            ..EventSpec::default()
        };
        let mut reader = ManifestRecord::new("A");
        reader
            .events
            .subscribes
            .insert("sensor.updated".into(), described("subscriber view"));
        let mut writer = ManifestRecord::new("B");
        writer
            .events
            .publishes
            .insert("sensor.updated".into(), described("publisher view"));
        writer
            .events
            .subscribes
            .insert("ui.ready".into(), described("only reader"));

        let set = ManifestSet::new(vec![writer, reader], vec![], vec![]);
        assert_eq!(
            set.event_spec("sensor.updated").map(|s| s.description.as_str()),
            Some("publisher view")
        );
        assert_eq!(
            set.event_spec("ui.ready").map(|s| s.description.as_str()),
            Some("only reader")
        );
        assert!(set.event_spec("ghost").is_none());
        assert!(set.state_spec("ghost").is_none());
    }
}
