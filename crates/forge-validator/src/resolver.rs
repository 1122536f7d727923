//! Static dependency resolution.
//!
//! Dependencies are checked by name only: each declared dependency must be
//! a parsed module or one of the built-in platform services. No object
//! graph is instantiated.

use forge_core::{BUILTIN_SERVICES, Issue, IssueCategory, Severity};
use forge_manifest::ManifestSet;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Resolves declared module dependencies against known names.
#[derive(Debug)]
pub struct DependencyResolver<'a> {
    set: &'a ManifestSet,
    known: BTreeSet<&'a str>,
}

impl<'a> DependencyResolver<'a> {
    /// Creates a resolver over the parsed modules plus the built-in
    /// services.
    #[must_use]
    pub fn new(set: &'a ManifestSet) -> Self {
        let mut known = set.module_names();
        known.extend(BUILTIN_SERVICES);
        Self { set, known }
    }

    /// Returns `true` if `name` is a parsed module or a built-in service.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_manifest::ManifestSet;
    /// use forge_validator::DependencyResolver;
    ///
    /// let set = ManifestSet::default();
    /// let resolver = DependencyResolver::new(&set);
    /// assert!(resolver.is_known("EventBus"));
    /// assert!(!resolver.is_known("Ghost"));
    /// ```
    #[must_use]
    pub fn is_known(&self, name: &str) -> bool {
        self.known.contains(name)
    }

    /// Checks every module's dependencies.
    ///
    /// Unknown names are ERRORs; a dependency declared twice by the same
    /// module is a WARNING. Modules are visited in name order.
    #[must_use]
    pub fn resolve(&self) -> Vec<Issue> {
        let mut issues = Vec::new();

        for module in &self.set.modules {
            let mut seen = BTreeSet::new();
            let mut repeated = BTreeSet::new();

            for dependency in &module.dependencies {
                if !seen.insert(dependency.as_str()) {
                    repeated.insert(dependency.as_str());
                    continue;
                }
                if !self.is_known(dependency) {
                    issues.push(
                        Issue::new(
                            Severity::Error,
                            IssueCategory::Dependency,
                            dependency.as_str(),
                            format!(
                                "Module '{}' depends on non-existent module '{dependency}'",
                                module.name
                            ),
                        )
                        .with_modules([module.name.as_str()]),
                    );
                }
            }

            for dependency in repeated {
                issues.push(
                    Issue::new(
                        Severity::Warning,
                        IssueCategory::Dependency,
                        dependency,
                        format!(
                            "Module '{}' declares dependency '{dependency}' more than once",
                            module.name
                        ),
                    )
                    .with_modules([module.name.as_str()]),
                );
            }
        }

        debug!("Dependency resolution produced {} issue(s)", issues.len());
        issues
    }

    /// Returns each module's distinct dependencies that resolve, for
    /// logging the module graph.
    #[must_use]
    pub fn resolved_dependencies(&self) -> BTreeMap<&'a str, Vec<&'a str>> {
        self.set
            .modules
            .iter()
            .map(|module| {
                let mut deps: Vec<&str> = module
                    .dependencies
                    .iter()
                    .map(String::as_str)
                    .filter(|dep| self.is_known(dep))
                    .collect();
                deps.sort_unstable();
                deps.dedup();
                (module.name.as_str(), deps)
            })
            .collect()
    }
}
