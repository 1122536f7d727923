//! Consistency validator and its outcome.

use forge_core::{Issue, IssueCategory, Severity};
use forge_manifest::{ContractIndex, ManifestSet};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::resolver::DependencyResolver;
use crate::rules;

/// Runs every consistency rule over an index and its manifest set.
#[derive(Debug, Clone, Copy)]
pub struct ConsistencyValidator<'a> {
    index: &'a ContractIndex,
    set: &'a ManifestSet,
}

impl<'a> ConsistencyValidator<'a> {
    /// Creates a validator borrowing the run's index and records.
    #[must_use]
    pub const fn new(index: &'a ContractIndex, set: &'a ManifestSet) -> Self {
        Self { index, set }
    }

    /// Validates cross-module consistency.
    ///
    /// Rules run in a fixed order (naming, events, states, APIs,
    /// dependencies) and the combined list is stably sorted by severity,
    /// so issues of equal severity keep that discovery order.
    #[must_use]
    pub fn validate(&self) -> ValidationOutcome {
        let mut issues = rules::check_naming(self.index, self.set);
        issues.extend(rules::check_events(self.index));
        issues.extend(rules::check_states(self.index));
        issues.extend(rules::check_apis(self.index));
        issues.extend(DependencyResolver::new(self.set).resolve());

        let outcome = ValidationOutcome::from_issues(issues);
        for issue in outcome.issues() {
            match issue.severity {
                Severity::Error => error!("{issue}"),
                Severity::Warning => warn!("{issue}"),
                Severity::Info => info!("{issue}"),
            }
        }
        info!(
            "Validation finished: {} error(s), {} warning(s), {} info",
            outcome.count(Severity::Error),
            outcome.count(Severity::Warning),
            outcome.count(Severity::Info)
        );
        outcome
    }
}

/// Severity-sorted issues plus the verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    issues: Vec<Issue>,
    has_fatal_errors: bool,
}

impl ValidationOutcome {
    /// Sorts issues by severity rank, keeping discovery order within a
    /// severity.
    #[must_use]
    pub fn from_issues(mut issues: Vec<Issue>) -> Self {
        issues.sort_by_key(|issue| issue.severity.rank());
        let has_fatal_errors = issues.iter().any(Issue::is_fatal);
        Self {
            issues,
            has_fatal_errors,
        }
    }

    /// All issues, errors first.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Returns `true` if at least one ERROR was found.
    #[must_use]
    pub const fn has_fatal_errors(&self) -> bool {
        self.has_fatal_errors
    }

    /// Returns `true` if nothing at all was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of issues with the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Issues of one category, in outcome order.
    pub fn in_category(&self, category: IssueCategory) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::{EventSpec, ManifestRecord, StateSpec};

    fn run(modules: Vec<ManifestRecord>) -> ValidationOutcome {
        let set = ManifestSet::new(modules, vec![], vec![]);
        let index = ContractIndex::build(&set.modules, &set.drivers);
        ConsistencyValidator::new(&index, &set).validate()
    }

    #[test]
    fn test_clean_scenario() {
        let mut sensors = ManifestRecord::new("Sensors");
        sensors
            .events
            .publishes
            .insert("sensor.updated".into(), EventSpec::default());
        sensors
            .shared_state
            .publishes
            .insert("temp.evap".into(), StateSpec::default());

        let mut display = ManifestRecord::new("Display");
        display.dependencies = vec!["Sensors".into(), "EventBus".into()];
        display
            .events
            .subscribes
            .insert("sensor.updated".into(), EventSpec::default());
        display
            .shared_state
            .subscribes
            .insert("temp.evap".into(), StateSpec::default());

        let outcome = run(vec![sensors, display]);
        assert!(outcome.is_clean());
        assert!(!outcome.has_fatal_errors());
    }

    #[test]
    fn test_sorted_by_severity_with_stable_order() {
        let mut a = ManifestRecord::new("A");
        a.events
            .publishes
            .insert("orphan.event".into(), EventSpec::default());
        a.dependencies = vec!["Ghost".into()];
        let mut b = ManifestRecord::new("B");
        b.events
            .subscribes
            .insert("missing.event".into(), EventSpec::default());

        let outcome = run(vec![a, b]);
        let summary: Vec<(Severity, IssueCategory)> = outcome
            .issues()
            .iter()
            .map(|i| (i.severity, i.category))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Severity::Error, IssueCategory::Event),
                (Severity::Error, IssueCategory::Dependency),
                (Severity::Warning, IssueCategory::Event),
            ]
        );
        assert!(outcome.has_fatal_errors());
        assert_eq!(outcome.count(Severity::Error), 2);
        assert_eq!(outcome.in_category(IssueCategory::Event).count(), 2);
    }

    #[test]
    fn test_warnings_alone_are_not_fatal() {
        let mut a = ManifestRecord::new("A");
        a.shared_state
            .publishes
            .insert("unused.key".into(), StateSpec::default());
        let outcome = run(vec![a]);
        assert_eq!(outcome.issues().len(), 1);
        assert!(!outcome.has_fatal_errors());
    }

    #[test]
    fn test_input_order_does_not_change_outcome() {
        let build = |reverse: bool| {
            let mut modules: Vec<ManifestRecord> = ["M1", "M2", "M3"]
                .iter()
                .map(|name| {
                    let mut m = ManifestRecord::new(*name);
                    m.events
                        .subscribes
                        .insert(format!("{}.in", name.to_lowercase()), EventSpec::default());
                    m.dependencies = vec![format!("{name}Missing")];
                    m
                })
                .collect();
            if reverse {
                modules.reverse();
            }
            run(modules)
        };
        assert_eq!(build(false), build(true));
    }
}
