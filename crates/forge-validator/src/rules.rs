//! Individual consistency rules.
//!
//! Each rule visits its keys in lexicographic order so that the issue list
//! is reproducible.

use forge_core::identifier::{
    camel_case, constant_name, is_cpp_keyword, is_valid_identifier, pascal_case,
};
use forge_core::{Issue, IssueCategory, Severity};
use forge_manifest::{ContractIndex, ManifestSet, ModuleTable};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

fn quoted(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Duplicate module names and collisions among generated identifiers:
/// contract constants, typed helper names and UI component ids.
pub fn check_naming(index: &ContractIndex, set: &ManifestSet) -> Vec<Issue> {
    let mut issues = Vec::new();

    let mut by_name: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for module in &set.modules {
        by_name
            .entry(module.name.as_str())
            .or_default()
            .push(module.source_path.display().to_string());
    }
    for (name, paths) in by_name.into_iter().filter(|(_, paths)| paths.len() > 1) {
        issues.push(
            Issue::new(
                Severity::Error,
                IssueCategory::Naming,
                name,
                format!(
                    "Module name '{name}' is declared by multiple manifests: {}",
                    paths.join(", ")
                ),
            )
            .with_modules([name]),
        );
    }

    issues.extend(check_identifiers(
        "Event",
        "Events",
        &index.events(),
        &[index.event_publishers(), index.event_subscribers()],
    ));
    issues.extend(check_identifiers(
        "State",
        "States",
        &index.states(),
        &[index.state_publishers(), index.state_subscribers()],
    ));
    issues.extend(check_helper_names(index, set));
    issues.extend(check_ui_components(set));

    issues
}

fn check_identifiers(
    label: &str,
    namespace: &str,
    keys: &BTreeSet<&str>,
    tables: &[&ModuleTable],
) -> Vec<Issue> {
    let involved = |key: &str| -> Vec<String> {
        tables
            .iter()
            .filter_map(|table| table.get(key))
            .flatten()
            .cloned()
            .collect()
    };

    let mut issues = Vec::new();
    let mut by_constant: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for &key in keys {
        by_constant.entry(constant_name(key)).or_default().push(key);
    }

    for (constant, sources) in &by_constant {
        if !is_valid_identifier(constant) {
            for key in sources {
                issues.push(
                    Issue::new(
                        Severity::Error,
                        IssueCategory::Naming,
                        *key,
                        format!(
                            "{label} '{key}' maps to '{namespace}::{constant}', which is not a valid C++ identifier"
                        ),
                    )
                    .with_modules(involved(key)),
                );
            }
        }

        if sources.len() > 1 {
            issues.push(
                Issue::new(
                    Severity::Error,
                    IssueCategory::Naming,
                    constant.as_str(),
                    format!(
                        "{label} names {} all map to constant '{namespace}::{constant}'",
                        quoted(sources)
                    ),
                )
                .with_modules(sources.iter().flat_map(|key| involved(key))),
            );
        }
    }

    issues
}

/// Typed helper methods and their parameters.
///
/// Every published event gets `publish<Name>`/`on<Name>` helpers whose
/// parameters are the payload fields in `camelCase`, so two events or two
/// fields that fold to the same name produce a header that cannot compile.
fn check_helper_names(index: &ContractIndex, set: &ManifestSet) -> Vec<Issue> {
    let publishers = index.event_publishers();
    let mut issues = Vec::new();

    let mut by_method: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for event in publishers.keys() {
        by_method
            .entry(pascal_case(event))
            .or_default()
            .push(event.as_str());
    }
    for (method, events) in by_method.iter().filter(|(_, events)| events.len() > 1) {
        issues.push(
            Issue::new(
                Severity::Error,
                IssueCategory::Naming,
                format!("publish{method}"),
                format!(
                    "Events {} all map to helper methods 'publish{method}' and 'on{method}'",
                    quoted(events)
                ),
            )
            .with_modules(
                events
                    .iter()
                    .filter_map(|event| publishers.get(*event))
                    .flatten()
                    .cloned(),
            ),
        );
    }

    for (event, modules) in publishers {
        let Some(spec) = set.event_spec(event) else {
            continue;
        };
        let mut by_param: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for field in spec.payload.keys() {
            by_param
                .entry(camel_case(field))
                .or_default()
                .push(field.as_str());
        }

        for (param, fields) in &by_param {
            if is_cpp_keyword(param) {
                issues.push(
                    Issue::new(
                        Severity::Error,
                        IssueCategory::Naming,
                        event.as_str(),
                        format!(
                            "Payload field {} of event '{event}' maps to parameter '{param}', which is a C++ keyword",
                            quoted(fields)
                        ),
                    )
                    .with_modules(modules.iter().cloned()),
                );
            }
            if fields.len() > 1 {
                issues.push(
                    Issue::new(
                        Severity::Error,
                        IssueCategory::Naming,
                        event.as_str(),
                        format!(
                            "Payload fields {} of event '{event}' all map to parameter '{param}'",
                            quoted(fields)
                        ),
                    )
                    .with_modules(modules.iter().cloned()),
                );
            }
        }
    }

    issues
}

/// UI component ids registered more than once across modules and drivers.
fn check_ui_components(set: &ManifestSet) -> Vec<Issue> {
    let sources = set
        .modules
        .iter()
        .map(|m| (m.name.as_str(), m.adaptive_components()))
        .chain(
            set.drivers
                .iter()
                .map(|d| (d.name.as_str(), d.ui_components())),
        );

    let mut by_id: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (source, components) in sources {
        for id in components
            .iter()
            .filter_map(|component| component.get("id").and_then(Value::as_str))
        {
            by_id.entry(id).or_default().push(source);
        }
    }

    by_id
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(id, sources)| {
            Issue::new(
                Severity::Error,
                IssueCategory::Naming,
                id,
                format!(
                    "UI component id '{id}' is declared {} times (by {})",
                    sources.len(),
                    sources.join(", ")
                ),
            )
            .with_modules(sources)
        })
        .collect()
}

/// Publish/subscribe balance of the event bus.
pub fn check_events(index: &ContractIndex) -> Vec<Issue> {
    let mut issues = Vec::new();
    let publishers = index.event_publishers();
    let subscribers = index.event_subscribers();

    for event in index.events() {
        let published_by = publishers.get(event);
        let subscribed_by = subscribers.get(event);

        match (published_by, subscribed_by) {
            (Some(modules), None) => issues.push(
                Issue::new(
                    Severity::Warning,
                    IssueCategory::Event,
                    event,
                    format!("Event '{event}' is published but has no subscribers"),
                )
                .with_modules(modules.iter().cloned()),
            ),
            (None, Some(modules)) => issues.push(
                Issue::new(
                    Severity::Error,
                    IssueCategory::Event,
                    event,
                    format!("Event '{event}' has subscribers but no publisher"),
                )
                .with_modules(modules.iter().cloned()),
            ),
            _ => {}
        }

        if let Some(publishers) = published_by.filter(|p| p.len() > 1) {
            issues.push(
                Issue::new(
                    Severity::Info,
                    IssueCategory::Event,
                    event,
                    format!("Event '{event}' is published by multiple modules"),
                )
                .with_modules(publishers.iter().cloned()),
            );
        }
    }

    issues
}

/// Writer/reader balance of the shared-state store.
pub fn check_states(index: &ContractIndex) -> Vec<Issue> {
    let mut issues = Vec::new();
    let writers = index.state_publishers();
    let readers = index.state_subscribers();

    for key in index.states() {
        let written_by = writers.get(key);
        let read_by = readers.get(key);

        match (written_by, read_by) {
            (Some(modules), None) => issues.push(
                Issue::new(
                    Severity::Warning,
                    IssueCategory::State,
                    key,
                    format!("State '{key}' is written but never read"),
                )
                .with_modules(modules.iter().cloned()),
            ),
            (None, Some(modules)) => issues.push(
                Issue::new(
                    Severity::Error,
                    IssueCategory::State,
                    key,
                    format!("State '{key}' is read but never written"),
                )
                .with_modules(modules.iter().cloned()),
            ),
            _ => {}
        }

        if let Some(writers) = written_by.filter(|w| w.len() > 1) {
            issues.push(
                Issue::new(
                    Severity::Warning,
                    IssueCategory::State,
                    key,
                    format!("State '{key}' is written by multiple modules (potential conflict)"),
                )
                .with_modules(writers.iter().cloned()),
            );
        }
    }

    issues
}

/// RPC methods registered more than once.
pub fn check_apis(index: &ContractIndex) -> Vec<Issue> {
    index
        .api_owners()
        .iter()
        .filter(|(_, owners)| owners.len() > 1)
        .map(|(method, owners)| {
            let names: Vec<&str> = owners.iter().map(|o| o.owner.as_str()).collect();
            Issue::new(
                Severity::Error,
                IssueCategory::Api,
                method.as_str(),
                format!(
                    "API method '{method}' is registered {} times (by {})",
                    owners.len(),
                    names.join(", ")
                ),
            )
            .with_modules(names)
        })
        .collect()
}
