//! Adaptive UI artifacts: the component registry header and the lazy
//! factory registrations.
//!
//! Components come from MANAGER modules (`ui.adaptive.components`) and
//! from drivers (`ui_extensions.components`). Each is tagged with its
//! source and the list is ordered by source name, then declaration order.

use forge_core::Result;
use forge_manifest::ManifestSet;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::common::cpp::{comment_text, component_class, enumerator, escape_c_string};
use crate::common::types::{GeneratedFile, OutputTarget};
use crate::emitter::{EmitContext, Emitter};

/// Registry header file name.
pub const UI_COMPONENTS_FILE: &str = "generated_ui_components.h";

/// Factory source file name.
pub const COMPONENT_FACTORIES_FILE: &str = "generated_component_factories.cpp";

/// One adaptive UI component with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiComponent {
    /// Component id
    pub id: String,
    /// Declared type (`text`, `slider`, ...)
    pub component_type: String,
    /// Display label, the id when absent
    pub label: String,
    /// Visibility condition
    pub condition: String,
    /// Minimum access level
    pub access_level: String,
    /// Render priority
    pub priority: String,
    /// Whether the component may be created on first use
    pub lazy_load: bool,
    /// Module or driver the component comes from
    pub source: String,
}

impl UiComponent {
    fn from_value(value: &Value, source: &str) -> Option<Self> {
        let text = |key: &str, default: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or(default)
                .to_string()
        };

        let Some(id) = value.get("id").and_then(Value::as_str) else {
            warn!("Skipping UI component without an id from {source}");
            return None;
        };

        Some(Self {
            id: id.to_string(),
            component_type: text("type", "text"),
            label: text("label", id),
            condition: text("condition", "always"),
            access_level: text("access_level", "user"),
            priority: text("priority", "medium"),
            lazy_load: value.get("lazy_load").and_then(Value::as_bool).unwrap_or(true),
            source: source.to_string(),
        })
    }
}

/// Collects every UI component, ordered by source name then declaration
/// order.
#[must_use]
pub fn collect_components(set: &ManifestSet) -> Vec<UiComponent> {
    let module_sources = set
        .modules
        .iter()
        .map(|m| (m.name.as_str(), m.adaptive_components()));
    let driver_sources = set
        .drivers
        .iter()
        .map(|d| (d.name.as_str(), d.ui_components()));

    let mut components: Vec<UiComponent> = module_sources
        .chain(driver_sources)
        .flat_map(|(source, values)| {
            values
                .iter()
                .filter_map(move |value| UiComponent::from_value(value, source))
        })
        .collect();
    components.sort_by(|a, b| a.source.cmp(&b.source));
    components
}

#[derive(Debug, Serialize)]
struct RegistryEntry {
    id: String,
    component_type: String,
    condition: String,
    access_level: String,
    priority: String,
    lazy_load: bool,
    source: String,
}

#[derive(Debug, Serialize)]
struct FactoryEntry {
    comment: String,
    id: String,
    label: String,
    component_class: &'static str,
}

#[derive(Debug, Serialize)]
struct UiContext<'a, T> {
    generator: &'static str,
    namespace: &'a str,
    components: Vec<T>,
    count: usize,
}

/// Emits `ALL_COMPONENTS`, the constexpr component metadata table.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiRegistryEmitter;

impl Emitter for UiRegistryEmitter {
    fn name(&self) -> &'static str {
        "ui_components"
    }

    fn emit(&self, ctx: &EmitContext<'_>) -> Result<GeneratedFile> {
        let components: Vec<RegistryEntry> = collect_components(ctx.set())
            .into_iter()
            .map(|c| RegistryEntry {
                id: escape_c_string(&c.id),
                component_type: enumerator(&c.component_type, "TEXT"),
                condition: escape_c_string(&c.condition),
                access_level: enumerator(&c.access_level, "USER"),
                priority: enumerator(&c.priority, "MEDIUM"),
                lazy_load: c.lazy_load,
                source: escape_c_string(&c.source),
            })
            .collect();

        let count = components.len();
        let content = ctx.render(
            "ui_components",
            &UiContext {
                generator: ctx.generator(),
                namespace: ctx.namespace(),
                components,
                count,
            },
        )?;
        Ok(GeneratedFile::new(
            OutputTarget::Output,
            UI_COMPONENTS_FILE,
            content,
        ))
    }
}

/// Emits one `registerComponentFactory` call per component.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentFactoryEmitter;

impl Emitter for ComponentFactoryEmitter {
    fn name(&self) -> &'static str {
        "component_factories"
    }

    fn emit(&self, ctx: &EmitContext<'_>) -> Result<GeneratedFile> {
        let components: Vec<FactoryEntry> = collect_components(ctx.set())
            .into_iter()
            .map(|c| FactoryEntry {
                comment: comment_text(&format!("{} from {}", c.id, c.source)),
                id: escape_c_string(&c.id),
                label: escape_c_string(&c.label),
                component_class: component_class(&c.component_type),
            })
            .collect();

        let count = components.len();
        let content = ctx.render(
            "component_factories",
            &UiContext {
                generator: ctx.generator(),
                namespace: ctx.namespace(),
                components,
                count,
            },
        )?;
        Ok(GeneratedFile::new(
            OutputTarget::Output,
            COMPONENT_FACTORIES_FILE,
            content,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::{DriverRecord, ManifestRecord, ModuleType};
    use serde_json::json;

    fn manager(name: &str, components: Value) -> ManifestRecord {
        let mut record = ManifestRecord::new(name);
        record.module_type = ModuleType::Manager;
        record.ui = json!({"adaptive": {"components": components}});
        record
    }

    #[test]
    fn test_defaults_applied() {
        let set = ManifestSet::new(
            vec![manager("Climate", json!([{"id": "setpoint", "type": "slider"}]))],
            vec![],
            vec![],
        );
        let components = collect_components(&set);
        assert_eq!(
            components,
            vec![UiComponent {
                id: "setpoint".into(),
                component_type: "slider".into(),
                label: "setpoint".into(),
                condition: "always".into(),
                access_level: "user".into(),
                priority: "medium".into(),
                lazy_load: true,
                source: "Climate".into(),
            }]
        );
    }

    #[test]
    fn test_only_managers_and_drivers_contribute() {
        let mut standard = ManifestRecord::new("Plain");
        standard.ui = json!({"adaptive": {"components": [{"id": "ignored"}]}});

        let mut driver = DriverRecord::new("Ds18b20");
        driver.ui_extensions = json!({"components": [{"id": "probe_offset", "type": "slider"}]});

        let set = ManifestSet::new(
            vec![standard, manager("Sensors", json!([{"id": "sensor_list"}]))],
            vec![driver],
            vec![],
        );
        let sources: Vec<(String, String)> = collect_components(&set)
            .into_iter()
            .map(|c| (c.source, c.id))
            .collect();
        assert_eq!(
            sources,
            vec![
                ("Ds18b20".to_string(), "probe_offset".to_string()),
                ("Sensors".to_string(), "sensor_list".to_string()),
            ]
        );
    }

    #[test]
    fn test_declaration_order_kept_within_source() {
        let set = ManifestSet::new(
            vec![manager(
                "Climate",
                json!([{"id": "z_last"}, {"id": "a_first"}, {"type": "text"}]),
            )],
            vec![],
            vec![],
        );
        let ids: Vec<String> = collect_components(&set).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["z_last", "a_first"]);
    }
}
