//! Contract documentation: an overview plus one reference document each
//! for events and state keys.

use forge_core::Result;
use forge_core::identifier::constant_name;
use forge_manifest::ModuleTable;
use serde::Serialize;

use crate::common::types::{GeneratedFile, OutputTarget};
use crate::emitter::{EmitContext, Emitter};

/// Overview file name.
pub const README_FILE: &str = "README.md";

/// Event reference file name.
pub const EVENTS_DOC_FILE: &str = "events.md";

/// State-key reference file name.
pub const STATES_DOC_FILE: &str = "states.md";

fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn table_cell(value: &str) -> String {
    single_line(value).replace('|', "\\|")
}

fn module_list(table: &ModuleTable, key: &str) -> String {
    match table.get(key) {
        Some(modules) if !modules.is_empty() => modules
            .iter()
            .map(|m| format!("`{m}`"))
            .collect::<Vec<_>>()
            .join(", "),
        _ => "_none_".to_string(),
    }
}

#[derive(Debug, Serialize)]
struct ModuleSummary {
    name: String,
    module_type: String,
    version: String,
    description: String,
}

#[derive(Debug, Serialize)]
struct ReadmeContext<'a> {
    generator: &'static str,
    namespace: &'a str,
    has_event_example: bool,
    event_example: String,
    has_state_example: bool,
    state_example: String,
    modules: Vec<ModuleSummary>,
    module_count: usize,
    driver_count: usize,
    event_count: usize,
    state_count: usize,
}

/// Emits `README.md`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadmeEmitter;

impl Emitter for ReadmeEmitter {
    fn name(&self) -> &'static str {
        "docs_readme"
    }

    fn emit(&self, ctx: &EmitContext<'_>) -> Result<GeneratedFile> {
        let index = ctx.index();
        let set = ctx.set();
        let events = index.events();
        let states = index.states();

        let event_example = index
            .event_publishers()
            .keys()
            .next()
            .map(|e| constant_name(e));
        let state_example = index
            .state_publishers()
            .keys()
            .next()
            .map(|k| constant_name(k));

        let context = ReadmeContext {
            generator: ctx.generator(),
            namespace: ctx.namespace(),
            has_event_example: event_example.is_some(),
            event_example: event_example.unwrap_or_default(),
            has_state_example: state_example.is_some(),
            state_example: state_example.unwrap_or_default(),
            modules: set
                .modules
                .iter()
                .map(|m| ModuleSummary {
                    name: table_cell(&m.name),
                    module_type: m.module_type.as_str().to_string(),
                    version: table_cell(&m.version),
                    description: table_cell(&m.description),
                })
                .collect(),
            module_count: set.modules.len(),
            driver_count: set.drivers.len(),
            event_count: events.len(),
            state_count: states.len(),
        };

        let content = ctx.render("docs/readme", &context)?;
        Ok(GeneratedFile::new(OutputTarget::Docs, README_FILE, content))
    }
}

#[derive(Debug, Serialize)]
struct PayloadDoc {
    name: String,
    field_type: String,
    description: String,
}

#[derive(Debug, Serialize)]
struct EventDoc {
    name: String,
    constant: String,
    has_description: bool,
    description: String,
    publishers: String,
    subscribers: String,
    has_payload: bool,
    payload: Vec<PayloadDoc>,
}

#[derive(Debug, Serialize)]
struct EventsContext<'a> {
    generator: &'static str,
    namespace: &'a str,
    events: Vec<EventDoc>,
}

/// Emits `events.md`, one section per event in name order.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventsDocEmitter;

impl Emitter for EventsDocEmitter {
    fn name(&self) -> &'static str {
        "docs_events"
    }

    fn emit(&self, ctx: &EmitContext<'_>) -> Result<GeneratedFile> {
        let index = ctx.index();
        let events = index
            .events()
            .into_iter()
            .map(|event| {
                let spec = ctx.event_spec(event);
                let description = spec.map_or_else(String::new, |s| single_line(&s.description));
                let payload: Vec<PayloadDoc> = spec
                    .into_iter()
                    .flat_map(|s| &s.payload)
                    .map(|(name, field)| PayloadDoc {
                        name: name.clone(),
                        field_type: if field.field_type.is_empty() {
                            "unknown".to_string()
                        } else {
                            field.field_type.clone()
                        },
                        description: single_line(&field.description),
                    })
                    .collect();

                EventDoc {
                    name: event.to_string(),
                    constant: constant_name(event),
                    has_description: !description.is_empty(),
                    description,
                    publishers: module_list(index.event_publishers(), event),
                    subscribers: module_list(index.event_subscribers(), event),
                    has_payload: !payload.is_empty(),
                    payload,
                }
            })
            .collect();

        let content = ctx.render(
            "docs/events",
            &EventsContext {
                generator: ctx.generator(),
                namespace: ctx.namespace(),
                events,
            },
        )?;
        Ok(GeneratedFile::new(
            OutputTarget::Docs,
            EVENTS_DOC_FILE,
            content,
        ))
    }
}

#[derive(Debug, Serialize)]
struct StateDoc {
    key: String,
    constant: String,
    value_type: String,
    has_description: bool,
    description: String,
    has_update_rate: bool,
    update_rate_ms: u64,
    writers: String,
    readers: String,
    example: String,
}

#[derive(Debug, Serialize)]
struct StatesContext<'a> {
    generator: &'static str,
    namespace: &'a str,
    states: Vec<StateDoc>,
}

fn state_example(value_type: &str, constant: &str) -> String {
    match value_type {
        "float" | "number" => {
            format!("float value = SharedState::get<float>(States::{constant});")
        }
        "boolean" | "bool" => format!("bool value = SharedState::get<bool>(States::{constant});"),
        _ => format!("auto value = SharedState::get(States::{constant});"),
    }
}

/// Emits `states.md`, one section per state key in name order.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatesDocEmitter;

impl Emitter for StatesDocEmitter {
    fn name(&self) -> &'static str {
        "docs_states"
    }

    fn emit(&self, ctx: &EmitContext<'_>) -> Result<GeneratedFile> {
        let index = ctx.index();
        let states = index
            .states()
            .into_iter()
            .map(|key| {
                let spec = ctx.state_spec(key);
                let value_type = spec
                    .map(|s| s.value_type.trim())
                    .filter(|t| !t.is_empty())
                    .unwrap_or("unknown")
                    .to_string();
                let description = spec.map_or_else(String::new, |s| single_line(&s.description));
                let update_rate = spec.and_then(|s| s.update_rate_ms);
                let constant = constant_name(key);

                StateDoc {
                    key: key.to_string(),
                    example: state_example(&value_type, &constant),
                    constant,
                    value_type,
                    has_description: !description.is_empty(),
                    description,
                    has_update_rate: update_rate.is_some(),
                    update_rate_ms: update_rate.unwrap_or_default(),
                    writers: module_list(index.state_publishers(), key),
                    readers: module_list(index.state_subscribers(), key),
                }
            })
            .collect();

        let content = ctx.render(
            "docs/states",
            &StatesContext {
                generator: ctx.generator(),
                namespace: ctx.namespace(),
                states,
            },
        )?;
        Ok(GeneratedFile::new(
            OutputTarget::Docs,
            STATES_DOC_FILE,
            content,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_cell_escapes_pipes() {
        assert_eq!(table_cell("a | b\nc"), "a \\| b c");
    }

    #[test]
    fn test_state_example_by_type() {
        assert_eq!(
            state_example("number", "TEMP_EVAP"),
            "float value = SharedState::get<float>(States::TEMP_EVAP);"
        );
        assert_eq!(
            state_example("bool", "DOOR_OPEN"),
            "bool value = SharedState::get<bool>(States::DOOR_OPEN);"
        );
        assert_eq!(
            state_example("string", "CLIMATE_MODE"),
            "auto value = SharedState::get(States::CLIMATE_MODE);"
        );
    }
}
