//! The emitter seam and the read-only view emitters work from.

use forge_core::{EventSpec, ForgeConfig, GENERATOR_NAME, Result, StateSpec};
use forge_manifest::{ContractIndex, ManifestSet};
use serde::Serialize;
use std::fmt;

use crate::common::types::GeneratedFile;
use crate::template_engine::TemplateEngine;

/// A pure generator turning the aggregated model into one artifact.
///
/// Emitters never see each other's output, so they may run in any order
/// or concurrently.
pub trait Emitter: fmt::Debug + Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Renders the artifact.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateError` if rendering fails.
    fn emit(&self, ctx: &EmitContext<'_>) -> Result<GeneratedFile>;
}

/// Everything an emitter may read: the index, the parsed records, the
/// configuration and the shared template engine.
#[derive(Debug, Clone, Copy)]
pub struct EmitContext<'a> {
    index: &'a ContractIndex,
    set: &'a ManifestSet,
    config: &'a ForgeConfig,
    engine: &'a TemplateEngine,
}

impl<'a> EmitContext<'a> {
    /// Creates a context.
    #[must_use]
    pub const fn new(
        index: &'a ContractIndex,
        set: &'a ManifestSet,
        config: &'a ForgeConfig,
        engine: &'a TemplateEngine,
    ) -> Self {
        Self {
            index,
            set,
            config,
            engine,
        }
    }

    /// The cross-module index.
    #[must_use]
    pub const fn index(&self) -> &'a ContractIndex {
        self.index
    }

    /// Parsed modules and drivers, sorted by name.
    #[must_use]
    pub const fn set(&self) -> &'a ManifestSet {
        self.set
    }

    /// C++ namespace wrapping generated code.
    #[must_use]
    pub fn namespace(&self) -> &'a str {
        &self.config.generation.namespace
    }

    /// Documentation directory as configured, with `/` separators.
    #[must_use]
    pub fn docs_dir(&self) -> String {
        self.config
            .paths
            .docs_dir
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// Provenance string written into every artifact header.
    #[must_use]
    pub const fn generator(&self) -> &'static str {
        GENERATOR_NAME
    }

    /// Declaration of an event as emitted.
    #[must_use]
    pub fn event_spec(&self, event: &str) -> Option<&'a EventSpec> {
        self.set.event_spec(event)
    }

    /// Declaration of a state key as emitted.
    #[must_use]
    pub fn state_spec(&self, key: &str) -> Option<&'a StateSpec> {
        self.set.state_spec(key)
    }

    /// Renders a registered template.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateError` if rendering fails.
    pub fn render<T: Serialize>(&self, template: &str, context: &T) -> Result<String> {
        self.engine.render(template, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::ManifestRecord;

    #[test]
    fn test_event_spec_prefers_first_publisher() {
        let mut alpha = ManifestRecord::new("Alpha");
        alpha.events.publishes.insert(
            "sensor.updated".into(),
            EventSpec {
                description: "from alpha".into(),
                ..EventSpec::default()
            },
        );
        let mut beta = ManifestRecord::new("Beta");
        beta.events.publishes.insert(
            "sensor.updated".into(),
            EventSpec {
                description: "from beta".into(),
                ..EventSpec::default()
            },
        );
        let mut reader = ManifestRecord::new("Aardvark");
        reader.events.subscribes.insert(
            "sensor.updated".into(),
            EventSpec {
                description: "from reader".into(),
                ..EventSpec::default()
            },
        );

        let set = ManifestSet::new(vec![beta, reader, alpha], vec![], vec![]);
        let index = ContractIndex::build(&set.modules, &set.drivers);
        let config = ForgeConfig::default();
        let engine = TemplateEngine::new().unwrap();
        let ctx = EmitContext::new(&index, &set, &config, &engine);

        assert_eq!(
            ctx.event_spec("sensor.updated").map(|s| s.description.as_str()),
            Some("from alpha")
        );
        assert!(ctx.event_spec("unknown").is_none());
        assert_eq!(ctx.namespace(), "ModESP");
        assert_eq!(ctx.docs_dir(), "components/system_contract");
    }
}
