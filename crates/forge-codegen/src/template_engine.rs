//! Template engine for artifact generation using Handlebars.
//!
//! Wraps Handlebars with every built-in artifact template registered up
//! front. Strict mode is on, so a context missing a field fails loudly
//! instead of rendering an empty string, and HTML escaping is off: values
//! are escaped for C++ before they reach a template.
//!
//! # Examples
//!
//! ```
//! use forge_codegen::template_engine::TemplateEngine;
//! use serde_json::json;
//!
//! let mut engine = TemplateEngine::new().unwrap();
//! engine.register_template_string("greeting", "// {{name}}").unwrap();
//! let rendered = engine.render("greeting", &json!({"name": "a < b"})).unwrap();
//! assert_eq!(rendered, "// a < b");
//! ```

use forge_core::{Error, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// Built-in templates: registration name and source.
const BUILTIN_TEMPLATES: [(&str, &str); 9] = [
    (
        "api_registry",
        include_str!("../templates/api_registry.cpp.hbs"),
    ),
    ("module_info", include_str!("../templates/module_info.cpp.hbs")),
    (
        "system_contract",
        include_str!("../templates/system_contract.h.hbs"),
    ),
    (
        "ui_components",
        include_str!("../templates/ui_components.h.hbs"),
    ),
    (
        "component_factories",
        include_str!("../templates/component_factories.cpp.hbs"),
    ),
    (
        "event_helpers",
        include_str!("../templates/event_helpers.h.hbs"),
    ),
    ("docs/readme", include_str!("../templates/docs/readme.md.hbs")),
    ("docs/events", include_str!("../templates/docs/events.md.hbs")),
    ("docs/states", include_str!("../templates/docs/states.md.hbs")),
];

/// Template engine for artifact generation.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`; emitters share one engine while
/// rendering in parallel.
#[derive(Debug)]
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Creates a new template engine with every built-in template
    /// registered.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateError` if a built-in template fails to
    /// parse.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        for (name, source) in BUILTIN_TEMPLATES {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| Error::TemplateError {
                    template: name.to_string(),
                    message: format!("failed to register template: {e}"),
                })?;
        }

        Ok(Self { handlebars })
    }

    /// Renders a template with the given context.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateError` if the template is not registered,
    /// the context lacks a referenced field, or rendering fails.
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| Error::TemplateError {
                template: template_name.to_string(),
                message: format!("rendering failed: {e}"),
            })
    }

    /// Registers an additional template.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateError` if the template string is invalid.
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::TemplateError {
                template: name.to_string(),
                message: format!("failed to register template: {e}"),
            })
    }

    /// Returns `true` if a template with this name is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_engine_creation() {
        let engine = TemplateEngine::new().unwrap();
        for (name, _) in BUILTIN_TEMPLATES {
            assert!(engine.has_template(name), "{name} not registered");
        }
    }

    #[test]
    fn test_strict_mode_rejects_missing_field() {
        let mut engine = TemplateEngine::new().unwrap();
        engine
            .register_template_string("strict", "{{present}} {{absent}}")
            .unwrap();

        let err = engine
            .render("strict", &json!({"present": "yes"}))
            .unwrap_err();
        assert!(err.is_template_error());
    }

    #[test]
    fn test_no_html_escaping() {
        let mut engine = TemplateEngine::new().unwrap();
        engine
            .register_template_string("raw", "{{value}}")
            .unwrap();
        let rendered = engine
            .render("raw", &json!({"value": "const std::string& <T> \"q\""}))
            .unwrap();
        assert_eq!(rendered, "const std::string& <T> \"q\"");
    }

    #[test]
    fn test_unknown_template() {
        let engine = TemplateEngine::new().unwrap();
        let err = engine.render("does_not_exist", &json!({})).unwrap_err();
        assert!(err.to_string().contains("does_not_exist"));
    }

    #[test]
    fn test_invalid_template_string() {
        let mut engine = TemplateEngine::new().unwrap();
        let result = engine.register_template_string("broken", "{{#each items}}");
        assert!(result.is_err());
    }
}
