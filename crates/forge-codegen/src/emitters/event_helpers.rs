//! `generated_event_helpers.h`: typed publish/subscribe wrappers.
//!
//! Parameter types come only from each payload field's declared `type`;
//! fields are emitted in field-name order.

use forge_core::Result;
use forge_core::identifier::{camel_case, constant_name, pascal_case};
use serde::Serialize;

use crate::common::cpp::{CppType, comment_text, escape_c_string};
use crate::common::types::{GeneratedFile, OutputTarget};
use crate::emitter::{EmitContext, Emitter};

/// Output file name.
pub const EVENT_HELPERS_FILE: &str = "generated_event_helpers.h";

#[derive(Debug, Serialize)]
struct FieldHelper {
    name: String,
    param: String,
    doc: String,
    value_type: &'static str,
    default_value: &'static str,
}

#[derive(Debug, Serialize)]
struct EventHelper {
    constant: String,
    summary: String,
    publish_fn: String,
    subscribe_fn: String,
    params: String,
    args: String,
    fields: Vec<FieldHelper>,
}

#[derive(Debug, Serialize)]
struct HelpersContext<'a> {
    generator: &'static str,
    namespace: &'a str,
    events: Vec<EventHelper>,
}

/// Emits `GeneratedEventPublisher` and `GeneratedEventSubscriber`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventHelperEmitter;

impl EventHelperEmitter {
    fn helper(ctx: &EmitContext<'_>, event: &str) -> EventHelper {
        let spec = ctx.event_spec(event);
        let mut fields = Vec::new();
        let mut params = Vec::new();
        let mut args = Vec::new();

        for (name, field) in spec.into_iter().flat_map(|s| &s.payload) {
            let cpp = CppType::for_payload(&field.field_type);
            let param = camel_case(name);
            params.push(format!("{} {param}", cpp.param));
            args.push(param.clone());
            fields.push(FieldHelper {
                name: escape_c_string(name),
                doc: comment_text(&field.description),
                param,
                value_type: cpp.value,
                default_value: cpp.default,
            });
        }

        let summary = spec
            .map(|s| s.description.as_str())
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(event);
        let pascal = pascal_case(event);

        EventHelper {
            constant: constant_name(event),
            summary: comment_text(summary),
            publish_fn: format!("publish{pascal}"),
            subscribe_fn: format!("on{pascal}"),
            params: params.join(", "),
            args: args.join(", "),
            fields,
        }
    }
}

impl Emitter for EventHelperEmitter {
    fn name(&self) -> &'static str {
        "event_helpers"
    }

    fn emit(&self, ctx: &EmitContext<'_>) -> Result<GeneratedFile> {
        let events = ctx
            .index()
            .event_publishers()
            .keys()
            .map(|event| Self::helper(ctx, event))
            .collect();

        let content = ctx.render(
            "event_helpers",
            &HelpersContext {
                generator: ctx.generator(),
                namespace: ctx.namespace(),
                events,
            },
        )?;
        Ok(GeneratedFile::new(
            OutputTarget::Output,
            EVENT_HELPERS_FILE,
            content,
        ))
    }
}
