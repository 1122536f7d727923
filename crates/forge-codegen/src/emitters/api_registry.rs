//! `generated_api_registry.cpp`: one `register_method` call per RPC method.

use forge_core::{ManifestKind, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::common::cpp::{comment_text, enumerator, escape_c_string};
use crate::common::types::{GeneratedFile, OutputTarget};
use crate::emitter::{EmitContext, Emitter};

/// Output file name.
pub const API_REGISTRY_FILE: &str = "generated_api_registry.cpp";

#[derive(Debug, Serialize)]
struct ApiLine {
    method: String,
    handler: String,
    access_level: String,
}

#[derive(Debug, Serialize)]
struct OwnerGroup {
    owner: String,
    apis: Vec<ApiLine>,
}

#[derive(Debug, Serialize)]
struct RegistryContext<'a> {
    generator: &'static str,
    namespace: &'a str,
    owners: Vec<OwnerGroup>,
}

/// Emits the RPC registration function, grouped by owner in name order
/// and sorted by method within each owner.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiRegistryEmitter;

impl Emitter for ApiRegistryEmitter {
    fn name(&self) -> &'static str {
        "api_registry"
    }

    fn emit(&self, ctx: &EmitContext<'_>) -> Result<GeneratedFile> {
        let mut groups: BTreeMap<String, Vec<ApiLine>> = BTreeMap::new();
        for (method, owners) in ctx.index().api_owners() {
            for owner in owners {
                let label = match owner.kind {
                    ManifestKind::Module => owner.owner.clone(),
                    ManifestKind::Driver => format!("{} (driver)", owner.owner),
                };
                groups.entry(label).or_default().push(ApiLine {
                    method: escape_c_string(method),
                    handler: owner.handler.clone(),
                    access_level: enumerator(owner.access_level.as_str(), "USER"),
                });
            }
        }

        let owners: Vec<OwnerGroup> = groups
            .into_iter()
            .map(|(owner, apis)| OwnerGroup {
                owner: comment_text(&owner),
                apis,
            })
            .collect();
        debug!("API registry covers {} owner(s)", owners.len());

        let content = ctx.render(
            "api_registry",
            &RegistryContext {
                generator: ctx.generator(),
                namespace: ctx.namespace(),
                owners,
            },
        )?;
        Ok(GeneratedFile::new(
            OutputTarget::Output,
            API_REGISTRY_FILE,
            content,
        ))
    }
}
