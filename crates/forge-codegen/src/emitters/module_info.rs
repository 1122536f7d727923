//! `generated_module_info.cpp`: the module table.

use forge_core::Result;
use serde::Serialize;

use crate::common::cpp::{enumerator, escape_c_string};
use crate::common::types::{GeneratedFile, OutputTarget};
use crate::emitter::{EmitContext, Emitter};

/// Output file name.
pub const MODULE_INFO_FILE: &str = "generated_module_info.cpp";

#[derive(Debug, Serialize)]
struct ModuleRow {
    name: String,
    module_type: String,
    version: String,
    description: String,
    priority: &'static str,
    dependencies: String,
    config_file: String,
}

#[derive(Debug, Serialize)]
struct ModuleInfoContext<'a> {
    generator: &'static str,
    namespace: &'a str,
    modules: Vec<ModuleRow>,
    count: usize,
}

/// Emits one `ModuleInfo` initializer per module, in name order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleInfoEmitter;

impl Emitter for ModuleInfoEmitter {
    fn name(&self) -> &'static str {
        "module_info"
    }

    fn emit(&self, ctx: &EmitContext<'_>) -> Result<GeneratedFile> {
        let modules: Vec<ModuleRow> = ctx
            .set()
            .modules
            .iter()
            .map(|module| {
                let dependencies: Vec<String> = module
                    .dependencies
                    .iter()
                    .map(|dep| format!("\"{}\"", escape_c_string(dep)))
                    .collect();
                ModuleRow {
                    name: escape_c_string(&module.name),
                    module_type: enumerator(module.module_type.as_str(), "STANDARD"),
                    version: escape_c_string(&module.version),
                    description: escape_c_string(&module.description),
                    priority: module.priority.as_str(),
                    dependencies: format!("{{{}}}", dependencies.join(", ")),
                    config_file: module.config_file.as_deref().map_or_else(
                        || "nullptr".to_string(),
                        |path| format!("\"{}\"", escape_c_string(path)),
                    ),
                }
            })
            .collect();

        let count = modules.len();
        let content = ctx.render(
            "module_info",
            &ModuleInfoContext {
                generator: ctx.generator(),
                namespace: ctx.namespace(),
                modules,
                count,
            },
        )?;
        Ok(GeneratedFile::new(
            OutputTarget::Output,
            MODULE_INFO_FILE,
            content,
        ))
    }
}
