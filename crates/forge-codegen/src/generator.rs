//! Runs every registered emitter over one validated model.
//!
//! # Examples
//!
//! ```
//! use forge_codegen::CodeGenerator;
//! use forge_core::{ForgeConfig, ManifestRecord};
//! use forge_manifest::{ContractIndex, ManifestSet};
//!
//! let set = ManifestSet::new(vec![ManifestRecord::new("Sensors")], vec![], vec![]);
//! let index = ContractIndex::build(&set.modules, &set.drivers);
//!
//! let generator = CodeGenerator::new().unwrap();
//! let code = generator.generate(&index, &set, &ForgeConfig::default()).unwrap();
//! assert_eq!(code.file_count(), generator.emitter_names().len());
//! ```

use forge_core::{ForgeConfig, Result};
use forge_manifest::{ContractIndex, ManifestSet};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::common::types::{GeneratedCode, GeneratedFile};
use crate::emitter::{EmitContext, Emitter};
use crate::emitters::{
    ApiRegistryEmitter, ComponentFactoryEmitter, EventHelperEmitter, EventsDocEmitter,
    ModuleInfoEmitter, ReadmeEmitter, StatesDocEmitter, SystemContractEmitter,
    UiRegistryEmitter,
};
use crate::template_engine::TemplateEngine;

/// Artifact generator.
///
/// Holds the template engine and the emitter list. Output order follows
/// emitter registration order whether emitters run sequentially or in
/// parallel.
#[derive(Debug)]
pub struct CodeGenerator {
    engine: TemplateEngine,
    emitters: Vec<Box<dyn Emitter>>,
}

impl CodeGenerator {
    /// Creates a generator with every built-in emitter.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateError` if a built-in template fails to
    /// register.
    pub fn new() -> Result<Self> {
        Ok(Self {
            engine: TemplateEngine::new()?,
            emitters: vec![
                Box::new(ApiRegistryEmitter),
                Box::new(ModuleInfoEmitter),
                Box::new(SystemContractEmitter),
                Box::new(UiRegistryEmitter),
                Box::new(ComponentFactoryEmitter),
                Box::new(EventHelperEmitter),
                Box::new(ReadmeEmitter),
                Box::new(EventsDocEmitter),
                Box::new(StatesDocEmitter),
            ],
        })
    }

    /// Names of the registered emitters, in output order.
    #[must_use]
    pub fn emitter_names(&self) -> Vec<&'static str> {
        self.emitters.iter().map(|e| e.name()).collect()
    }

    /// Generates every artifact.
    ///
    /// Emitters share one read-only [`EmitContext`]; with
    /// `generation.parallel` they run on the rayon pool.
    ///
    /// # Errors
    ///
    /// Returns the first emitter error.
    pub fn generate(
        &self,
        index: &ContractIndex,
        set: &ManifestSet,
        config: &ForgeConfig,
    ) -> Result<GeneratedCode> {
        let ctx = EmitContext::new(index, set, config, &self.engine);
        let emit = |emitter: &dyn Emitter| -> Result<GeneratedFile> {
            let file = emitter.emit(&ctx)?;
            debug!(
                "Emitter {} produced {}/{} ({} bytes)",
                emitter.name(),
                file.target,
                file.path,
                file.content.len()
            );
            Ok(file)
        };

        let files: Vec<GeneratedFile> = if config.generation.parallel {
            self.emitters
                .par_iter()
                .map(|e| emit(e.as_ref()))
                .collect::<Result<_>>()?
        } else {
            self.emitters
                .iter()
                .map(|e| emit(e.as_ref()))
                .collect::<Result<_>>()?
        };

        info!("Generated {} artifact(s)", files.len());
        Ok(GeneratedCode { files })
    }
}
