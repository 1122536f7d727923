//! `generated_system_contract.h`: event and state-key constants.

use forge_core::Result;
use forge_core::identifier::constant_name;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::common::cpp::escape_c_string;
use crate::common::types::{GeneratedFile, OutputTarget};
use crate::emitter::{EmitContext, Emitter};

/// Output file name.
pub const SYSTEM_CONTRACT_FILE: &str = "generated_system_contract.h";

#[derive(Debug, Serialize)]
struct Constant {
    constant: String,
    literal: String,
}

#[derive(Debug, Serialize)]
struct ContractContext<'a> {
    generator: &'static str,
    namespace: &'a str,
    docs_dir: String,
    events: Vec<Constant>,
    states: Vec<Constant>,
}

fn constants(keys: BTreeSet<&str>) -> Vec<Constant> {
    keys.into_iter()
        .map(|key| Constant {
            constant: constant_name(key),
            literal: escape_c_string(key),
        })
        .collect()
}

/// Emits one `constexpr` string per distinct event and state key, sorted
/// by key, grouped into `Events` and `States` namespaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemContractEmitter;

impl Emitter for SystemContractEmitter {
    fn name(&self) -> &'static str {
        "system_contract"
    }

    fn emit(&self, ctx: &EmitContext<'_>) -> Result<GeneratedFile> {
        let index = ctx.index();
        let content = ctx.render(
            "system_contract",
            &ContractContext {
                generator: ctx.generator(),
                namespace: ctx.namespace(),
                docs_dir: ctx.docs_dir(),
                events: constants(index.events()),
                states: constants(index.states()),
            },
        )?;
        Ok(GeneratedFile::new(
            OutputTarget::Constants,
            SYSTEM_CONTRACT_FILE,
            content,
        ))
    }
}
