//! Deterministic artifact generation for manifest-forge.
//!
//! Turns a validated [`ContractIndex`](forge_manifest::ContractIndex) and
//! its [`ManifestSet`](forge_manifest::ManifestSet) into C++ sources,
//! headers and Markdown documentation using Handlebars templates.
//!
//! Output depends only on the input model: identifiers are sorted by
//! source key, headers carry no timestamp, and strings embedded in C++
//! literals are escaped. Two runs over the same manifests produce
//! byte-identical artifacts.
//!
//! # Artifacts
//!
//! | Emitter | File | Target |
//! |---|---|---|
//! | [`ApiRegistryEmitter`] | `generated_api_registry.cpp` | output |
//! | [`ModuleInfoEmitter`] | `generated_module_info.cpp` | output |
//! | [`SystemContractEmitter`] | `generated_system_contract.h` | constants |
//! | [`UiRegistryEmitter`] | `generated_ui_components.h` | output |
//! | [`ComponentFactoryEmitter`] | `generated_component_factories.cpp` | output |
//! | [`EventHelperEmitter`] | `generated_event_helpers.h` | output |
//! | [`ReadmeEmitter`] | `README.md` | docs |
//! | [`EventsDocEmitter`] | `events.md` | docs |
//! | [`StatesDocEmitter`] | `states.md` | docs |

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod common;
pub mod emitter;
pub mod emitters;
pub mod generator;
pub mod template_engine;

pub use common::types::{GeneratedCode, GeneratedFile, OutputTarget};
pub use emitter::{EmitContext, Emitter};
pub use emitters::{
    ApiRegistryEmitter, ComponentFactoryEmitter, EventHelperEmitter, EventsDocEmitter,
    ModuleInfoEmitter, ReadmeEmitter, StatesDocEmitter, SystemContractEmitter,
    UiRegistryEmitter,
};
pub use generator::CodeGenerator;
pub use template_engine::TemplateEngine;
