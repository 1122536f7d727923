//! Core types, configuration, and errors for manifest-forge.
//!
//! This crate provides the foundational types shared by every stage of the
//! manifest pipeline: discovery, parsing, validation, and emission.
//!
//! # Architecture
//!
//! The core consists of:
//! - Typed manifest records (`ManifestRecord`, `DriverRecord`) validated at
//!   the parse boundary
//! - Consistency issues with severities and categories (`Issue`)
//! - The fixed identifier transform used for generated constants
//! - Error hierarchy with contextual information
//! - Configuration loaded from `forge.toml`
//! - CLI value types (`OutputFormat`, `ExitCode`)

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod issue;
mod types;

pub mod cli;
pub mod identifier;

pub use config::{
    CONFIG_FILE_NAME, ForgeConfig, GenerationConfig, PathsConfig, ResolvedPaths,
};
pub use error::{Error, Result};
pub use issue::{Issue, IssueCategory, Severity};
pub use types::{
    AccessLevel, ApiBinding, ContractSection, DriverRecord, EventSpec, ManifestKind,
    ManifestRecord, ModuleType, PayloadField, Priority, StateSpec,
};

/// Platform services every module may depend on without a manifest.
///
/// Dependencies naming one of these are satisfied even though no module
/// manifest declares them.
pub const BUILTIN_SERVICES: [&str; 4] = ["HAL", "SharedStateStore", "EventBus", "ConfigManager"];

/// Name of the generator, written into every provenance header.
pub const GENERATOR_NAME: &str = "manifest-forge";
