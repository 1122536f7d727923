//! Inspect command implementation.
//!
//! Lists the parsed modules and drivers, or shows one module's contract:
//! its RPC methods, events, shared-state keys and dependencies. Inspection
//! parses manifests but neither validates nor writes anything.

use anyhow::{Context, Result, bail};
use forge_core::cli::{ExitCode, OutputFormat};
use forge_core::{DriverRecord, ManifestRecord};
use forge_manifest::ManifestSet;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::cli::ProjectArgs;
use crate::formatters::format_output;
use crate::pipeline::{PipelineOptions, Project};

/// One row of the module listing.
#[derive(Debug, Serialize)]
pub struct ModuleRow {
    /// Module name
    pub name: String,
    /// Upper-case module type
    pub module_type: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
}

/// One row of the driver listing.
#[derive(Debug, Serialize)]
pub struct DriverRow {
    /// Driver name
    pub name: String,
    /// Declared driver type
    pub driver_type: String,
    /// Version string
    pub version: String,
}

/// Everything parsed in the project.
#[derive(Debug, Serialize)]
pub struct Listing {
    /// Modules in name order
    pub modules: Vec<ModuleRow>,
    /// Drivers in name order
    pub drivers: Vec<DriverRow>,
    /// Manifests that failed to parse, as `path: message`
    pub input_errors: Vec<String>,
}

impl From<&ManifestSet> for Listing {
    fn from(set: &ManifestSet) -> Self {
        Self {
            modules: set.modules.iter().map(ModuleRow::from).collect(),
            drivers: set.drivers.iter().map(DriverRow::from).collect(),
            input_errors: set
                .failures
                .iter()
                .map(|f| format!("{}: {}", f.file().display(), f.message()))
                .collect(),
        }
    }
}

impl From<&ManifestRecord> for ModuleRow {
    fn from(record: &ManifestRecord) -> Self {
        Self {
            name: record.name.clone(),
            module_type: record.module_type.as_str().to_string(),
            version: record.version.clone(),
            description: record.description.clone(),
        }
    }
}

impl From<&DriverRecord> for DriverRow {
    fn from(record: &DriverRecord) -> Self {
        Self {
            name: record.name.clone(),
            driver_type: record.driver_type.clone(),
            version: record.version.clone(),
        }
    }
}

/// An RPC method in the detail view.
#[derive(Debug, Serialize)]
pub struct ApiRow {
    /// Method name
    pub method: String,
    /// C++ handler
    pub handler: String,
    /// Required access level
    pub access_level: String,
}

/// A shared-state key in the detail view.
#[derive(Debug, Serialize)]
pub struct StateRow {
    /// Declared value type
    pub value_type: String,
    /// Description
    pub description: String,
    /// Update period in milliseconds
    pub update_rate_ms: Option<u64>,
}

/// One module's full contract.
#[derive(Debug, Serialize)]
pub struct ModuleDetail {
    /// Name, type, version and description
    #[serde(flatten)]
    pub summary: ModuleRow,
    /// Initialization priority
    pub priority: &'static str,
    /// Manifest path relative to the project root
    pub manifest: String,
    /// Configuration file, when declared
    pub config_file: Option<String>,
    /// Declared dependencies, in declaration order
    pub dependencies: Vec<String>,
    /// RPC methods
    pub apis: Vec<ApiRow>,
    /// Published events with their descriptions
    pub events_published: BTreeMap<String, String>,
    /// Subscribed events
    pub events_subscribed: Vec<String>,
    /// Shared-state keys the module writes
    pub state_published: BTreeMap<String, StateRow>,
    /// Shared-state keys the module reads
    pub state_subscribed: Vec<String>,
}

impl From<&ManifestRecord> for ModuleDetail {
    fn from(record: &ManifestRecord) -> Self {
        Self {
            summary: ModuleRow::from(record),
            priority: record.priority.as_str(),
            manifest: record.source_path.display().to_string(),
            config_file: record.config_file.clone(),
            dependencies: record.dependencies.clone(),
            apis: record
                .apis
                .iter()
                .map(|api| ApiRow {
                    method: api.method.clone(),
                    handler: api.handler.clone(),
                    access_level: api.access_level.as_str().to_string(),
                })
                .collect(),
            events_published: record
                .events
                .publishes
                .iter()
                .map(|(name, spec)| (name.clone(), spec.description.clone()))
                .collect(),
            events_subscribed: record.events.subscribes.keys().cloned().collect(),
            state_published: record
                .shared_state
                .publishes
                .iter()
                .map(|(key, spec)| {
                    (
                        key.clone(),
                        StateRow {
                            value_type: spec.value_type.clone(),
                            description: spec.description.clone(),
                            update_rate_ms: spec.update_rate_ms,
                        },
                    )
                })
                .collect(),
            state_subscribed: record.shared_state.subscribes.keys().cloned().collect(),
        }
    }
}

/// Finds `name` among the parsed modules.
///
/// # Errors
///
/// Returns an error naming the known modules if `name` is not one of them.
pub fn find_module<'a>(set: &'a ManifestSet, name: &str) -> Result<&'a ManifestRecord> {
    if let Some(record) = set.module(name) {
        return Ok(record);
    }
    let known: Vec<&str> = set.module_names().into_iter().collect();
    bail!(
        "module '{name}' not found (known modules: {})",
        if known.is_empty() {
            "none".to_string()
        } else {
            known.join(", ")
        }
    )
}

/// Runs the inspect command.
///
/// # Errors
///
/// Returns an error for environment failures or an unknown module name.
pub fn run(
    module: Option<&str>,
    project: ProjectArgs,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let project = Project::open(&PipelineOptions::from(project))?;
    let set = project.load().context("failed to load manifests")?;

    let output = match module {
        Some(name) => {
            info!("Inspecting module {name}");
            format_output(&ModuleDetail::from(find_module(&set, name)?), output_format)?
        }
        None => format_output(&Listing::from(&set), output_format)?,
    };

    println!("{output}");
    Ok(ExitCode::SUCCESS)
}
