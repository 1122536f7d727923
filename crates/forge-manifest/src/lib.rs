//! Manifest discovery, parsing, and cross-module indexing.
//!
//! This crate turns a component tree into an immutable [`ContractIndex`]:
//!
//! 1. [`discover_manifests`] walks the component tree for
//!    `module_manifest.json` and `*_driver_manifest.json` files
//! 2. [`SchemaSet::load`] compiles the external JSON Schemas (absent schemas
//!    disable validation for that manifest kind)
//! 3. [`load_manifests`] parses every file in parallel, collecting per-file
//!    failures instead of aborting
//! 4. [`ContractIndex::build`] aggregates publishers, subscribers, and API
//!    owners across all records
//!
//! # Examples
//!
//! ```
//! use forge_manifest::{ContractIndex, SchemaSet, discover_manifests, load_manifests};
//! # use tempfile::TempDir;
//! # use std::fs;
//!
//! # let root = TempDir::new().unwrap();
//! # let dir = root.path().join("components/sensors");
//! # fs::create_dir_all(&dir).unwrap();
//! # fs::write(
//! #     dir.join("module_manifest.json"),
//! #     r#"{"module": {"name": "Sensors"}, "event_bus": {"publishes": {"sensor.updated": {}}}}"#,
//! # ).unwrap();
//! let discovered = discover_manifests(&root.path().join("components"))?;
//! let schemas = SchemaSet::empty();
//! let set = load_manifests(root.path(), &discovered, &schemas, true);
//! let index = ContractIndex::build(&set.modules, &set.drivers);
//!
//! assert_eq!(set.modules.len(), 1);
//! assert!(index.event_publishers().contains_key("sensor.updated"));
//! # Ok::<(), forge_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod discovery;
mod error;
mod index;
mod loader;
mod parser;
mod schema;

pub use discovery::{DiscoveredManifest, discover_manifests};
pub use error::ManifestFailure;
pub use index::{ApiOwner, ContractIndex, ModuleTable};
pub use loader::{ManifestSet, load_manifests};
pub use parser::{parse_driver_manifest, parse_module_manifest};
pub use schema::{DRIVER_SCHEMA_FILE, MODULE_SCHEMA_FILE, SchemaSet};
