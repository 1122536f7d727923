//! Typed manifest records.
//!
//! Records are closed structs validated at the parse boundary. Only the UI
//! description and unknown top-level fields stay as opaque JSON.
//!
//! # Examples
//!
//! ```
//! use forge_core::{ManifestKind, ManifestRecord, ModuleType, Priority};
//!
//! let record = ManifestRecord::new("Sensors");
//! assert_eq!(record.kind, ManifestKind::Module);
//! assert_eq!(record.module_type, ModuleType::Standard);
//! assert_eq!(record.priority, Priority::Normal);
//! assert_eq!(record.version, "0.0.0");
//! ```

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::{Error, Result};

/// File name of a module manifest.
const MODULE_MANIFEST_FILE: &str = "module_manifest.json";

/// File name suffix of a driver manifest.
const DRIVER_MANIFEST_SUFFIX: &str = "_driver_manifest.json";

/// Kind of manifest, derived from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ManifestKind {
    /// `module_manifest.json`
    Module,
    /// `<name>_driver_manifest.json`
    Driver,
}

impl ManifestKind {
    /// Classifies a file name, returning `None` for non-manifest files.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_core::ManifestKind;
    ///
    /// assert_eq!(
    ///     ManifestKind::from_file_name("module_manifest.json"),
    ///     Some(ManifestKind::Module)
    /// );
    /// assert_eq!(
    ///     ManifestKind::from_file_name("ds18b20_driver_manifest.json"),
    ///     Some(ManifestKind::Driver)
    /// );
    /// assert_eq!(ManifestKind::from_file_name("config.json"), None);
    /// ```
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        if file_name == MODULE_MANIFEST_FILE {
            Some(Self::Module)
        } else if file_name.len() > DRIVER_MANIFEST_SUFFIX.len()
            && file_name.ends_with(DRIVER_MANIFEST_SUFFIX)
        {
            Some(Self::Driver)
        } else {
            None
        }
    }

    /// Returns the upper-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "MODULE",
            Self::Driver => "DRIVER",
        }
    }
}

/// Module type declared in `module.type`.
///
/// Unknown types are kept verbatim (upper-cased) so that firmware-specific
/// types survive into the module table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ModuleType {
    /// Ordinary application module
    #[default]
    Standard,
    /// Module owning a family of drivers
    Manager,
    /// Hardware driver module
    Driver,
    /// Core platform module
    Core,
    /// Background service
    Service,
    /// Any other declared type
    Other(String),
}

impl ModuleType {
    /// Parses a declared type, case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_core::ModuleType;
    ///
    /// assert_eq!(ModuleType::parse("manager"), ModuleType::Manager);
    /// assert_eq!(ModuleType::parse("gateway"), ModuleType::Other("GATEWAY".into()));
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "STANDARD" => Self::Standard,
            "MANAGER" => Self::Manager,
            "DRIVER" => Self::Driver,
            "CORE" => Self::Core,
            "SERVICE" => Self::Service,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the upper-case name emitted into the module table.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Standard => "STANDARD",
            Self::Manager => "MANAGER",
            Self::Driver => "DRIVER",
            Self::Core => "CORE",
            Self::Service => "SERVICE",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ModuleType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Module scheduling priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    /// Background work
    Low,
    /// Default priority
    #[default]
    Normal,
    /// Latency-sensitive work
    High,
    /// Safety-relevant work
    Critical,
}

impl Priority {
    /// Returns the upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Normal => "NORMAL",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "NORMAL" => Ok(Self::Normal),
            "HIGH" => Ok(Self::High),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(Error::ValidationError {
                field: "module.priority".to_string(),
                reason: format!("unknown priority '{s}' (expected LOW, NORMAL, HIGH or CRITICAL)"),
            }),
        }
    }
}

/// Access level required to call an RPC method.
///
/// Stored lower-case; emitted upper-case as `AccessLevel::USER`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AccessLevel(String);

impl AccessLevel {
    /// Creates an access level, normalizing case and whitespace.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` if the level is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_core::AccessLevel;
    ///
    /// let level = AccessLevel::new(" Admin ").unwrap();
    /// assert_eq!(level.as_str(), "admin");
    /// assert_eq!(level.to_upper(), "ADMIN");
    /// assert!(AccessLevel::new("").is_err());
    /// ```
    pub fn new(level: &str) -> Result<Self> {
        let normalized = level.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(Error::ValidationError {
                field: "access_level".to_string(),
                reason: "access level cannot be empty".to_string(),
            });
        }
        Ok(Self(normalized))
    }

    /// Returns the lower-case level.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the level as emitted into C++ (`USER`, `ADMIN`).
    #[must_use]
    pub fn to_upper(&self) -> String {
        self.0.to_uppercase()
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        Self("user".to_string())
    }
}

/// One RPC method a module or driver registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiBinding {
    /// Method name, e.g. `climate.get_setpoint`
    pub method: String,
    /// C++ handler expression
    pub handler: String,
    /// Required access level
    pub access_level: AccessLevel,
}

/// One field of an event payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PayloadField {
    /// Declared type (`float`, `string`, `uint32`); empty when undeclared
    #[serde(rename = "type")]
    pub field_type: String,
    /// Free-text description
    pub description: String,
}

/// An event as declared by a publisher or subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EventSpec {
    /// Free-text description
    pub description: String,
    /// Payload fields keyed by field name
    pub payload: BTreeMap<String, PayloadField>,
}

/// A shared-state key as declared by a writer or reader.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StateSpec {
    /// Declared value type
    #[serde(rename = "type")]
    pub value_type: String,
    /// Free-text description
    pub description: String,
    /// Publication period in milliseconds
    pub update_rate_ms: Option<u64>,
}

/// Published and consumed contracts of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractSection<T> {
    /// Keys this module produces
    pub publishes: BTreeMap<String, T>,
    /// Keys this module consumes
    pub subscribes: BTreeMap<String, T>,
}

impl<T> Default for ContractSection<T> {
    fn default() -> Self {
        Self {
            publishes: BTreeMap::new(),
            subscribes: BTreeMap::new(),
        }
    }
}

/// A parsed module manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestRecord {
    /// Unique module name
    pub name: String,
    /// Always [`ManifestKind::Module`]
    pub kind: ManifestKind,
    /// Declared module type
    pub module_type: ModuleType,
    /// Module version string
    pub version: String,
    /// Free-text description
    pub description: String,
    /// Scheduling priority
    pub priority: Priority,
    /// Declared dependencies in declaration order, duplicates kept
    pub dependencies: Vec<String>,
    /// Manifest path relative to the project root
    pub source_path: PathBuf,
    /// RPC methods from `apis.static`
    pub apis: Vec<ApiBinding>,
    /// Event bus contracts
    pub events: ContractSection<EventSpec>,
    /// Shared-state contracts
    pub shared_state: ContractSection<StateSpec>,
    /// Opaque UI description
    pub ui: Value,
    /// Module configuration file
    pub config_file: Option<String>,
    /// Driver interface a MANAGER module exposes
    pub driver_interface: Option<String>,
    /// Unknown top-level fields, preserved as-is
    pub extra: BTreeMap<String, Value>,
}

impl ManifestRecord {
    /// Creates a record with every optional field at its default.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ManifestKind::Module,
            module_type: ModuleType::default(),
            version: "0.0.0".to_string(),
            description: String::new(),
            priority: Priority::default(),
            dependencies: Vec::new(),
            source_path: PathBuf::new(),
            apis: Vec::new(),
            events: ContractSection::default(),
            shared_state: ContractSection::default(),
            ui: Value::Object(serde_json::Map::new()),
            config_file: None,
            driver_interface: None,
            extra: BTreeMap::new(),
        }
    }

    /// Returns the adaptive UI components a MANAGER module contributes.
    ///
    /// Other module types never contribute components.
    #[must_use]
    pub fn adaptive_components(&self) -> &[Value] {
        if self.module_type != ModuleType::Manager {
            return &[];
        }
        self.ui
            .pointer("/adaptive/components")
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }
}

/// A parsed driver manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverRecord {
    /// Driver name
    pub name: String,
    /// Always [`ManifestKind::Driver`]
    pub kind: ManifestKind,
    /// Declared driver type (`sensor`, `actuator`)
    pub driver_type: String,
    /// Driver version string
    pub version: String,
    /// Free-text description
    pub description: String,
    /// Manifest path relative to the project root
    pub source_path: PathBuf,
    /// RPC methods from `apis.specific`
    pub apis: Vec<ApiBinding>,
    /// Opaque UI extensions
    pub ui_extensions: Value,
    /// Unknown top-level fields, preserved as-is
    pub extra: BTreeMap<String, Value>,
}

impl DriverRecord {
    /// Creates a record with every optional field at its default.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ManifestKind::Driver,
            driver_type: String::new(),
            version: "0.0.0".to_string(),
            description: String::new(),
            source_path: PathBuf::new(),
            apis: Vec::new(),
            ui_extensions: Value::Object(serde_json::Map::new()),
            extra: BTreeMap::new(),
        }
    }

    /// Returns the UI components this driver contributes.
    #[must_use]
    pub fn ui_components(&self) -> &[Value] {
        self.ui_extensions
            .get("components")
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }
}
