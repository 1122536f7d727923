//! Manifest parsing into typed records.
//!
//! Parsing happens in three steps, each with its own failure kind:
//! JSON syntax ([`ManifestFailure::Parse`]), schema conformance, and the
//! typed record structure (both [`ManifestFailure::Validation`]).

use forge_core::{
    AccessLevel, ApiBinding, ContractSection, DriverRecord, EventSpec, ManifestKind,
    ManifestRecord, ModuleType, PayloadField, Priority, StateSpec,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ManifestFailure;
use crate::schema::SchemaSet;

#[derive(Debug, Deserialize)]
struct RawModuleManifest {
    module: RawModuleHeader,
    #[serde(default)]
    apis: RawApis,
    #[serde(default)]
    ui: Value,
    #[serde(default)]
    shared_state: RawContract<RawStateSpec>,
    #[serde(default)]
    event_bus: RawContract<RawEventSpec>,
    #[serde(default)]
    configuration: RawConfiguration,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawModuleHeader {
    name: String,
    #[serde(rename = "type")]
    module_type: Option<String>,
    version: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    #[serde(default)]
    dependencies: Vec<String>,
    driver_interface: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawApis {
    #[serde(rename = "static", default)]
    static_apis: Vec<RawApi>,
    #[serde(default)]
    specific: Vec<RawApi>,
}

#[derive(Debug, Deserialize)]
struct RawApi {
    method: String,
    handler: String,
    access_level: Option<String>,
}

/// A publishes/subscribes block. Subscribers often list bare keys.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawKeyed<T> {
    Map(BTreeMap<String, T>),
    List(Vec<String>),
}

impl<T> Default for RawKeyed<T> {
    fn default() -> Self {
        Self::Map(BTreeMap::new())
    }
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
struct RawContract<T> {
    #[serde(default)]
    publishes: RawKeyed<T>,
    #[serde(default)]
    subscribes: RawKeyed<T>,
}

impl<T> Default for RawContract<T> {
    fn default() -> Self {
        Self {
            publishes: RawKeyed::default(),
            subscribes: RawKeyed::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawEventSpec {
    #[serde(default)]
    description: String,
    #[serde(default)]
    payload: BTreeMap<String, RawPayloadField>,
}

/// Payload fields are either `{ "type", "description" }` or a bare type.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPayloadField {
    Full {
        #[serde(rename = "type", default)]
        field_type: String,
        #[serde(default)]
        description: String,
    },
    TypeOnly(String),
}

#[derive(Debug, Default, Deserialize)]
struct RawStateSpec {
    #[serde(rename = "type", default)]
    value_type: String,
    #[serde(default)]
    description: String,
    update_rate_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfiguration {
    config_file: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDriverManifest {
    driver: RawDriverHeader,
    #[serde(default)]
    apis: RawApis,
    #[serde(default)]
    ui_extensions: Value,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawDriverHeader {
    name: String,
    #[serde(rename = "type", default)]
    driver_type: String,
    version: Option<String>,
    #[serde(default)]
    description: String,
}

/// Parses and validates one module manifest.
///
/// `source_path` is recorded in the record and in failures; it is
/// normally the path relative to the project root.
///
/// # Errors
///
/// Returns [`ManifestFailure::Parse`] for unreadable files or malformed
/// JSON and [`ManifestFailure::Validation`] for schema violations, a
/// missing or empty `module.name`, or fields of the wrong type.
///
/// # Examples
///
/// ```
/// use forge_manifest::{SchemaSet, parse_module_manifest};
/// # use tempfile::TempDir;
///
/// # let temp = TempDir::new().unwrap();
/// let path = temp.path().join("module_manifest.json");
/// std::fs::write(&path, r#"{"module": {"name": "Display", "priority": "high"}}"#).unwrap();
///
/// let record = parse_module_manifest(&path, "components/display/module_manifest.json", &SchemaSet::empty())
///     .unwrap();
/// assert_eq!(record.name, "Display");
/// assert_eq!(record.version, "0.0.0");
/// ```
pub fn parse_module_manifest(
    path: &Path,
    source_path: impl Into<PathBuf>,
    schemas: &SchemaSet,
) -> Result<ManifestRecord, ManifestFailure> {
    let source_path = source_path.into();
    let raw: RawModuleManifest = read_document(path, &source_path, ManifestKind::Module, schemas)?;
    let invalid = |message: String| ManifestFailure::Validation {
        file: source_path.clone(),
        message,
    };

    let header = raw.module;
    let name = header.name.trim().to_string();
    if name.is_empty() {
        return Err(invalid("module.name cannot be empty".to_string()));
    }

    let priority = header
        .priority
        .as_deref()
        .map(str::parse::<Priority>)
        .transpose()
        .map_err(|e| invalid(e.to_string()))?
        .unwrap_or_default();

    let apis = convert_apis(raw.apis.static_apis).map_err(invalid)?;

    let events = ContractSection {
        publishes: keyed(raw.event_bus.publishes, convert_event),
        subscribes: keyed(raw.event_bus.subscribes, convert_event),
    };
    let shared_state = ContractSection {
        publishes: keyed(raw.shared_state.publishes, convert_state),
        subscribes: keyed(raw.shared_state.subscribes, convert_state),
    };

    debug!(
        "Parsed module '{}' from {} ({} APIs, {} published events, {} published states)",
        name,
        source_path.display(),
        apis.len(),
        events.publishes.len(),
        shared_state.publishes.len()
    );

    Ok(ManifestRecord {
        name,
        kind: ManifestKind::Module,
        module_type: header
            .module_type
            .as_deref()
            .map_or_else(ModuleType::default, ModuleType::parse),
        version: header.version.unwrap_or_else(|| "0.0.0".to_string()),
        description: header.description.unwrap_or_default(),
        priority,
        dependencies: header.dependencies,
        source_path,
        apis,
        events,
        shared_state,
        ui: object_or_empty(raw.ui),
        config_file: raw.configuration.config_file,
        driver_interface: header.driver_interface,
        extra: raw.extra,
    })
}

/// Parses and validates one driver manifest.
///
/// # Errors
///
/// Same failure kinds as [`parse_module_manifest`], with `driver.name`
/// as the required field.
pub fn parse_driver_manifest(
    path: &Path,
    source_path: impl Into<PathBuf>,
    schemas: &SchemaSet,
) -> Result<DriverRecord, ManifestFailure> {
    let source_path = source_path.into();
    let raw: RawDriverManifest = read_document(path, &source_path, ManifestKind::Driver, schemas)?;
    let invalid = |message: String| ManifestFailure::Validation {
        file: source_path.clone(),
        message,
    };

    let name = raw.driver.name.trim().to_string();
    if name.is_empty() {
        return Err(invalid("driver.name cannot be empty".to_string()));
    }
    let apis = convert_apis(raw.apis.specific).map_err(invalid)?;

    debug!(
        "Parsed driver '{}' from {} ({} APIs)",
        name,
        source_path.display(),
        apis.len()
    );

    Ok(DriverRecord {
        name,
        kind: ManifestKind::Driver,
        driver_type: raw.driver.driver_type,
        version: raw.driver.version.unwrap_or_else(|| "0.0.0".to_string()),
        description: raw.driver.description,
        source_path,
        apis,
        ui_extensions: object_or_empty(raw.ui_extensions),
        extra: raw.extra,
    })
}

/// Reads, syntax-checks, schema-validates, and deserializes a document.
fn read_document<T: DeserializeOwned>(
    path: &Path,
    source_path: &Path,
    kind: ManifestKind,
    schemas: &SchemaSet,
) -> Result<T, ManifestFailure> {
    let content = fs::read_to_string(path).map_err(|e| ManifestFailure::Parse {
        file: source_path.to_path_buf(),
        message: e.to_string(),
    })?;
    let document: Value = serde_json::from_str(&content).map_err(|e| ManifestFailure::Parse {
        file: source_path.to_path_buf(),
        message: e.to_string(),
    })?;

    schemas
        .validate(kind, &document)
        .map_err(|violations| ManifestFailure::Validation {
            file: source_path.to_path_buf(),
            message: format!("schema violation: {}", violations.join("; ")),
        })?;

    serde_json::from_value(document).map_err(|e| ManifestFailure::Validation {
        file: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

fn convert_apis(raw: Vec<RawApi>) -> Result<Vec<ApiBinding>, String> {
    raw.into_iter()
        .map(|api| {
            let method = api.method.trim().to_string();
            if method.is_empty() {
                return Err("API method name cannot be empty".to_string());
            }
            let access_level = match api.access_level.as_deref() {
                None => AccessLevel::default(),
                Some(level) => AccessLevel::new(level)
                    .map_err(|e| format!("API '{method}': {e}"))?,
            };
            Ok(ApiBinding {
                method,
                handler: api.handler,
                access_level,
            })
        })
        .collect()
}

fn keyed<R: Default, T>(raw: RawKeyed<R>, convert: fn(R) -> T) -> BTreeMap<String, T> {
    match raw {
        RawKeyed::Map(map) => map.into_iter().map(|(k, v)| (k, convert(v))).collect(),
        RawKeyed::List(keys) => keys
            .into_iter()
            .map(|k| (k, convert(R::default())))
            .collect(),
    }
}

fn convert_event(raw: RawEventSpec) -> EventSpec {
    EventSpec {
        description: raw.description,
        payload: raw
            .payload
            .into_iter()
            .map(|(name, field)| {
                let field = match field {
                    RawPayloadField::Full {
                        field_type,
                        description,
                    } => PayloadField {
                        field_type,
                        description,
                    },
                    RawPayloadField::TypeOnly(field_type) => PayloadField {
                        field_type,
                        description: String::new(),
                    },
                };
                (name, field)
            })
            .collect(),
    }
}

fn convert_state(raw: RawStateSpec) -> StateSpec {
    StateSpec {
        value_type: raw.value_type,
        description: raw.description,
        update_rate_ms: raw.update_rate_ms,
    }
}

fn object_or_empty(value: Value) -> Value {
    if value.is_object() {
        value
    } else {
        Value::Object(serde_json::Map::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(temp: &TempDir, content: &str) -> PathBuf {
        let path = temp.path().join("module_manifest.json");
        fs::write(&path, content).unwrap();
        path
    }

    fn parse(content: &Value) -> Result<ManifestRecord, ManifestFailure> {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, &content.to_string());
        parse_module_manifest(&path, "components/m/module_manifest.json", &SchemaSet::empty())
    }

    #[test]
    fn test_defaults_applied() {
        let record = parse(&json!({"module": {"name": "Sensors"}})).unwrap();
        assert_eq!(record.module_type, ModuleType::Standard);
        assert_eq!(record.priority, Priority::Normal);
        assert_eq!(record.version, "0.0.0");
        assert!(record.description.is_empty());
        assert!(record.dependencies.is_empty());
        assert!(record.apis.is_empty());
        assert!(record.config_file.is_none());
        assert!(record.ui.is_object());
        assert_eq!(
            record.source_path,
            PathBuf::from("components/m/module_manifest.json")
        );
    }

    #[test]
    fn test_full_manifest() {
        let record = parse(&json!({
            "module": {
                "name": "Climate",
                "type": "manager",
                "version": "1.2.0",
                "description": "Climate control",
                "priority": "HIGH",
                "dependencies": ["Sensors", "EventBus", "Sensors"],
                "driver_interface": "IClimateDriver"
            },
            "apis": {"static": [
                {"method": "climate.get_setpoint", "handler": "ClimateRpc::get"},
                {"method": "climate.set_setpoint", "handler": "ClimateRpc::set", "access_level": "Admin"}
            ]},
            "shared_state": {
                "publishes": {"climate.setpoint": {"type": "float", "description": "Target", "update_rate_ms": 500}},
                "subscribes": ["temp.evap"]
            },
            "event_bus": {
                "publishes": {"climate.alarm": {"description": "Alarm raised", "payload": {
                    "code": {"type": "uint16", "description": "Alarm code"},
                    "message": "string"
                }}},
                "subscribes": {"sensor.updated": {}}
            },
            "configuration": {"config_file": "climate.json"},
            "telemetry": {"enabled": true}
        }))
        .unwrap();

        assert_eq!(record.module_type, ModuleType::Manager);
        assert_eq!(record.priority, Priority::High);
        assert_eq!(record.dependencies, vec!["Sensors", "EventBus", "Sensors"]);
        assert_eq!(record.driver_interface.as_deref(), Some("IClimateDriver"));
        assert_eq!(record.apis[0].access_level.as_str(), "user");
        assert_eq!(record.apis[1].access_level.to_upper(), "ADMIN");
        assert_eq!(
            record.shared_state.publishes["climate.setpoint"].update_rate_ms,
            Some(500)
        );
        assert!(record.shared_state.subscribes.contains_key("temp.evap"));
        let alarm = &record.events.publishes["climate.alarm"];
        assert_eq!(alarm.payload["code"].field_type, "uint16");
        assert_eq!(alarm.payload["message"].field_type, "string");
        assert!(record.events.subscribes.contains_key("sensor.updated"));
        assert_eq!(record.config_file.as_deref(), Some("climate.json"));
        assert_eq!(record.extra["telemetry"], json!({"enabled": true}));
    }

    #[test]
    fn test_malformed_json_is_parse_failure() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "{\"module\": ");
        let failure = parse_module_manifest(&path, "m.json", &SchemaSet::empty()).unwrap_err();
        assert!(failure.is_parse_error());
        assert_eq!(failure.file(), Path::new("m.json"));
    }

    #[test]
    fn test_missing_file_is_parse_failure() {
        let temp = TempDir::new().unwrap();
        let failure = parse_module_manifest(
            &temp.path().join("absent.json"),
            "absent.json",
            &SchemaSet::empty(),
        )
        .unwrap_err();
        assert!(failure.is_parse_error());
    }

    #[test]
    fn test_missing_name_is_validation_failure() {
        let failure = parse(&json!({"module": {"version": "1.0"}})).unwrap_err();
        assert!(failure.is_validation_error());
        assert!(failure.message().contains("name"));
    }

    #[test]
    fn test_empty_name_is_validation_failure() {
        let failure = parse(&json!({"module": {"name": "  "}})).unwrap_err();
        assert!(failure.is_validation_error());
    }

    #[test]
    fn test_unknown_priority_is_validation_failure() {
        let failure = parse(&json!({"module": {"name": "A", "priority": "urgent"}})).unwrap_err();
        assert!(failure.is_validation_error());
        assert!(failure.message().contains("urgent"));
    }

    #[test]
    fn test_schema_violation_is_validation_failure() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, r#"{"module": {"name": "A"}}"#);
        let schemas = SchemaSet::empty()
            .with_schema(
                ManifestKind::Module,
                &json!({"required": ["module", "apis"]}),
            )
            .unwrap();
        let failure = parse_module_manifest(&path, "m.json", &schemas).unwrap_err();
        assert!(failure.is_validation_error());
        assert!(failure.message().starts_with("schema violation"));
    }

    #[test]
    fn test_empty_api_method_rejected() {
        let failure = parse(&json!({
            "module": {"name": "A"},
            "apis": {"static": [{"method": "", "handler": "h"}]}
        }))
        .unwrap_err();
        assert!(failure.is_validation_error());
    }

    #[test]
    fn test_driver_manifest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ds18b20_driver_manifest.json");
        fs::write(
            &path,
            json!({
                "driver": {"name": "DS18B20", "type": "sensor", "version": "2.0.0"},
                "apis": {"specific": [{"method": "ds18b20.scan", "handler": "Ds18b20::scan", "access_level": "technician"}]},
                "ui_extensions": {"components": [{"id": "ds18b20_resolution", "type": "dropdown"}]}
            })
            .to_string(),
        )
        .unwrap();

        let driver = parse_driver_manifest(&path, "d.json", &SchemaSet::empty()).unwrap();
        assert_eq!(driver.name, "DS18B20");
        assert_eq!(driver.driver_type, "sensor");
        assert_eq!(driver.apis.len(), 1);
        assert_eq!(driver.apis[0].access_level.as_str(), "technician");
        assert_eq!(driver.ui_components().len(), 1);
    }

    #[test]
    fn test_driver_without_header_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("x_driver_manifest.json");
        fs::write(&path, r#"{"apis": {}}"#).unwrap();
        let failure = parse_driver_manifest(&path, "x.json", &SchemaSet::empty()).unwrap_err();
        assert!(failure.is_validation_error());
    }
}
