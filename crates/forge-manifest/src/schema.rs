//! External JSON Schema loading.
//!
//! The schema documents are owned by the firmware project; this module only
//! compiles them. A missing schema file disables validation for that
//! manifest kind with a warning. A schema that exists but cannot be read or
//! compiled aborts the run.

use forge_core::{Error, ManifestKind, Result};
use jsonschema::Validator;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Schema file for module manifests.
pub const MODULE_SCHEMA_FILE: &str = "module-manifest.schema.json";

/// Schema file for driver manifests.
pub const DRIVER_SCHEMA_FILE: &str = "driver-manifest.schema.json";

/// Compiled schemas, one optional validator per manifest kind.
pub struct SchemaSet {
    module: Option<Validator>,
    driver: Option<Validator>,
}

impl fmt::Debug for SchemaSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaSet")
            .field("module", &self.module.is_some())
            .field("driver", &self.driver.is_some())
            .finish()
    }
}

impl SchemaSet {
    /// A schema set that accepts every manifest.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            module: None,
            driver: None,
        }
    }

    /// Loads both schemas from `schemas_dir`.
    ///
    /// # Errors
    ///
    /// Returns `Error::SchemaLoad` if a schema file exists but is not valid
    /// JSON or not a valid schema.
    pub fn load(schemas_dir: &Path) -> Result<Self> {
        Ok(Self {
            module: load_validator(&schemas_dir.join(MODULE_SCHEMA_FILE))?,
            driver: load_validator(&schemas_dir.join(DRIVER_SCHEMA_FILE))?,
        })
    }

    /// Compiles a schema from an in-memory document.
    ///
    /// # Errors
    ///
    /// Returns `Error::SchemaLoad` if the document is not a valid schema.
    pub fn with_schema(mut self, kind: ManifestKind, schema: &Value) -> Result<Self> {
        let validator = jsonschema::validator_for(schema).map_err(|e| Error::SchemaLoad {
            path: Path::new(schema_file(kind)).to_path_buf(),
            reason: e.to_string(),
        })?;
        match kind {
            ManifestKind::Module => self.module = Some(validator),
            ManifestKind::Driver => self.driver = Some(validator),
        }
        Ok(self)
    }

    /// Returns `true` if manifests of `kind` are schema-validated.
    #[must_use]
    pub const fn has_schema(&self, kind: ManifestKind) -> bool {
        match kind {
            ManifestKind::Module => self.module.is_some(),
            ManifestKind::Driver => self.driver.is_some(),
        }
    }

    /// Validates a manifest document.
    ///
    /// Returns every violation as `"<instance path>: <message>"`, sorted.
    /// Without a schema for `kind` the document is accepted.
    ///
    /// # Errors
    ///
    /// Returns the list of violations if the document does not conform.
    pub fn validate(&self, kind: ManifestKind, instance: &Value) -> std::result::Result<(), Vec<String>> {
        let validator = match kind {
            ManifestKind::Module => self.module.as_ref(),
            ManifestKind::Driver => self.driver.as_ref(),
        };
        let Some(validator) = validator else {
            return Ok(());
        };

        let mut violations: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{path}: {e}")
                }
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            violations.sort();
            Err(violations)
        }
    }
}

impl Default for SchemaSet {
    fn default() -> Self {
        Self::empty()
    }
}

const fn schema_file(kind: ManifestKind) -> &'static str {
    match kind {
        ManifestKind::Module => MODULE_SCHEMA_FILE,
        ManifestKind::Driver => DRIVER_SCHEMA_FILE,
    }
}

fn load_validator(path: &Path) -> Result<Option<Validator>> {
    if !path.exists() {
        warn!(
            "Schema {} not found, skipping schema validation for these manifests",
            path.display()
        );
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| Error::SchemaLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let schema: Value = serde_json::from_str(&content).map_err(|e| Error::SchemaLoad {
        path: path.to_path_buf(),
        reason: format!("invalid JSON: {e}"),
    })?;
    let validator = jsonschema::validator_for(&schema).map_err(|e| Error::SchemaLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    debug!("Loaded schema {}", path.display());
    Ok(Some(validator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn module_schema() -> Value {
        json!({
            "type": "object",
            "required": ["module"],
            "properties": {
                "module": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {"name": {"type": "string", "minLength": 1}}
                }
            }
        })
    }

    #[test]
    fn test_missing_schemas_soft_fail() {
        let temp = TempDir::new().unwrap();
        let schemas = SchemaSet::load(temp.path()).unwrap();
        assert!(!schemas.has_schema(ManifestKind::Module));
        assert!(!schemas.has_schema(ManifestKind::Driver));
        assert!(schemas.validate(ManifestKind::Module, &json!(42)).is_ok());
    }

    #[test]
    fn test_load_and_validate() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(MODULE_SCHEMA_FILE),
            module_schema().to_string(),
        )
        .unwrap();

        let schemas = SchemaSet::load(temp.path()).unwrap();
        assert!(schemas.has_schema(ManifestKind::Module));
        assert!(!schemas.has_schema(ManifestKind::Driver));

        assert!(schemas
            .validate(ManifestKind::Module, &json!({"module": {"name": "Sensors"}}))
            .is_ok());

        let violations = schemas
            .validate(ManifestKind::Module, &json!({"module": {"name": 5}}))
            .unwrap_err();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].starts_with("/module/name"));
    }

    #[test]
    fn test_invalid_schema_json_is_fatal() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(DRIVER_SCHEMA_FILE), "{ not json").unwrap();
        let err = SchemaSet::load(temp.path()).unwrap_err();
        assert!(matches!(err, Error::SchemaLoad { .. }));
        assert!(err.is_environment_error());
    }

    #[test]
    fn test_invalid_schema_document_is_fatal() {
        let err = SchemaSet::empty()
            .with_schema(ManifestKind::Module, &json!({"type": 12}))
            .unwrap_err();
        assert!(matches!(err, Error::SchemaLoad { .. }));
    }

    #[test]
    fn test_with_schema_driver() {
        let schemas = SchemaSet::empty()
            .with_schema(ManifestKind::Driver, &json!({"required": ["driver"]}))
            .unwrap();
        assert!(schemas.validate(ManifestKind::Driver, &json!({})).is_err());
        assert!(schemas.validate(ManifestKind::Module, &json!({})).is_ok());
    }
}
