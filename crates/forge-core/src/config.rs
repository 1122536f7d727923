//! Project configuration loaded from `forge.toml`.
//!
//! Every field has a default, so a project without a configuration file
//! runs with the conventional firmware layout. CLI flags override file
//! values after loading.
//!
//! # Configuration File Format
//!
//! ```toml
//! [paths]
//! components_dir = "components"
//! schemas_dir = "tools/manifest_schemas"
//! output_dir = "main/generated"
//! constants_dir = "components/core/include"
//! docs_dir = "components/system_contract"
//! report_dir = "build"
//!
//! [generation]
//! namespace = "ModESP"
//! emit_on_error = false
//! parallel = true
//! ```
//!
//! # Examples
//!
//! ```
//! use forge_core::ForgeConfig;
//!
//! let config = ForgeConfig::from_toml_str("[generation]\nemit_on_error = true\n").unwrap();
//! assert!(config.generation.emit_on_error);
//! assert_eq!(config.paths.output_dir.to_str(), Some("main/generated"));
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{Error, Result};

/// Configuration file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "forge.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ForgeConfig {
    /// Input and output locations, relative to the project root
    #[serde(default)]
    pub paths: PathsConfig,

    /// Code generation settings
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Input and output locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Root of the component tree scanned for manifests
    pub components_dir: PathBuf,
    /// Directory holding `module-manifest.schema.json` and
    /// `driver-manifest.schema.json`
    pub schemas_dir: PathBuf,
    /// Directory receiving generated C++ sources
    pub output_dir: PathBuf,
    /// Directory receiving `generated_system_contract.h`
    pub constants_dir: PathBuf,
    /// Directory receiving contract documentation
    pub docs_dir: PathBuf,
    /// Directory receiving the validation report and run log
    pub report_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            components_dir: PathBuf::from("components"),
            schemas_dir: PathBuf::from("tools/manifest_schemas"),
            output_dir: PathBuf::from("main/generated"),
            constants_dir: PathBuf::from("components/core/include"),
            docs_dir: PathBuf::from("components/system_contract"),
            report_dir: PathBuf::from("build"),
        }
    }
}

impl PathsConfig {
    /// Joins every configured path onto the project root.
    ///
    /// Absolute configured paths are kept as-is.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_core::PathsConfig;
    /// use std::path::Path;
    ///
    /// let resolved = PathsConfig::default().resolve(Path::new("/fw"));
    /// assert_eq!(resolved.output_dir, Path::new("/fw/main/generated"));
    /// assert_eq!(resolved.report_dir, Path::new("/fw/build"));
    /// ```
    #[must_use]
    pub fn resolve(&self, project_root: &Path) -> ResolvedPaths {
        ResolvedPaths {
            project_root: project_root.to_path_buf(),
            components_dir: project_root.join(&self.components_dir),
            schemas_dir: project_root.join(&self.schemas_dir),
            output_dir: project_root.join(&self.output_dir),
            constants_dir: project_root.join(&self.constants_dir),
            docs_dir: project_root.join(&self.docs_dir),
            report_dir: project_root.join(&self.report_dir),
        }
    }
}

/// Paths resolved against a concrete project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Project root
    pub project_root: PathBuf,
    /// Component tree scanned for manifests
    pub components_dir: PathBuf,
    /// Schema directory
    pub schemas_dir: PathBuf,
    /// Generated sources
    pub output_dir: PathBuf,
    /// Generated contract header
    pub constants_dir: PathBuf,
    /// Contract documentation
    pub docs_dir: PathBuf,
    /// Report and run log
    pub report_dir: PathBuf,
}

/// Code generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// C++ namespace wrapping generated registration code
    pub namespace: String,
    /// Emit artifacts even when the validator reports errors
    pub emit_on_error: bool,
    /// Parse manifests and run emitters on the rayon thread pool
    pub parallel: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            namespace: "ModESP".to_string(),
            emit_on_error: false,
            parallel: true,
        }
    }
}

impl ForgeConfig {
    /// Parses configuration from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the text is not valid TOML, contains
    /// unknown keys, or fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::ConfigError {
            message: format!("failed to parse configuration: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigError {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Loads `forge.toml` from the project root, or returns defaults when
    /// the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the file exists but is invalid.
    pub fn load_from_project(project_root: &Path) -> Result<Self> {
        let path = project_root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            debug!("No {CONFIG_FILE_NAME} in {}, using defaults", project_root.display());
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Serializes the configuration as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::ConfigError {
            message: format!("failed to serialize configuration: {e}"),
        })
    }

    /// Checks settings that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the namespace is not a valid C++
    /// identifier.
    pub fn validate(&self) -> Result<()> {
        if !crate::identifier::is_valid_identifier(&self.generation.namespace) {
            return Err(Error::ConfigError {
                message: format!(
                    "generation.namespace '{}' is not a valid C++ identifier",
                    self.generation.namespace
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ForgeConfig::default();
        assert_eq!(config.paths.components_dir, PathBuf::from("components"));
        assert_eq!(config.paths.report_dir, PathBuf::from("build"));
        assert_eq!(config.generation.namespace, "ModESP");
        assert!(!config.generation.emit_on_error);
        assert!(config.generation.parallel);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = ForgeConfig::from_toml_str("[paths]\noutput_dir = \"gen\"\n").unwrap();
        assert_eq!(config.paths.output_dir, PathBuf::from("gen"));
        assert_eq!(config.paths.docs_dir, PathBuf::from("components/system_contract"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = ForgeConfig::from_toml_str("[paths]\nout_dir = \"gen\"\n").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_invalid_namespace_rejected() {
        let err = ForgeConfig::from_toml_str("[generation]\nnamespace = \"my-fw\"\n").unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("my-fw"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = ForgeConfig::default();
        config.generation.emit_on_error = true;
        let text = config.to_toml_string().unwrap();
        assert_eq!(ForgeConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_project_without_file() {
        let temp = TempDir::new().unwrap();
        let config = ForgeConfig::load_from_project(temp.path()).unwrap();
        assert_eq!(config, ForgeConfig::default());
    }

    #[test]
    fn test_load_from_project_with_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[generation]\nnamespace = \"Firmware\"\nparallel = false\n",
        )
        .unwrap();
        let config = ForgeConfig::load_from_project(temp.path()).unwrap();
        assert_eq!(config.generation.namespace, "Firmware");
        assert!(!config.generation.parallel);
    }

    #[test]
    fn test_load_malformed_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "[paths\n").unwrap();
        assert!(ForgeConfig::load_from_project(temp.path()).unwrap_err().is_config_error());
    }
}
