//! Error types for manifest-forge.
//!
//! Environment failures (missing project root, unreadable schemas, an
//! unwritable output directory) abort a run before any artifact is written.
//! Per-file manifest failures live in `forge-manifest` and consistency
//! findings are [`Issue`](crate::Issue)s, so neither appears here.
//!
//! # Examples
//!
//! ```
//! use forge_core::{Error, Result};
//!
//! fn check_namespace(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(Error::ConfigError {
//!             message: "namespace cannot be empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_namespace("").unwrap_err();
//! assert!(err.is_config_error());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for manifest-forge.
///
/// All fatal errors in the pipeline use this type, providing consistent
/// error handling across all crates in the workspace.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem operation failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path the operation was working on
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The project root does not exist or is not a directory.
    #[error("project root not found: {}", path.display())]
    ProjectRootNotFound {
        /// Path given as project root
        path: PathBuf,
    },

    /// A schema file exists but cannot be read or compiled.
    ///
    /// An absent schema is not an error; validation of that manifest kind
    /// is skipped instead.
    #[error("failed to load schema {}: {reason}", path.display())]
    SchemaLoad {
        /// Path of the schema file
        path: PathBuf,
        /// Why loading failed
        reason: String,
    },

    /// Configuration error.
    ///
    /// Raised when `forge.toml` is unreadable, malformed, or contains
    /// contradictory settings.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// An output directory cannot be created or written.
    #[error("output directory not writable: {}: {reason}", path.display())]
    OutputNotWritable {
        /// Directory that failed the writability probe
        path: PathBuf,
        /// Why the probe failed
        reason: String,
    },

    /// Template registration or rendering failed.
    #[error("Template error in '{template}': {message}")]
    TemplateError {
        /// Template name
        template: String,
        /// Description of the failure
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Validation error for domain types.
    #[error("Validation error in {field}: {reason}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Detailed reason for the validation failure
        reason: String,
    },
}

impl Error {
    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "unknown key".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this error comes from the environment rather than
    /// from manifest content.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_core::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::ProjectRootNotFound {
    ///     path: PathBuf::from("/missing"),
    /// };
    /// assert!(err.is_environment_error());
    /// ```
    #[must_use]
    pub const fn is_environment_error(&self) -> bool {
        matches!(
            self,
            Self::Io { .. }
                | Self::ProjectRootNotFound { .. }
                | Self::SchemaLoad { .. }
                | Self::ConfigError { .. }
                | Self::OutputNotWritable { .. }
        )
    }

    /// Returns `true` if this is a template error.
    #[must_use]
    pub const fn is_template_error(&self) -> bool {
        matches!(self, Self::TemplateError { .. })
    }

    /// Returns `true` if this is a validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_core::Error;
    ///
    /// let err = Error::ValidationError {
    ///     field: "priority".to_string(),
    ///     reason: "unknown value".to_string(),
    /// };
    /// assert!(err.is_validation_error());
    /// ```
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }
}

/// Result type alias for manifest-forge operations.
///
/// # Examples
///
/// ```
/// use forge_core::{Error, Result};
///
/// fn validate_rate(value: i64) -> Result<i64> {
///     if value < 0 {
///         return Err(Error::InvalidArgument("rate must be non-negative".into()));
///     }
///     Ok(value)
/// }
///
/// assert!(validate_rate(5).is_ok());
/// assert!(validate_rate(-1).is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;
