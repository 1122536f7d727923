//! Consistency issues reported by the validator.
//!
//! An [`Issue`] is a cross-module finding (an event nobody publishes, a
//! dependency on a missing module), as opposed to a per-file parse failure.
//!
//! # Examples
//!
//! ```
//! use forge_core::{Issue, IssueCategory, Severity};
//!
//! let issue = Issue::new(
//!     Severity::Error,
//!     IssueCategory::Event,
//!     "z.w",
//!     "Event 'z.w' has subscribers but no publisher",
//! )
//! .with_modules(["Display"]);
//!
//! assert!(issue.is_fatal());
//! assert_eq!(issue.modules, vec!["Display".to_string()]);
//! ```

use serde::Serialize;
use std::fmt;

/// Issue severity.
///
/// Variant order is the sort order of a report: errors first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Blocks emission and fails the run
    Error,
    /// Reported, does not block emission
    Warning,
    /// Informational only
    Info,
}

impl Severity {
    /// All severities in report order.
    pub const ALL: [Self; 3] = [Self::Error, Self::Warning, Self::Info];

    /// Sort rank: ERROR=0, WARNING=1, INFO=2.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Error => 0,
            Self::Warning => 1,
            Self::Info => 2,
        }
    }

    /// Returns the upper-case label used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of contract an issue concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IssueCategory {
    /// Event bus publish/subscribe contracts
    Event,
    /// Shared-state key contracts
    State,
    /// Declared module dependencies
    Dependency,
    /// Module names and generated identifiers
    Naming,
    /// RPC method registrations
    Api,
}

impl IssueCategory {
    /// All categories in report order.
    pub const ALL: [Self; 5] = [
        Self::Event,
        Self::State,
        Self::Dependency,
        Self::Naming,
        Self::Api,
    ];

    /// Returns the upper-case label used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "EVENT",
            Self::State => "STATE",
            Self::Dependency => "DEPENDENCY",
            Self::Naming => "NAMING",
            Self::Api => "API",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validator finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// How serious the finding is
    pub severity: Severity,
    /// Contract kind the finding concerns
    pub category: IssueCategory,
    /// Human-readable description
    pub message: String,
    /// Modules involved, sorted
    pub modules: Vec<String>,
    /// Event name, state key, method, or dependency the finding is about
    pub target: String,
}

impl Issue {
    /// Creates an issue with no modules attached.
    #[must_use]
    pub fn new(
        severity: Severity,
        category: IssueCategory,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            modules: Vec::new(),
            target: target.into(),
        }
    }

    /// Attaches the modules involved in the finding.
    ///
    /// Modules are sorted and deduplicated so that the issue text does not
    /// depend on manifest discovery order.
    #[must_use]
    pub fn with_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules = modules.into_iter().map(Into::into).collect();
        self.modules.sort();
        self.modules.dedup();
        self
    }

    /// Returns `true` for issues that block emission.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;
        if !self.modules.is_empty() {
            write!(f, " (modules: {})", self.modules.join(", "))?;
        }
        Ok(())
    }
}
