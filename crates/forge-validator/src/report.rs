//! Validation report rendering.
//!
//! The report is written on every run that reaches validation, in two
//! forms: Markdown for people and JSON for CI tooling.

use forge_core::{Error, Issue, IssueCategory, Result, Severity};
use forge_manifest::ManifestFailure;
use serde::Serialize;
use std::fmt;

use crate::validator::ValidationOutcome;

/// Markdown report file name inside the report directory.
pub const REPORT_MARKDOWN_FILE: &str = "manifest_validation_report.md";

/// JSON report file name inside the report directory.
pub const REPORT_JSON_FILE: &str = "manifest_validation_report.json";

/// A validation outcome together with the files that failed to parse.
///
/// # Examples
///
/// ```
/// use forge_validator::{ValidationOutcome, ValidationReport};
///
/// let outcome = ValidationOutcome::from_issues(vec![]);
/// let report = ValidationReport::new(&outcome, &[]);
/// assert!(report.to_markdown().contains("No issues found"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ValidationReport<'a> {
    outcome: &'a ValidationOutcome,
    input_errors: &'a [ManifestFailure],
}

#[derive(Serialize)]
struct JsonSummary {
    errors: usize,
    warnings: usize,
    info: usize,
    input_errors: usize,
}

/// Issue groups, serialized in severity rank order.
#[derive(Serialize)]
struct JsonIssues<'a> {
    #[serde(rename = "ERROR")]
    error: Vec<&'a Issue>,
    #[serde(rename = "WARNING")]
    warning: Vec<&'a Issue>,
    #[serde(rename = "INFO")]
    info: Vec<&'a Issue>,
}

impl<'a> JsonIssues<'a> {
    fn group(issues: &'a [Issue]) -> Self {
        let of = |severity: Severity| -> Vec<&'a Issue> {
            issues.iter().filter(|i| i.severity == severity).collect()
        };
        Self {
            error: of(Severity::Error),
            warning: of(Severity::Warning),
            info: of(Severity::Info),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    passed: bool,
    summary: JsonSummary,
    issues: JsonIssues<'a>,
    input_errors: &'a [ManifestFailure],
}

impl<'a> ValidationReport<'a> {
    /// Creates a report view.
    #[must_use]
    pub const fn new(outcome: &'a ValidationOutcome, input_errors: &'a [ManifestFailure]) -> Self {
        Self {
            outcome,
            input_errors,
        }
    }

    /// Returns `true` if code generation may proceed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        !self.outcome.has_fatal_errors()
    }

    /// Renders the Markdown report.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        self.to_string()
    }

    /// Renders the JSON report with issues grouped by severity.
    ///
    /// # Errors
    ///
    /// Returns `Error::SerializationError` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let report = JsonReport {
            passed: self.passed(),
            summary: JsonSummary {
                errors: self.outcome.count(Severity::Error),
                warnings: self.outcome.count(Severity::Warning),
                info: self.outcome.count(Severity::Info),
                input_errors: self.input_errors.len(),
            },
            issues: JsonIssues::group(self.outcome.issues()),
            input_errors: self.input_errors,
        };

        serde_json::to_string_pretty(&report).map_err(|e| Error::SerializationError {
            message: format!("failed to serialize validation report: {e}"),
            source: Some(e),
        })
    }

    fn write_issue(f: &mut fmt::Formatter<'_>, issue: &Issue) -> fmt::Result {
        writeln!(f, "### {}: {}", issue.severity, issue.message)?;
        writeln!(f)?;
        if !issue.modules.is_empty() {
            writeln!(f, "- **Modules**: {}", issue.modules.join(", "))?;
        }
        writeln!(f, "- **Target**: `{}`", issue.target)?;
        writeln!(f)
    }
}

impl fmt::Display for ValidationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.outcome.count(Severity::Error);
        let warnings = self.outcome.count(Severity::Warning);

        writeln!(f, "# Manifest Validation Report")?;
        writeln!(f)?;
        writeln!(f, "## Summary")?;
        writeln!(f)?;
        writeln!(f, "- **Errors**: {errors}")?;
        writeln!(f, "- **Warnings**: {warnings}")?;
        writeln!(f, "- **Info**: {}", self.outcome.count(Severity::Info))?;
        writeln!(f, "- **Input errors**: {}", self.input_errors.len())?;
        writeln!(f)?;

        if !self.input_errors.is_empty() {
            writeln!(f, "## Input Errors")?;
            writeln!(f)?;
            writeln!(f, "These manifests were skipped:")?;
            writeln!(f)?;
            for failure in self.input_errors {
                writeln!(f, "- `{}`: {}", failure.file().display(), failure.message())?;
            }
            writeln!(f)?;
        }

        for category in IssueCategory::ALL {
            let mut issues = self.outcome.in_category(category).peekable();
            if issues.peek().is_none() {
                continue;
            }
            writeln!(f, "## {category} Issues")?;
            writeln!(f)?;
            for issue in issues {
                Self::write_issue(f, issue)?;
            }
        }

        writeln!(f, "## Result")?;
        writeln!(f)?;
        if errors > 0 {
            writeln!(
                f,
                "Build failed: {errors} error(s) must be fixed before code generation."
            )
        } else if self.outcome.is_clean() {
            writeln!(f, "No issues found.")
        } else {
            writeln!(f, "Build passed with {warnings} warning(s).")
        }
    }
}
