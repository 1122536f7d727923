//! The manifest pipeline shared by `generate`, `validate` and `inspect`.
//!
//! A run moves through fixed stages:
//!
//! ```text
//! DISCOVER -> PARSE -> INDEX -> VALIDATE -> report
//!                                  |
//!                                  +-- FAIL: stop, generated files untouched
//!                                  +-- PASS: RESOLVE -> EMIT -> run log
//! ```
//!
//! Environment failures (missing project root, broken schema or config,
//! unwritable output) surface as `Err` and map to exit code 2. Validation
//! failures are a normal outcome reported through [`RunSummary`].

use anyhow::{Context, Result};
use chrono::Utc;
use forge_codegen::CodeGenerator;
use forge_core::cli::ExitCode;
use forge_core::{Error, ForgeConfig, GENERATOR_NAME, ResolvedPaths, Severity};
use forge_files::{ExportOptions, ExportSummary, ExportedFile, FilesBuilder};
use forge_manifest::{ContractIndex, ManifestSet, SchemaSet, discover_manifests, load_manifests};
use forge_validator::{
    ConsistencyValidator, DependencyResolver, REPORT_JSON_FILE, REPORT_MARKDOWN_FILE,
    ValidationOutcome, ValidationReport,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Run log file name inside the report directory.
pub const RUN_LOG_FILE: &str = "manifest_forge_run.json";

/// How far a run goes after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Stop after writing the report
    Validate,
    /// Emit artifacts when validation passes
    Generate,
}

/// Command-line overrides for a run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Firmware project root
    pub project_root: PathBuf,
    /// Explicit configuration file
    pub config_path: Option<PathBuf>,
    /// Overrides `paths.output_dir`
    pub output_dir: Option<PathBuf>,
    /// Forces `generation.emit_on_error`
    pub emit_on_error: bool,
}

impl PipelineOptions {
    /// Options for `project_root` with no overrides.
    #[must_use]
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            config_path: None,
            output_dir: None,
            emit_on_error: false,
        }
    }
}

/// A firmware project with its effective configuration.
#[derive(Debug, Clone)]
pub struct Project {
    /// Configuration after CLI overrides
    pub config: ForgeConfig,
    /// Paths resolved against the canonical project root
    pub paths: ResolvedPaths,
}

/// Parsed manifests, their index, and the validator's verdict.
#[derive(Debug)]
pub struct Analysis {
    /// Parsed records and per-file failures
    pub set: ManifestSet,
    /// Cross-module index
    pub index: ContractIndex,
    /// Severity-sorted issues
    pub outcome: ValidationOutcome,
}

impl Project {
    /// Resolves the project root and loads configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectRootNotFound` if the root is not a directory,
    /// or `Error::ConfigError` if the configuration file is invalid.
    pub fn open(options: &PipelineOptions) -> forge_core::Result<Self> {
        let root = fs::canonicalize(&options.project_root)
            .ok()
            .filter(|path| path.is_dir())
            .ok_or_else(|| Error::ProjectRootNotFound {
                path: options.project_root.clone(),
            })?;

        let mut config = match &options.config_path {
            Some(path) => ForgeConfig::load(path)?,
            None => ForgeConfig::load_from_project(&root)?,
        };
        if let Some(dir) = &options.output_dir {
            config.paths.output_dir.clone_from(dir);
        }
        if options.emit_on_error {
            config.generation.emit_on_error = true;
        }

        let paths = config.paths.resolve(&root);
        info!("Project root: {}", root.display());
        Ok(Self { config, paths })
    }

    /// Discovers and parses every manifest.
    ///
    /// # Errors
    ///
    /// Returns `Error::SchemaLoad` if a schema file is broken, or
    /// `Error::Io` if the component tree cannot be walked. Per-file
    /// failures are collected in the returned set instead.
    pub fn load(&self) -> forge_core::Result<ManifestSet> {
        let schemas = SchemaSet::load(&self.paths.schemas_dir)?;
        let discovered = discover_manifests(&self.paths.components_dir)?;
        info!("Discovered {} manifest(s)", discovered.len());
        Ok(load_manifests(
            &self.paths.project_root,
            &discovered,
            &schemas,
            self.config.generation.parallel,
        ))
    }

    /// Loads, indexes and validates the project.
    ///
    /// # Errors
    ///
    /// Propagates environment errors from [`load`](Self::load).
    pub fn analyze(&self) -> forge_core::Result<Analysis> {
        let set = self.load()?;
        let index = ContractIndex::build(&set.modules, &set.drivers);
        let outcome = ConsistencyValidator::new(&index, &set).validate();
        Ok(Analysis {
            set,
            index,
            outcome,
        })
    }

    /// Writes the Markdown and JSON validation reports.
    ///
    /// Returns the path of the Markdown report.
    ///
    /// # Errors
    ///
    /// Returns an error if the report directory is not writable.
    pub fn write_report(&self, analysis: &Analysis) -> forge_core::Result<PathBuf> {
        let report = ValidationReport::new(&analysis.outcome, &analysis.set.failures);
        let markdown = self.paths.report_dir.join(REPORT_MARKDOWN_FILE);

        FilesBuilder::new()
            .add_file(&markdown, report.to_markdown())
            .add_file(self.paths.report_dir.join(REPORT_JSON_FILE), report.to_json()?)
            .build_and_export(&ExportOptions::default())?;

        info!("Validation report written to {}", markdown.display());
        Ok(markdown)
    }

    /// Resolves dependencies, renders every artifact and exports it.
    ///
    /// # Errors
    ///
    /// Returns a template error, or `Error::OutputNotWritable` if any
    /// target directory fails the preflight probe. In that case no
    /// artifact has been written.
    pub fn emit(&self, analysis: &Analysis) -> forge_core::Result<ExportSummary> {
        let resolver = DependencyResolver::new(&analysis.set);
        for (module, deps) in resolver.resolved_dependencies() {
            debug!("{module} depends on [{}]", deps.join(", "));
        }

        let generator = CodeGenerator::new()?;
        let code = generator.generate(&analysis.index, &analysis.set, &self.config)?;
        let summary = FilesBuilder::from_generated_code(code, &self.paths)
            .build_and_export(&ExportOptions::default())
            .map(|(_, summary)| summary)?;
        Ok(summary)
    }

    fn write_run_log(&self, summary: &RunSummary, artifacts: &[ExportedFile]) -> Result<()> {
        let log = RunLog {
            generator: GENERATOR_NAME,
            version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now().to_rfc3339(),
            summary,
            artifacts,
        };
        let content =
            serde_json::to_string_pretty(&log).context("failed to serialize run log")?;
        let path = self.paths.report_dir.join(RUN_LOG_FILE);

        FilesBuilder::new()
            .add_file(&path, content)
            .build_and_export(&ExportOptions::default().with_skip_unchanged(false))
            .map_err(Error::from)
            .with_context(|| format!("failed to write run log {}", path.display()))?;
        debug!("Run log written to {}", path.display());
        Ok(())
    }
}

/// What a run did, printed by the CLI formatters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Pipeline mode
    pub mode: Mode,
    /// Canonical project root
    pub project_root: String,
    /// Parsed modules
    pub modules: usize,
    /// Parsed drivers
    pub drivers: usize,
    /// Manifests that failed to parse
    pub input_errors: usize,
    /// ERROR issues
    pub errors: usize,
    /// WARNING issues
    pub warnings: usize,
    /// INFO issues
    pub info: usize,
    /// `true` when no ERROR was found
    pub passed: bool,
    /// `true` when artifacts were emitted
    pub emitted: bool,
    /// Markdown report path
    pub report: String,
    /// Artifacts written in this run
    pub written: Vec<String>,
    /// Artifacts already up to date
    pub unchanged: Vec<String>,
    /// Process exit code
    pub exit_code: i32,
}

impl RunSummary {
    fn new(mode: Mode, project: &Project, analysis: &Analysis, report: &Path) -> Self {
        let outcome = &analysis.outcome;
        let passed = !outcome.has_fatal_errors();
        let exit_code = if passed {
            ExitCode::SUCCESS
        } else {
            ExitCode::VALIDATION_FAILED
        };

        Self {
            mode,
            project_root: project.paths.project_root.display().to_string(),
            modules: analysis.set.modules.len(),
            drivers: analysis.set.drivers.len(),
            input_errors: analysis.set.failures.len(),
            errors: outcome.count(Severity::Error),
            warnings: outcome.count(Severity::Warning),
            info: outcome.count(Severity::Info),
            passed,
            emitted: false,
            report: report.display().to_string(),
            written: Vec::new(),
            unchanged: Vec::new(),
            exit_code: exit_code.as_i32(),
        }
    }

    /// Exit code for the process.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        ExitCode::from_i32(self.exit_code)
    }

    fn record_export(&mut self, export: &ExportSummary) {
        let display = |files: &[ExportedFile]| {
            files
                .iter()
                .map(|f| f.path.display().to_string())
                .collect::<Vec<_>>()
        };
        self.emitted = true;
        self.written = display(&export.written);
        self.unchanged = display(&export.unchanged);
    }
}

#[derive(Serialize)]
struct RunLog<'a> {
    generator: &'static str,
    version: &'static str,
    timestamp: String,
    summary: &'a RunSummary,
    artifacts: &'a [ExportedFile],
}

/// Runs the pipeline.
///
/// # Errors
///
/// Returns an error for environment failures: missing project root,
/// invalid configuration or schema, unwritable report or output
/// directories, or a template failure.
pub fn run(options: &PipelineOptions, mode: Mode) -> Result<RunSummary> {
    let project = Project::open(options)?;
    let analysis = project.analyze().context("failed to load manifests")?;
    let report = project
        .write_report(&analysis)
        .context("failed to write validation report")?;

    let mut summary = RunSummary::new(mode, &project, &analysis, &report);
    let mut artifacts = Vec::new();

    if mode == Mode::Generate {
        let fatal = analysis.outcome.has_fatal_errors();
        if fatal && !project.config.generation.emit_on_error {
            error!("Manifest validation failed; generated files left untouched");
        } else {
            if fatal {
                warn!("Emitting artifacts despite validation errors (emit_on_error)");
            }
            let export = project
                .emit(&analysis)
                .context("failed to emit generated artifacts")?;
            summary.record_export(&export);
            artifacts = export.all().cloned().collect();
            info!(
                "Generation complete: {} written, {} unchanged",
                export.written.len(),
                export.unchanged.len()
            );
        }
    }

    project.write_run_log(&summary, &artifacts)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_root() {
        let err = Project::open(&PipelineOptions::new("/nonexistent/firmware")).unwrap_err();
        assert!(matches!(err, Error::ProjectRootNotFound { .. }));
    }

    #[test]
    fn test_open_root_is_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("forge.toml");
        fs::write(&file, "").unwrap();
        let err = Project::open(&PipelineOptions::new(&file)).unwrap_err();
        assert!(err.is_environment_error());
    }

    #[test]
    fn test_open_applies_overrides() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("forge.toml"),
            "[generation]\nnamespace = \"Fridge\"\n",
        )
        .unwrap();

        let mut options = PipelineOptions::new(temp.path());
        options.output_dir = Some(PathBuf::from("out"));
        options.emit_on_error = true;
        let project = Project::open(&options).unwrap();

        assert_eq!(project.config.generation.namespace, "Fridge");
        assert!(project.config.generation.emit_on_error);
        assert!(project.paths.output_dir.ends_with("out"));
    }

    #[test]
    fn test_open_explicit_config() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("ci.toml");
        fs::write(&config, "[paths]\nreport_dir = \"reports\"\n").unwrap();

        let mut options = PipelineOptions::new(temp.path());
        options.config_path = Some(config);
        let project = Project::open(&options).unwrap();
        assert!(project.paths.report_dir.ends_with("reports"));
    }

    #[test]
    fn test_open_invalid_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("forge.toml"), "[paths]\nunknown = 1\n").unwrap();
        let err = Project::open(&PipelineOptions::new(temp.path())).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_empty_project_passes() {
        let temp = TempDir::new().unwrap();
        let summary = run(&PipelineOptions::new(temp.path()), Mode::Validate).unwrap();
        assert!(summary.passed);
        assert_eq!(summary.modules, 0);
        assert_eq!(summary.exit_code(), ExitCode::SUCCESS);
        assert!(!summary.emitted);
        assert!(temp.path().join("build").join(RUN_LOG_FILE).exists());
    }
}
