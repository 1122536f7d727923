//! CLI argument definitions and parsing.
//!
//! Defines the command-line interface structure using clap:
//! - `Cli` - Main CLI entry point
//! - `Commands` - Available subcommands
//! - `ProjectArgs` - Project location flags shared by pipeline commands

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Manifest-driven code generator for modular ESP32 firmware.
///
/// Reads every module and driver manifest in a firmware tree, checks that
/// their contracts agree, and regenerates the registration code, contract
/// header and documentation.
#[derive(Parser, Debug)]
#[command(name = "manifest-forge")]
#[command(version, about, long_about = None)]
#[command(author = "Manifest Forge Team")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    pub format: String,
}

/// Where the firmware project lives and how it is configured.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Firmware project root
    #[arg(long, env = "MANIFEST_FORGE_ROOT", default_value = ".")]
    pub project_root: PathBuf,

    /// Configuration file (default: <project-root>/forge.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate manifests and regenerate all artifacts.
    ///
    /// Runs discovery, parsing, and consistency validation, writes the
    /// validation report, and emits the generated sources only when no
    /// ERROR was found.
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Regenerate from the current firmware tree
    /// manifest-forge generate
    ///
    /// # Explicit root and output directory
    /// manifest-forge generate --project-root ~/fw --output-dir main/generated
    /// ```
    Generate {
        /// Project location
        #[command(flatten)]
        project: ProjectArgs,

        /// Directory for generated C++ sources, relative to the project root
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Emit artifacts even when validation reports errors
        #[arg(long)]
        emit_on_error: bool,
    },

    /// Validate manifests and write the report without generating code.
    Validate {
        /// Project location
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// List parsed modules, or show one module's contract.
    ///
    /// # Examples
    ///
    /// ```bash
    /// manifest-forge inspect
    /// manifest-forge inspect SensorManager
    /// ```
    Inspect {
        /// Module to show in detail
        module: Option<String>,

        /// Project location
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Generate shell completions.
    ///
    /// Generates completion scripts for various shells that can be
    /// sourced or saved to enable tab completion for this CLI.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_generate_defaults() {
        let cli = Cli::parse_from(["manifest-forge", "generate"]);
        if let Commands::Generate {
            project,
            output_dir,
            emit_on_error,
        } = cli.command
        {
            assert_eq!(project.project_root, PathBuf::from("."));
            assert!(project.config.is_none());
            assert!(output_dir.is_none());
            assert!(!emit_on_error);
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn test_cli_parsing_generate_flags() {
        let cli = Cli::parse_from([
            "manifest-forge",
            "generate",
            "--project-root",
            "/fw",
            "--output-dir",
            "out",
            "--config",
            "/fw/ci.toml",
            "--emit-on-error",
        ]);
        if let Commands::Generate {
            project,
            output_dir,
            emit_on_error,
        } = cli.command
        {
            assert_eq!(project.project_root, PathBuf::from("/fw"));
            assert_eq!(project.config, Some(PathBuf::from("/fw/ci.toml")));
            assert_eq!(output_dir, Some(PathBuf::from("out")));
            assert!(emit_on_error);
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn test_cli_parsing_validate() {
        let cli = Cli::parse_from(["manifest-forge", "validate", "--project-root", "/fw"]);
        assert!(matches!(cli.command, Commands::Validate { .. }));
    }

    #[test]
    fn test_cli_parsing_inspect() {
        let cli = Cli::parse_from(["manifest-forge", "inspect"]);
        assert!(matches!(cli.command, Commands::Inspect { module: None, .. }));

        let cli = Cli::parse_from(["manifest-forge", "inspect", "Sensors"]);
        if let Commands::Inspect { module, .. } = cli.command {
            assert_eq!(module.as_deref(), Some("Sensors"));
        } else {
            panic!("Expected Inspect command");
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from(["manifest-forge", "validate", "-v", "--format", "json"]);
        assert!(cli.verbose);
        assert_eq!(cli.format, "json");
    }

    #[test]
    fn test_cli_output_format_default() {
        let cli = Cli::parse_from(["manifest-forge", "validate"]);
        assert_eq!(cli.format, "pretty");
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::parse_from(["manifest-forge", "completions", "zsh"]);
        if let Commands::Completions { shell } = cli.command {
            assert_eq!(shell, Shell::Zsh);
        } else {
            panic!("Expected Completions command");
        }
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["manifest-forge", "deploy"]).is_err());
    }
}
