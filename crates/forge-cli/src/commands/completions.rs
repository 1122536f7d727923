//! Shell completion generation command.
//!
//! Generates shell completion scripts for bash, zsh, fish, and `PowerShell`.

use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use forge_core::cli::ExitCode;
use std::io::{self, Write};
use tracing::info;

/// Writes the completion script for `shell` to `out`.
///
/// # Examples
///
/// ```
/// use clap::Command;
/// use clap_complete::Shell;
/// use forge_cli::commands::completions;
///
/// let mut script = Vec::new();
/// completions::generate_completions(Shell::Bash, &mut Command::new("manifest-forge"), &mut script);
/// assert!(!script.is_empty());
/// ```
pub fn generate_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Runs the completions command, printing the script to stdout.
///
/// # Errors
///
/// This command does not fail; the `Result` keeps the command signatures
/// uniform.
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    info!("Generating {shell} completions");
    generate_completions(shell, cmd, &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::CommandFactory;

    fn script(shell: Shell) -> String {
        let mut out = Vec::new();
        generate_completions(shell, &mut Cli::command(), &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_bash_completions_list_subcommands() {
        let script = script(Shell::Bash);
        assert!(script.contains("manifest-forge"));
        assert!(script.contains("generate"));
        assert!(script.contains("inspect"));
    }

    #[test]
    fn test_other_shells() {
        for shell in [Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
            assert!(!script(shell).is_empty(), "{shell} script is empty");
        }
    }
}
