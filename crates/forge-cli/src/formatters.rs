//! Output formatters for CLI commands.
//!
//! Every command builds a serializable result and prints it in one of three
//! shapes: pretty JSON for tooling, flat `key: value` lines for shell
//! scripts, or a colored tree for people.

use anyhow::Result;
use colored::Colorize;
use forge_core::cli::OutputFormat;
use serde::Serialize;
use serde_json::Value;

/// Formats data according to the specified output format.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Examples
///
/// ```
/// use forge_cli::formatters::format_output;
/// use forge_core::cli::OutputFormat;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Counts {
///     modules: usize,
///     passed: bool,
/// }
///
/// let counts = Counts { modules: 3, passed: true };
/// let output = format_output(&counts, OutputFormat::Text)?;
/// assert_eq!(output, "modules: 3\npassed: true");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Formats data as JSON with 2-space indentation.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

/// Plain text output formatting.
pub mod text {
    use super::{Result, Serialize, Value};

    /// Formats data as one `dotted.key: value` line per leaf.
    ///
    /// Array elements are addressed by index. Suitable for `grep` and `cut`.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut lines = Vec::new();
        flatten(&value, "", &mut lines);
        Ok(lines.join("\n"))
    }

    fn flatten(value: &Value, prefix: &str, lines: &mut Vec<String>) {
        let key = |child: &str| {
            if prefix.is_empty() {
                child.to_string()
            } else {
                format!("{prefix}.{child}")
            }
        };

        match value {
            Value::Object(map) if !map.is_empty() => {
                for (name, child) in map {
                    flatten(child, &key(name), lines);
                }
            }
            Value::Array(items) if !items.is_empty() => {
                for (i, child) in items.iter().enumerate() {
                    flatten(child, &key(&i.to_string()), lines);
                }
            }
            Value::String(s) => lines.push(format!("{prefix}: {s}")),
            other => lines.push(format!("{prefix}: {other}")),
        }
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, Result, Serialize, Value};

    /// Formats data as an indented, colorized tree.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut out = Vec::new();
        render(&value, 0, &mut out);
        Ok(out.join("\n"))
    }

    fn scalar(value: &Value) -> String {
        match value {
            Value::Null => "-".dimmed().to_string(),
            Value::Bool(true) => "yes".green().to_string(),
            Value::Bool(false) => "no".yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => s.clone(),
            Value::Array(_) => "[]".dimmed().to_string(),
            Value::Object(_) => "{}".dimmed().to_string(),
        }
    }

    fn is_leaf(value: &Value) -> bool {
        match value {
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            _ => true,
        }
    }

    fn render(value: &Value, depth: usize, out: &mut Vec<String>) {
        let indent = "  ".repeat(depth);
        match value {
            Value::Object(map) if !map.is_empty() => {
                for (key, child) in map {
                    let label = key.replace('_', " ");
                    if is_leaf(child) {
                        out.push(format!("{indent}{}: {}", label.bold(), scalar(child)));
                    } else {
                        out.push(format!("{indent}{}:", label.bold()));
                        render(child, depth + 1, out);
                    }
                }
            }
            Value::Array(items) if !items.is_empty() => {
                for item in items {
                    if is_leaf(item) {
                        out.push(format!("{indent}- {}", scalar(item)));
                    } else {
                        out.push(format!("{indent}-"));
                        render(item, depth + 1, out);
                    }
                }
            }
            leaf => out.push(format!("{indent}{}", scalar(leaf))),
        }
    }
}
