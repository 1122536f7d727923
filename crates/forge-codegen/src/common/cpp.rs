//! C++ rendering helpers.
//!
//! Every manifest string that ends up inside generated C++ goes through
//! one of these functions before it reaches a template; templates never
//! see raw manifest text.

use forge_core::identifier::{constant_name, is_valid_identifier};
use std::fmt::Write as _;

/// Escapes a value for embedding in a C/C++ string literal.
///
/// Backslashes, double quotes and ASCII control characters are escaped.
/// Control characters without a short escape use three-digit octal, which
/// cannot run into a following digit the way `\x` escapes do.
///
/// # Examples
///
/// ```
/// use forge_codegen::common::cpp::escape_c_string;
///
/// assert_eq!(escape_c_string(r#"say "hi""#), r#"say \"hi\""#);
/// assert_eq!(escape_c_string("C:\\fw"), "C:\\\\fw");
/// assert_eq!(escape_c_string("line\nnext"), "line\\nnext");
/// ```
#[must_use]
pub fn escape_c_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_ascii_control() => {
                let _ = write!(escaped, "\\{:03o}", u32::from(c));
            }
            c => escaped.push(c),
        }
    }
    escaped
}

/// Makes free text safe for a single-line or block comment.
#[must_use]
pub fn comment_text(value: &str) -> String {
    value
        .split(['\n', '\r'])
        .filter(|line| !line.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
        .replace("*/", "* /")
}

/// Upper-cases a manifest value for use as an enumerator, falling back
/// when the result would not be a valid identifier.
///
/// # Examples
///
/// ```
/// use forge_codegen::common::cpp::enumerator;
///
/// assert_eq!(enumerator("admin", "USER"), "ADMIN");
/// assert_eq!(enumerator("not valid", "USER"), "USER");
/// ```
#[must_use]
pub fn enumerator(value: &str, fallback: &str) -> String {
    let name = constant_name(value.trim());
    if is_valid_identifier(&name) {
        name
    } else {
        fallback.to_string()
    }
}

/// C++ types used for one payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CppType {
    /// Parameter type in helper signatures
    pub param: &'static str,
    /// Value type used when extracting from the event JSON
    pub value: &'static str,
    /// Default value expression for a missing field
    pub default: &'static str,
}

const JSON_TYPE: CppType = CppType {
    param: "const nlohmann::json&",
    value: "nlohmann::json",
    default: "nullptr",
};

impl CppType {
    /// Maps a manifest payload `type` to C++ types.
    ///
    /// Only the declared type is consulted. Unknown or missing types fall
    /// back to a JSON value.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_codegen::common::cpp::CppType;
    ///
    /// assert_eq!(CppType::for_payload("number").param, "float");
    /// assert_eq!(CppType::for_payload("uint8").param, "uint8_t");
    /// assert_eq!(CppType::for_payload("").param, "const nlohmann::json&");
    /// ```
    #[must_use]
    pub fn for_payload(declared: &str) -> Self {
        let (param, value, default) = match declared.trim().to_ascii_lowercase().as_str() {
            "string" => ("const std::string&", "std::string", "\"\""),
            "float" | "number" | "double" => ("float", "float", "0.0f"),
            "integer" | "int" | "int32" => ("int32_t", "int32_t", "0"),
            "uint8" => ("uint8_t", "uint8_t", "0"),
            "uint16" => ("uint16_t", "uint16_t", "0"),
            "uint32" => ("uint32_t", "uint32_t", "0"),
            "uint64" => ("uint64_t", "uint64_t", "0"),
            "boolean" | "bool" => ("bool", "bool", "false"),
            _ => return JSON_TYPE,
        };
        Self {
            param,
            value,
            default,
        }
    }
}

/// Returns the UI component class for a declared component type.
///
/// # Examples
///
/// ```
/// use forge_codegen::common::cpp::component_class;
///
/// assert_eq!(component_class("slider"), "SliderComponent");
/// assert_eq!(component_class("gauge"), "TextComponent");
/// ```
#[must_use]
pub fn component_class(component_type: &str) -> &'static str {
    match component_type {
        "slider" => "SliderComponent",
        "dropdown" => "DropdownComponent",
        "button" => "ButtonComponent",
        "toggle" => "ToggleComponent",
        "chart" => "ChartComponent",
        _ => "TextComponent",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_control_characters_use_octal() {
        assert_eq!(escape_c_string("a\u{1}1"), "a\\0011");
        assert_eq!(escape_c_string("tab\there"), "tab\\there");
        assert_eq!(escape_c_string("\r"), "\\r");
    }

    #[test]
    fn test_escape_leaves_unicode_alone() {
        assert_eq!(escape_c_string("Температура °C"), "Температура °C");
    }

    #[test]
    fn test_escape_quote_backslash_combination() {
        let raw = r#"path "C:\temp""#;
        assert_eq!(escape_c_string(raw), r#"path \"C:\\temp\""#);
    }

    #[test]
    fn test_comment_text_cannot_close_block() {
        assert_eq!(comment_text("evil */ code"), "evil * / code");
        assert_eq!(comment_text("first\n  second\r\n"), "first second");
    }

    #[test]
    fn test_enumerator_fallback() {
        assert_eq!(enumerator("high", "MEDIUM"), "HIGH");
        assert_eq!(enumerator("", "MEDIUM"), "MEDIUM");
        assert_eq!(enumerator("very-high", "MEDIUM"), "MEDIUM");
    }

    #[test]
    fn test_payload_type_map() {
        let cases = [
            ("string", "const std::string&"),
            ("float", "float"),
            ("double", "float"),
            ("integer", "int32_t"),
            ("int32", "int32_t"),
            ("uint16", "uint16_t"),
            ("uint32", "uint32_t"),
            ("uint64", "uint64_t"),
            ("boolean", "bool"),
            ("BOOL", "bool"),
            ("object", "const nlohmann::json&"),
            ("timestamp", "const nlohmann::json&"),
        ];
        for (declared, expected) in cases {
            assert_eq!(CppType::for_payload(declared).param, expected, "{declared}");
        }
        assert_eq!(CppType::for_payload("string").default, "\"\"");
        assert_eq!(CppType::for_payload("bool").value, "bool");
    }

    #[test]
    fn test_component_class_map() {
        assert_eq!(component_class("text"), "TextComponent");
        assert_eq!(component_class("dropdown"), "DropdownComponent");
        assert_eq!(component_class("button"), "ButtonComponent");
        assert_eq!(component_class("toggle"), "ToggleComponent");
        assert_eq!(component_class("chart"), "ChartComponent");
        assert_eq!(component_class(""), "TextComponent");
    }
}
