//! Identifier transforms for generated source.
//!
//! Event names and state keys are flat dotted strings such as
//! `sensor.updated`. Generated headers expose them as constants named by a
//! fixed transform: uppercase, every `.` replaced by `_`. The transform is
//! not injective (`a.b` and `a_b` both become `A_B`), so collisions are
//! checked by the validator rather than assumed away.
//!
//! # Examples
//!
//! ```
//! use forge_core::identifier::{camel_case, constant_name, is_valid_identifier, pascal_case};
//!
//! assert_eq!(constant_name("sensor.updated"), "SENSOR_UPDATED");
//! assert!(is_valid_identifier("SENSOR_UPDATED"));
//! assert_eq!(pascal_case("sensor.updated"), "SensorUpdated");
//! assert_eq!(camel_case("sensor_id"), "sensorId");
//! ```
//!
//! The helper transforms are lossy as well: `sensor.updated` and
//! `sensorUpdated` share `SensorUpdated`, and `sensor_id` and `sensorId`
//! share `sensorId`.

use regex::Regex;
use std::sync::LazyLock;

static C_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

/// Converts a dotted key into its generated constant name.
///
/// # Examples
///
/// ```
/// use forge_core::identifier::constant_name;
///
/// assert_eq!(constant_name("temp.evap"), "TEMP_EVAP");
/// assert_eq!(constant_name("a_b"), "A_B");
/// ```
#[must_use]
pub fn constant_name(key: &str) -> String {
    key.to_uppercase().replace('.', "_")
}

/// Returns `true` if `ident` is a valid C/C++ identifier.
///
/// # Examples
///
/// ```
/// use forge_core::identifier::is_valid_identifier;
///
/// assert!(is_valid_identifier("TEMP_EVAP"));
/// assert!(!is_valid_identifier("SENSOR-X"));
/// assert!(!is_valid_identifier("1_WIRE"));
/// ```
#[must_use]
pub fn is_valid_identifier(ident: &str) -> bool {
    C_IDENTIFIER.is_match(ident)
}

/// Converts a dotted or snake-case key into `PascalCase`.
///
/// Used to name typed helper methods (`publishSensorUpdated`).
///
/// # Examples
///
/// ```
/// use forge_core::identifier::pascal_case;
///
/// assert_eq!(pascal_case("climate.temp_changed"), "ClimateTempChanged");
/// ```
#[must_use]
pub fn pascal_case(key: &str) -> String {
    key.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_ascii_uppercase().to_string() + chars.as_str()
            })
        })
        .collect()
}

/// Converts a payload field name into a `camelCase` parameter name.
///
/// The result never contains `_`, so it cannot clash with snake-case
/// locals in generated helpers.
///
/// # Examples
///
/// ```
/// use forge_core::identifier::camel_case;
///
/// assert_eq!(camel_case("sensor_id"), "sensorId");
/// assert_eq!(camel_case("Value"), "value");
/// assert_eq!(camel_case("2nd"), "field2nd");
/// ```
#[must_use]
pub fn camel_case(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    for (i, part) in field
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .enumerate()
    {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                name.push(first.to_ascii_lowercase());
            } else {
                name.push(first.to_ascii_uppercase());
            }
            name.push_str(chars.as_str());
        }
    }

    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, "field");
    }
    name
}

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "co_await", "co_return",
    "co_yield", "compl", "concept", "const", "const_cast", "consteval", "constexpr", "constinit",
    "continue", "decltype", "default", "delete", "do", "double", "dynamic_cast", "else", "enum",
    "explicit", "export", "extern", "false", "float", "for", "friend", "goto", "if", "inline",
    "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq", "nullptr",
    "operator", "or", "or_eq", "private", "protected", "public", "register", "reinterpret_cast",
    "requires", "return", "short", "signed", "sizeof", "static", "static_assert", "static_cast",
    "struct", "switch", "template", "this", "thread_local", "throw", "true", "try", "typedef",
    "typeid", "typename", "union", "unsigned", "using", "virtual", "void", "volatile", "wchar_t",
    "while", "xor", "xor_eq",
];

/// Returns `true` if `ident` is a reserved C++ keyword and cannot name a
/// variable or parameter.
///
/// # Examples
///
/// ```
/// use forge_core::identifier::is_cpp_keyword;
///
/// assert!(is_cpp_keyword("class"));
/// assert!(!is_cpp_keyword("sensorId"));
/// ```
#[must_use]
pub fn is_cpp_keyword(ident: &str) -> bool {
    CPP_KEYWORDS.contains(&ident)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_name_collision_is_possible() {
        assert_eq!(constant_name("a.b"), constant_name("a_b"));
        assert_eq!(constant_name("a.b"), "A_B");
    }

    #[test]
    fn test_constant_name_multiple_dots() {
        assert_eq!(constant_name("system.heartbeat.tick"), "SYSTEM_HEARTBEAT_TICK");
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("A B"));
        assert!(!is_valid_identifier("9LIVES"));
        assert!(is_valid_identifier("_PRIVATE"));
    }

    #[test]
    fn test_pascal_case_mixed_separators() {
        assert_eq!(pascal_case("sensor.updated"), "SensorUpdated");
        assert_eq!(pascal_case("ui-button.pressed"), "UiButtonPressed");
        assert_eq!(pascal_case("..."), "");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("temperature"), "temperature");
        assert_eq!(camel_case("error_code"), "errorCode");
        assert_eq!(camel_case("sensor.value"), "sensorValue");
        assert_eq!(camel_case("__"), "field");
    }

    #[test]
    fn test_helper_names_collide() {
        assert_eq!(pascal_case("sensor.updated"), pascal_case("sensorUpdated"));
        assert_ne!(constant_name("sensor.updated"), constant_name("sensorUpdated"));
        assert_eq!(camel_case("sensor_id"), camel_case("sensorId"));
    }

    #[test]
    fn test_keywords() {
        for word in ["class", "default", "delete", "new", "int"] {
            assert!(is_cpp_keyword(word), "{word}");
        }
        assert!(!is_cpp_keyword("value"));
        assert!(!is_cpp_keyword("Class"));
    }
}
