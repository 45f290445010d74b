//! Common utilities for Swift code generation.
//!
//! Identifier shaping and string escaping shared by synthesis and printing.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Swift keywords that must be escaped with backticks when used as identifiers.
pub static SWIFT_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "as",
        "associatedtype",
        "break",
        "case",
        "catch",
        "class",
        "continue",
        "default",
        "defer",
        "deinit",
        "do",
        "else",
        "enum",
        "extension",
        "fallthrough",
        "false",
        "fileprivate",
        "for",
        "func",
        "guard",
        "if",
        "import",
        "in",
        "init",
        "inout",
        "internal",
        "is",
        "let",
        "nil",
        "operator",
        "private",
        "protocol",
        "public",
        "repeat",
        "rethrows",
        "return",
        "self",
        "Self",
        "static",
        "struct",
        "subscript",
        "super",
        "switch",
        "throw",
        "throws",
        "true",
        "try",
        "typealias",
        "var",
        "where",
        "while",
    ]
    .into_iter()
    .collect()
});

/// Wrap `name` in backticks when it is a Swift keyword.
pub fn escape_identifier(name: &str) -> String {
    if SWIFT_RESERVED_WORDS.contains(name) {
        format!("`{name}`")
    } else {
        name.to_string()
    }
}

/// Escape a string for use inside a Swift string literal.
pub fn escape_swift_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Lower camel case identifier from a snake_case schema name.
///
/// `geomcolor_color3` becomes `geomcolorColor3`. Characters that cannot
/// appear in an identifier act as separators; a leading digit gets an
/// underscore prefix.
pub fn lower_camel_case(name: &str) -> String {
    let mut result = String::new();
    for part in name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|p| !p.is_empty())
    {
        if result.is_empty() {
            result.push_str(part);
        } else {
            result.push_str(&capitalize_first(part));
        }
    }

    if result.is_empty() {
        return "_empty".to_string();
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
