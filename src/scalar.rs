//! Scalar typing, quoting and value coercion.

use crate::value::Value;

/// Style of scalar representation in YAML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    /// Plain scalar (no quotes)
    Plain,
    /// Single-quoted scalar
    SingleQuoted,
    /// Double-quoted scalar
    DoubleQuoted,
    /// Literal or folded block scalar (`|` / `>`)
    Block,
}

/// Primitive kind of a scalar, inferred from its lexical form at parse time.
///
/// The inferred kind is the authority for coercion of incoming values; the
/// caller-supplied replacement text never widens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// String value
    String,
    /// Integer value
    Integer,
    /// Float value
    Float,
    /// Boolean value
    Boolean,
    /// Null value
    Null,
}

/// Infer the kind of a scalar from its style and unquoted text.
pub fn infer_kind(style: ScalarStyle, text: &str) -> ScalarKind {
    if style != ScalarStyle::Plain {
        return ScalarKind::String;
    }
    match text {
        "" | "~" | "null" | "Null" | "NULL" => ScalarKind::Null,
        "true" | "false" | "True" | "False" | "TRUE" | "FALSE" => ScalarKind::Boolean,
        _ => {
            if text.parse::<i64>().is_ok() {
                ScalarKind::Integer
            } else if is_float(text) {
                ScalarKind::Float
            } else {
                ScalarKind::String
            }
        }
    }
}

// Floats must carry a digit; "inf"/"nan" words stay strings.
fn is_float(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_digit()) && text.parse::<f64>().is_ok()
}

/// Convert the typed representation of a scalar's current content.
pub fn typed_value(kind: ScalarKind, text: &str) -> Value {
    match kind {
        ScalarKind::Integer => text
            .parse::<i64>()
            .map(Value::Int)
            .unwrap_or_else(|_| Value::String(text.to_string())),
        ScalarKind::Float => text
            .parse::<f64>()
            .map(Value::Float)
            .unwrap_or_else(|_| Value::String(text.to_string())),
        ScalarKind::Boolean => Value::Bool(matches!(text, "true" | "True" | "TRUE")),
        ScalarKind::Null => Value::Null,
        ScalarKind::String => Value::String(text.to_string()),
    }
}

/// The outcome of coercing an incoming text against an existing scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    /// The typed value to record in the change log.
    pub value: Value,
    /// The canonical text to store in the document.
    pub text: String,
    /// The scalar kind after the update.
    pub kind: ScalarKind,
}

/// Coerce `new_text` to match the kind of an existing scalar.
///
/// Coercion never fails: when a numeric target cannot parse the incoming
/// text the value deliberately degrades to a plain string instead of
/// aborting the batch. The degradation is visible to callers through the
/// recorded change's typed value.
pub fn coerce(new_text: &str, existing_kind: ScalarKind) -> Coerced {
    match existing_kind {
        ScalarKind::Boolean => {
            let truthy = matches!(
                new_text.trim().to_lowercase().as_str(),
                "true" | "yes" | "1"
            );
            Coerced {
                value: Value::Bool(truthy),
                text: if truthy { "true" } else { "false" }.to_string(),
                kind: ScalarKind::Boolean,
            }
        }
        ScalarKind::Integer => match new_text.parse::<i64>() {
            Ok(n) => Coerced {
                value: Value::Int(n),
                text: new_text.to_string(),
                kind: ScalarKind::Integer,
            },
            Err(_) => Coerced {
                value: Value::String(new_text.to_string()),
                text: new_text.to_string(),
                kind: ScalarKind::String,
            },
        },
        ScalarKind::Float => match new_text.parse::<f64>() {
            Ok(f) => Coerced {
                value: Value::Float(f),
                text: new_text.to_string(),
                kind: ScalarKind::Float,
            },
            Err(_) => Coerced {
                value: Value::String(new_text.to_string()),
                text: new_text.to_string(),
                kind: ScalarKind::String,
            },
        },
        ScalarKind::String | ScalarKind::Null => Coerced {
            value: Value::String(new_text.to_string()),
            text: new_text.to_string(),
            kind: ScalarKind::String,
        },
    }
}

/// Whether a value written as a plain scalar would be misread.
pub(crate) fn needs_quoting(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    let lowercase = value.to_lowercase();
    if matches!(
        lowercase.as_str(),
        "true" | "false" | "yes" | "no" | "on" | "off" | "null" | "~"
    ) {
        return true;
    }
    for ch in value.chars() {
        if matches!(ch, '#' | '&' | '*' | '|' | '>' | '\'' | '"' | '%' | '@' | '`') {
            return true;
        }
    }
    if value.contains(": ") || value.ends_with(':') {
        return true;
    }
    if let Some(first) = value.chars().next() {
        match first {
            '?' | '[' | ']' | '{' | '}' | ',' | '!' => return true,
            // "-1.5" is a fine plain scalar, "- x" and "-" are not.
            '-' if value.len() == 1
                || value.chars().nth(1).is_some_and(|c| c.is_whitespace()) =>
            {
                return true
            }
            _ => {}
        }
    }
    value != value.trim()
}

/// Render `text` in the given style, escaping as needed.
pub(crate) fn render_in_style(text: &str, style: ScalarStyle, kind: ScalarKind) -> String {
    match style {
        ScalarStyle::SingleQuoted => to_single_quoted(text),
        ScalarStyle::DoubleQuoted => to_double_quoted(text),
        ScalarStyle::Plain | ScalarStyle::Block => {
            if kind == ScalarKind::String && needs_quoting(text) {
                to_single_quoted(text)
            } else {
                text.to_string()
            }
        }
    }
}

fn to_single_quoted(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn to_double_quoted(text: &str) -> String {
    let mut result = String::from("\"");
    for ch in text.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

/// Strip quotes and resolve escapes for a quoted token's text.
pub(crate) fn unquote(token_text: &str) -> (String, ScalarStyle) {
    let t = token_text;
    if t.len() >= 2 && t.starts_with('\'') && t.ends_with('\'') {
        let inner = &t[1..t.len() - 1];
        (inner.replace("''", "'"), ScalarStyle::SingleQuoted)
    } else if t.len() >= 2 && t.starts_with('"') && t.ends_with('"') {
        (
            unescape_double_quoted(&t[1..t.len() - 1]),
            ScalarStyle::DoubleQuoted,
        )
    } else {
        (t.to_string(), ScalarStyle::Plain)
    }
}

/// Unescape a double-quoted string (the common escapes only).
fn unescape_double_quoted(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some('/') => result.push('/'),
                Some('0') => result.push('\0'),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(ch);
        }
    }
    result
}
