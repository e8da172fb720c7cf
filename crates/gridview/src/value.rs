//! Row values and HTML-safety helpers.

use std::fmt;

use gridview_seeker::{Number, Value};
use serde::Serialize;

/// A value read from a row.
///
/// `Nice` and `Html` stand in for richer field objects: the former has a
/// human readable presentation that still needs escaping, the latter renders
/// itself and its output is trusted as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataValue {
    #[default]
    Null,
    Text(String),
    Int(i64),
    Decimal(f64),
    Bool(bool),
    Nice(String),
    Html(String),
}

impl DataValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Raw text of the value, without any escaping. `Null` and `false` are
    /// empty and `true` is `1`, so an uncast flag column shows blank cells
    /// for unset flags. Cast with `Boolean` for `Yes`/`No`.
    pub fn as_plain_text(&self) -> String {
        match self {
            DataValue::Null => String::new(),
            DataValue::Text(s) | DataValue::Nice(s) | DataValue::Html(s) => s.clone(),
            DataValue::Int(n) => n.to_string(),
            DataValue::Decimal(n) => n.to_string(),
            DataValue::Bool(true) => "1".to_string(),
            DataValue::Bool(false) => String::new(),
        }
    }

    /// Numeric view of the value, parsing text when needed.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            DataValue::Int(n) => Some(Number::I64(*n)),
            DataValue::Decimal(n) => Some(Number::F64(*n)),
            DataValue::Bool(b) => Some(Number::I64(i64::from(*b))),
            DataValue::Text(s) | DataValue::Nice(s) => Number::parse(s),
            DataValue::Null | DataValue::Html(_) => None,
        }
    }

    /// Truthiness used by boolean casts: empty, zero and "0" are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            DataValue::Null => false,
            DataValue::Bool(b) => *b,
            DataValue::Int(n) => *n != 0,
            DataValue::Decimal(n) => *n != 0.0,
            DataValue::Text(s) | DataValue::Nice(s) | DataValue::Html(s) => {
                !s.is_empty() && s != "0"
            }
        }
    }

    /// Converts the value for clause evaluation.
    pub fn to_seek_value(&self) -> Value<'static> {
        match self {
            DataValue::Null => Value::None,
            DataValue::Text(s) | DataValue::Nice(s) | DataValue::Html(s) => Value::owned(s.clone()),
            DataValue::Int(n) => Value::Number(Number::I64(*n)),
            DataValue::Decimal(n) => Value::Number(Number::F64(*n)),
            DataValue::Bool(b) => Value::Bool(*b),
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_plain_text())
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::Text(s)
    }
}

impl From<i64> for DataValue {
    fn from(n: i64) -> Self {
        DataValue::Int(n)
    }
}

impl From<i32> for DataValue {
    fn from(n: i32) -> Self {
        DataValue::Int(i64::from(n))
    }
}

impl From<u32> for DataValue {
    fn from(n: u32) -> Self {
        DataValue::Int(i64::from(n))
    }
}

impl From<f64> for DataValue {
    fn from(n: f64) -> Self {
        DataValue::Decimal(n)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(DataValue::Null)
    }
}

impl From<&serde_json::Value> for DataValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => DataValue::Null,
            serde_json::Value::Bool(b) => DataValue::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => DataValue::Int(i),
                None => n.as_f64().map(DataValue::Decimal).unwrap_or(DataValue::Null),
            },
            serde_json::Value::String(s) => DataValue::Text(s.clone()),
            other => DataValue::Text(other.to_string()),
        }
    }
}

/// Escapes text for embedding in HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// Inserts `<br />` before every line break, keeping the break itself.
///
/// `\r\n` and `\n\r` pairs count as one break.
pub fn nl2br(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\n' || ch == '\r' {
            out.push_str("<br />");
            out.push(ch);
            let pair = if ch == '\n' { '\r' } else { '\n' };
            if chars.peek() == Some(&pair) {
                out.push(pair);
                chars.next();
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Escaped text with line breaks, the default treatment of uncast values.
pub fn escape_text_block(text: &str) -> String {
    nl2br(&escape_html(text))
}
