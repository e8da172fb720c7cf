//! Runtime values compared by clauses.
//!
//! A [`Value`] is what an accessor hands back for a field of a row. Strings
//! are held in a [`Cow`] so accessors can either borrow from the row or hand
//! over a freshly built string (computed fields, relation lookups).

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// Field value extracted from a row at evaluation time.
///
/// # Example
///
/// ```
/// use gridview_seeker::{Value, Number};
///
/// struct Team {
///     name: String,
///     founded: u16,
/// }
///
/// fn accessor<'a>(team: &'a Team, field: &str) -> Value<'a> {
///     match field {
///         "Name" => Value::from(team.name.as_str()),
///         "Founded" => Value::Number(Number::from(team.founded)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Text, borrowed from the row or owned.
    String(Cow<'a, str>),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Field missing, null, or not comparable.
    None,
}

impl<'a> Value<'a> {
    /// Builds an owned string value.
    pub fn owned(s: impl Into<String>) -> Value<'static> {
        Value::String(Cow::Owned(s.into()))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns the text, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Reads the value as a flag.
    ///
    /// Stores hand booleans back as `1`/`0` or as text, so numbers are true
    /// when non-zero and text accepts `1`/`true`/`yes`/`on` and
    /// `0`/`false`/`no`/`off` in any case.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => Some(!n.is_zero()),
            Value::String(s) => parse_flag(s),
            Value::None => None,
        }
    }

    /// Detaches the value from the row it was read from.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::String(s) => Value::String(Cow::Owned(s.into_owned())),
            Value::Number(n) => Value::Number(n),
            Value::Bool(b) => Value::Bool(b),
            Value::None => Value::None,
        }
    }
}

fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(Cow::Borrowed(s))
    }
}

impl From<String> for Value<'static> {
    fn from(s: String) -> Self {
        Value::String(Cow::Owned(s))
    }
}

impl From<Number> for Value<'static> {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value<'static> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Numeric value.
///
/// Integers keep their signedness so large values compare exactly; mixed
/// comparisons go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::I64(n) => n == 0,
            Number::U64(n) => n == 0,
            Number::F64(n) => n == 0.0,
        }
    }

    /// Compares two numbers. `None` when either side is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::I64(a), Number::U64(b)) => Some(if a < 0 {
                Ordering::Less
            } else {
                (a as u64).cmp(&b)
            }),
            (Number::U64(a), Number::I64(b)) => Some(if b < 0 {
                Ordering::Greater
            } else {
                a.cmp(&(b as u64))
            }),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Parses submitted text as a number.
    ///
    /// Integers are preferred; anything with a fraction or exponent becomes
    /// `F64`. Surrounding whitespace is ignored.
    pub fn parse(text: &str) -> Option<Number> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Ok(n) = text.parse::<i64>() {
            return Some(Number::I64(n));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Some(Number::U64(n));
        }
        text.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Number::F64)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )+
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrowed_and_owned_strings_compare_equal() {
        let name = String::from("Rovers");
        assert_eq!(Value::from(name.as_str()), Value::owned("Rovers"));
    }

    #[test]
    fn extractors() {
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::Number(Number::I64(3)).as_number(), Some(Number::I64(3)));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::None.as_str(), None);
        assert!(Value::None.is_none());
    }

    #[test]
    fn flags_read_from_stored_encodings() {
        assert_eq!(Value::Bool(false).as_flag(), Some(false));
        assert_eq!(Value::Number(Number::I64(1)).as_flag(), Some(true));
        assert_eq!(Value::Number(Number::F64(0.0)).as_flag(), Some(false));
        assert_eq!(Value::from("Yes").as_flag(), Some(true));
        assert_eq!(Value::from(" 0 ").as_flag(), Some(false));
        assert_eq!(Value::from("maybe").as_flag(), None);
        assert_eq!(Value::None.as_flag(), None);
    }

    #[test]
    fn mixed_sign_comparisons_are_exact() {
        assert_eq!(Number::I64(-1).compare(Number::U64(0)), Some(Ordering::Less));
        assert_eq!(
            Number::U64(u64::MAX).compare(Number::I64(i64::MAX)),
            Some(Ordering::Greater)
        );
        assert_eq!(Number::I64(5).compare(Number::F64(5.0)), Some(Ordering::Equal));
    }

    #[test]
    fn nan_does_not_compare() {
        assert_eq!(Number::F64(f64::NAN).compare(Number::I64(1)), None);
    }

    #[test]
    fn parse_submitted_numbers() {
        assert_eq!(Number::parse(" 42 "), Some(Number::I64(42)));
        assert_eq!(Number::parse("18446744073709551615"), Some(Number::U64(u64::MAX)));
        assert_eq!(Number::parse("2.5"), Some(Number::F64(2.5)));
        assert_eq!(Number::parse("inf"), None);
        assert_eq!(Number::parse("twelve"), None);
        assert_eq!(Number::parse(""), None);
    }

    #[test]
    fn display_matches_source_text() {
        assert_eq!(Number::I64(-7).to_string(), "-7");
        assert_eq!(Number::F64(1.5).to_string(), "1.5");
    }
}
