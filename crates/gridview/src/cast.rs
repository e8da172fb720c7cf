//! Named casts: turn a raw value into safe HTML.
//!
//! A casting definition names a cast type and optionally one of its methods
//! with arguments:
//!
//! ```text
//! Currency
//! Text->FirstSentence
//! Varchar->LimitCharacters(10)
//! ```
//!
//! Without a method the cast's default safe output is used. Cast output is
//! trusted as-is by the column renderer.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{GridError, Result};
use crate::value::{escape_html, escape_text_block, DataValue};

/// A named value converter.
pub trait Caster: Send + Sync {
    /// Default safe HTML for `value`.
    fn xml(&self, value: &DataValue) -> String;

    /// Output of the named method, or `None` if the cast has no such method.
    fn call(&self, method: &str, args: &[String], value: &DataValue) -> Option<String> {
        let _ = args;
        match method {
            "XML" | "forTemplate" => Some(self.xml(value)),
            _ => None,
        }
    }
}

impl<F> Caster for F
where
    F: Fn(&DataValue) -> String + Send + Sync,
{
    fn xml(&self, value: &DataValue) -> String {
        self(value)
    }
}

/// A parsed casting definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastDefinition {
    pub cast: String,
    pub method: Option<String>,
    pub args: Vec<String>,
}

impl FromStr for CastDefinition {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        let (cast, call) = match s.split_once("->") {
            Some((cast, call)) => (cast.trim(), Some(call.trim())),
            None => (s.trim(), None),
        };
        if cast.is_empty() {
            return Err(GridError::UnknownCast(s.to_string()));
        }
        let (method, args) = match call {
            None => (None, Vec::new()),
            Some(call) => match call.split_once('(') {
                None => (Some(call.to_string()), Vec::new()),
                Some((method, rest)) => {
                    let inner = rest.strip_suffix(')').ok_or_else(|| GridError::UnknownCastMethod {
                        cast: cast.to_string(),
                        method: call.to_string(),
                    })?;
                    let args = inner
                        .split(',')
                        .map(|arg| arg.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
                        .filter(|arg| !arg.is_empty())
                        .collect();
                    (Some(method.trim().to_string()), args)
                }
            },
        };
        Ok(CastDefinition {
            cast: cast.to_string(),
            method,
            args,
        })
    }
}

impl fmt::Display for CastDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cast)?;
        if let Some(method) = &self.method {
            write!(f, "->{method}")?;
            if !self.args.is_empty() {
                write!(f, "({})", self.args.join(", "))?;
            }
        }
        Ok(())
    }
}

/// Cast types by name.
#[derive(Clone)]
pub struct CastRegistry {
    casts: HashMap<String, Arc<dyn Caster>>,
}

impl Default for CastRegistry {
    fn default() -> Self {
        CastRegistry::with_defaults()
    }
}

impl fmt::Debug for CastRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.casts.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("CastRegistry").field("casts", &names).finish()
    }
}

impl CastRegistry {
    /// A registry with no casts at all.
    pub fn empty() -> Self {
        CastRegistry {
            casts: HashMap::new(),
        }
    }

    /// A registry with the built-in casts.
    pub fn with_defaults() -> Self {
        let mut registry = CastRegistry::empty();
        registry.register("Varchar", TextCast::plain());
        registry.register("Text", TextCast::multiline());
        registry.register("HTMLText", TextCast::html());
        registry.register("HTMLFragment", TextCast::html());
        registry.register("Int", NumberCast::Int);
        registry.register("Decimal", NumberCast::Decimal);
        registry.register("Currency", NumberCast::Currency);
        registry.register("Boolean", BooleanCast);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, caster: impl Caster + 'static) {
        self.casts.insert(name.into(), Arc::new(caster));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.casts.contains_key(name)
    }

    /// Casts `value` with the given definition.
    pub fn cast(&self, definition: &str, value: &DataValue) -> Result<String> {
        let definition: CastDefinition = definition.parse()?;
        self.cast_with(&definition, value)
    }

    pub fn cast_with(&self, definition: &CastDefinition, value: &DataValue) -> Result<String> {
        let caster = self
            .casts
            .get(&definition.cast)
            .ok_or_else(|| GridError::UnknownCast(definition.cast.clone()))?;
        match &definition.method {
            None => Ok(caster.xml(value)),
            Some(method) => caster
                .call(method, &definition.args, value)
                .ok_or_else(|| GridError::UnknownCastMethod {
                    cast: definition.cast.clone(),
                    method: method.clone(),
                }),
        }
    }
}

/// String casts.
#[derive(Debug, Clone, Copy)]
struct TextCast {
    line_breaks: bool,
    trusted: bool,
}

impl TextCast {
    fn plain() -> Self {
        TextCast {
            line_breaks: false,
            trusted: false,
        }
    }

    fn multiline() -> Self {
        TextCast {
            line_breaks: true,
            trusted: false,
        }
    }

    fn html() -> Self {
        TextCast {
            line_breaks: false,
            trusted: true,
        }
    }

    fn output(&self, text: &str) -> String {
        match (self.trusted, self.line_breaks) {
            (true, _) => text.to_string(),
            (false, true) => escape_text_block(text),
            (false, false) => escape_html(text),
        }
    }
}

impl Caster for TextCast {
    fn xml(&self, value: &DataValue) -> String {
        self.output(&value.as_plain_text())
    }

    fn call(&self, method: &str, args: &[String], value: &DataValue) -> Option<String> {
        let text = value.as_plain_text();
        let result = match method {
            "XML" | "forTemplate" => return Some(self.xml(value)),
            "RAW" => return Some(text),
            "FirstSentence" => first_sentence(&text).to_string(),
            "LimitCharacters" => {
                let limit = args.first().and_then(|n| n.parse().ok()).unwrap_or(20);
                let suffix = args.get(1).map(String::as_str).unwrap_or("...");
                limit_characters(&text, limit, suffix)
            }
            "UpperCase" => text.to_uppercase(),
            "LowerCase" => text.to_lowercase(),
            _ => return None,
        };
        Some(self.output(&result))
    }
}

/// Text up to and including the first sentence terminator.
fn first_sentence(text: &str) -> &str {
    let text = text.trim();
    let mut chars = text.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            let at_boundary = chars.peek().map(|(_, next)| next.is_whitespace()).unwrap_or(true);
            if at_boundary {
                return &text[..index + ch.len_utf8()];
            }
        }
    }
    text
}

fn limit_characters(text: &str, limit: usize, suffix: &str) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit).collect();
    format!("{}{suffix}", cut.trim_end())
}

/// Numeric casts. Non-numeric values fall back to escaped text.
#[derive(Debug, Clone, Copy)]
enum NumberCast {
    Int,
    Decimal,
    Currency,
}

impl NumberCast {
    fn nice(&self, value: &DataValue) -> String {
        let Some(number) = value.as_number().map(|n| n.to_f64()) else {
            return escape_html(&value.as_plain_text());
        };
        match self {
            NumberCast::Int => number_format(number, 0),
            NumberCast::Decimal => number_format(number, 2),
            NumberCast::Currency => currency(number, 2),
        }
    }
}

impl Caster for NumberCast {
    fn xml(&self, value: &DataValue) -> String {
        self.nice(value)
    }

    fn call(&self, method: &str, args: &[String], value: &DataValue) -> Option<String> {
        match (self, method) {
            (_, "XML" | "forTemplate" | "Nice") => Some(self.nice(value)),
            (NumberCast::Currency, "Whole") => {
                Some(match value.as_number() {
                    Some(n) => currency(n.to_f64(), 0),
                    None => escape_html(&value.as_plain_text()),
                })
            }
            (NumberCast::Decimal, "Round") => {
                let places = args.first().and_then(|n| n.parse().ok()).unwrap_or(0);
                Some(match value.as_number() {
                    Some(n) => format!("{:.*}", places, n.to_f64()),
                    None => escape_html(&value.as_plain_text()),
                })
            }
            _ => None,
        }
    }
}

/// `Yes` / `No`.
#[derive(Debug, Clone, Copy)]
struct BooleanCast;

impl Caster for BooleanCast {
    fn xml(&self, value: &DataValue) -> String {
        let text = if value.is_truthy() { "Yes" } else { "No" };
        text.to_string()
    }

    fn call(&self, method: &str, _args: &[String], value: &DataValue) -> Option<String> {
        match method {
            "XML" | "forTemplate" | "Nice" => Some(self.xml(value)),
            _ => None,
        }
    }
}

/// Formats with a fixed number of decimals and `,` thousands separators.
pub fn number_format(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + whole.len() / 3 + 1);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn currency(value: f64, decimals: usize) -> String {
    let amount = format!("${}", number_format(value.abs(), decimals));
    if value < 0.0 && number_format(value, decimals).starts_with('-') {
        format!("({amount})")
    } else {
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_definitions() {
        let def: CastDefinition = "Varchar->LimitCharacters(10, '…')".parse().unwrap();
        assert_eq!(def.cast, "Varchar");
        assert_eq!(def.method.as_deref(), Some("LimitCharacters"));
        assert_eq!(def.args, vec!["10".to_string(), "…".to_string()]);
        assert_eq!(def.to_string(), "Varchar->LimitCharacters(10, …)");

        let def: CastDefinition = "Currency".parse().unwrap();
        assert_eq!(def.method, None);
        assert!("Text->Broken(1".parse::<CastDefinition>().is_err());
    }

    #[test]
    fn number_formatting() {
        assert_eq!(number_format(1234.5, 2), "1,234.50");
        assert_eq!(number_format(1234567.0, 0), "1,234,567");
        assert_eq!(number_format(-999.0, 0), "-999");
        assert_eq!(number_format(-0.001, 2), "0.00");
        assert_eq!(number_format(12.0, 0), "12");
    }

    #[test]
    fn currency_casts() {
        let casts = CastRegistry::with_defaults();
        assert_eq!(casts.cast("Currency", &DataValue::Decimal(1234.5)).unwrap(), "$1,234.50");
        assert_eq!(casts.cast("Currency", &DataValue::Int(-20)).unwrap(), "($20.00)");
        assert_eq!(casts.cast("Currency->Whole", &DataValue::Decimal(9.6)).unwrap(), "$10");
        assert_eq!(casts.cast("Currency", &DataValue::from("n/a")).unwrap(), "n/a");
    }

    #[test]
    fn boolean_casts() {
        let casts = CastRegistry::with_defaults();
        assert_eq!(casts.cast("Boolean", &DataValue::Bool(true)).unwrap(), "Yes");
        assert_eq!(casts.cast("Boolean->Nice", &DataValue::from("0")).unwrap(), "No");
        assert_eq!(casts.cast("Boolean", &DataValue::Null).unwrap(), "No");
    }

    #[test]
    fn text_casts_escape_unless_trusted() {
        let casts = CastRegistry::with_defaults();
        let value = DataValue::from("<b>Bold</b>\nline");
        assert_eq!(casts.cast("Varchar", &value).unwrap(), "&lt;b&gt;Bold&lt;/b&gt;\nline");
        assert_eq!(casts.cast("Text", &value).unwrap(), "&lt;b&gt;Bold&lt;/b&gt;<br />\nline");
        assert_eq!(casts.cast("HTMLText", &value).unwrap(), "<b>Bold</b>\nline");
    }

    #[test]
    fn text_methods() {
        let casts = CastRegistry::with_defaults();
        let value = DataValue::from("Founded in 1883. Moved in 1986.");
        assert_eq!(casts.cast("Text->FirstSentence", &value).unwrap(), "Founded in 1883.");
        assert_eq!(casts.cast("Varchar->LimitCharacters(7)", &value).unwrap(), "Founded...");
        assert_eq!(casts.cast("Varchar->UpperCase", &DataValue::from("a&b")).unwrap(), "A&amp;B");
        assert_eq!(first_sentence("v1.2 is out"), "v1.2 is out");
    }

    #[test]
    fn unknown_casts_and_methods_fail() {
        let casts = CastRegistry::with_defaults();
        assert!(matches!(
            casts.cast("Money", &DataValue::Int(1)),
            Err(GridError::UnknownCast(name)) if name == "Money"
        ));
        assert!(matches!(
            casts.cast("Boolean->FirstSentence", &DataValue::Int(1)),
            Err(GridError::UnknownCastMethod { cast, method }) if cast == "Boolean" && method == "FirstSentence"
        ));
    }

    #[test]
    fn closures_register_as_casts() {
        let mut casts = CastRegistry::empty();
        casts.register("Stars", |value: &DataValue| "*".repeat(value.as_plain_text().len()));
        assert_eq!(casts.cast("Stars", &DataValue::from("abc")).unwrap(), "***");
        assert!(!casts.contains("Currency"));
    }
}
