//! Cell formatting.
//!
//! A format template is parsed once, when formatting is configured, into a
//! list of segments. Rendering only substitutes values; nothing in a
//! template is ever evaluated.
//!
//! | Syntax         | Renders                                   |
//! |----------------|-------------------------------------------|
//! | `$value`       | the cast cell value                       |
//! | `$Name`        | the row's `Name` field                    |
//! | `{$Team.Name}` | a field path, delimited explicitly        |
//! | `\$`, `\\`     | a literal `$` or `\`                      |
//!
//! Names after a bare `$` are made of ASCII letters, digits, `_` and `-`.
//! A `$` not followed by a name is kept as-is.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{GridError, Result};
use crate::model::Record;
use crate::value::escape_html;

const VALUE_TOKEN: &str = "value";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Value,
    Field(String),
}

/// A parsed `$value` / `$Field` template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTemplate {
    source: String,
    segments: Vec<Segment>,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

impl FormatTemplate {
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        let push_token = |literal: &mut String, segments: &mut Vec<Segment>, name: String| {
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(literal)));
            }
            segments.push(if name == VALUE_TOKEN {
                Segment::Value
            } else {
                Segment::Field(name)
            });
        };

        while let Some((_, ch)) = chars.next() {
            match ch {
                '\\' => match chars.peek() {
                    Some(&(_, next @ ('$' | '\\'))) => {
                        literal.push(next);
                        chars.next();
                    }
                    _ => literal.push('\\'),
                },
                '{' if matches!(chars.peek(), Some((_, '$'))) => {
                    chars.next();
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        if !(is_name_char(c) || c == '.') {
                            return Err(GridError::template(
                                source,
                                format!("invalid character '{c}' in placeholder"),
                            ));
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(GridError::template(source, "unclosed placeholder"));
                    }
                    if name.is_empty() {
                        return Err(GridError::template(source, "empty placeholder"));
                    }
                    push_token(&mut literal, &mut segments, name);
                }
                '$' => {
                    let mut name = String::new();
                    while let Some(&(_, c)) = chars.peek() {
                        if !is_name_char(c) {
                            break;
                        }
                        name.push(c);
                        chars.next();
                    }
                    if name.is_empty() {
                        literal.push('$');
                    } else {
                        push_token(&mut literal, &mut segments, name);
                    }
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(FormatTemplate {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Field names referenced by the template, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Substitutes `value` and the result of `lookup` for each field.
    pub fn render_with(&self, value: &str, lookup: impl Fn(&str) -> String) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Value => out.push_str(value),
                Segment::Field(name) => out.push_str(&lookup(name)),
            }
        }
        out
    }

    /// Renders as cell HTML: `value` is trusted, row fields are escaped.
    pub fn render<R: Record>(&self, value: &str, row: &R) -> String {
        self.render_with(value, |name| escape_html(&row.field_value(name).as_plain_text()))
    }
}

impl FromStr for FormatTemplate {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        FormatTemplate::parse(s)
    }
}

impl fmt::Display for FormatTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Formatting callback: `(cast value, row) -> HTML`.
pub type FormatCallback<R> = Arc<dyn Fn(&str, &R) -> String + Send + Sync>;

/// How a column's cast value is turned into its final form.
pub enum Formatter<R> {
    Callback(FormatCallback<R>),
    Template(FormatTemplate),
}

impl<R> Clone for Formatter<R> {
    fn clone(&self) -> Self {
        match self {
            Formatter::Callback(callback) => Formatter::Callback(Arc::clone(callback)),
            Formatter::Template(template) => Formatter::Template(template.clone()),
        }
    }
}

impl<R> fmt::Debug for Formatter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formatter::Callback(_) => f.write_str("Callback(..)"),
            Formatter::Template(template) => f.debug_tuple("Template").field(&template.source).finish(),
        }
    }
}

impl<R: Record> Formatter<R> {
    pub fn callback(f: impl Fn(&str, &R) -> String + Send + Sync + 'static) -> Self {
        Formatter::Callback(Arc::new(f))
    }

    /// Parses `source`; malformed templates are rejected here.
    pub fn template(source: &str) -> Result<Self> {
        Ok(Formatter::Template(FormatTemplate::parse(source)?))
    }

    pub fn apply(&self, value: &str, row: &R) -> String {
        match self {
            Formatter::Callback(callback) => callback(value, row),
            Formatter::Template(template) => template.render(value, row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn substitutes_value_and_fields() {
        let template = FormatTemplate::parse("<a href=\"teams/$ID\">$value</a> ($City)").unwrap();
        let row = json!({"ID": 4, "City": "Bristol & Bath"});
        assert_eq!(
            template.render("<b>Rovers</b>", &row),
            "<a href=\"teams/4\"><b>Rovers</b></a> (Bristol &amp; Bath)"
        );
        assert_eq!(template.fields().collect::<Vec<_>>(), vec!["ID", "City"]);
    }

    #[test]
    fn braced_placeholders_allow_paths() {
        let template = FormatTemplate::parse("{$Ground.City}: {$value}").unwrap();
        let row = json!({"Ground": {"City": "Leeds"}});
        assert_eq!(template.render("United", &row), "Leeds: United");
    }

    #[test]
    fn escapes_and_lone_dollars_are_literal() {
        let template = FormatTemplate::parse(r"\$value costs $ 5 \\ $value.").unwrap();
        assert_eq!(template.render("x", &json!({})), r"$value costs $ 5 \ x.");
    }

    #[test]
    fn missing_fields_render_empty() {
        let template = FormatTemplate::parse("[$Nickname]").unwrap();
        assert_eq!(template.render("v", &json!({})), "[]");
    }

    #[test]
    fn malformed_placeholders_fail_at_parse_time() {
        for source in ["{$Name", "{$}", "{$Na me}"] {
            assert!(matches!(
                FormatTemplate::parse(source),
                Err(GridError::Template { template, .. }) if template == source
            ));
        }
    }

    #[test]
    fn callbacks_see_value_and_row() {
        let formatter = Formatter::callback(|value: &str, row: &serde_json::Value| {
            format!("{value}#{}", row["ID"])
        });
        assert_eq!(formatter.apply("Rovers", &json!({"ID": 7})), "Rovers#7");
    }
}
