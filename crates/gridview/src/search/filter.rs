//! Filter kinds and their modifiers.
//!
//! A filter is written `Kind[Filter][:modifier…]`, for example
//! `PartialMatch`, `ExactMatchFilter:case` or `StartsWith:not`.

use std::fmt;
use std::str::FromStr;

use gridview_seeker::{Clause, ClauseValue, Number, Op, Value};
use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::model::FieldType;

/// Comparison semantics applied to a field during search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    ExactMatch,
    PartialMatch,
    StartsWith,
    EndsWith,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl FilterKind {
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::ExactMatch => "ExactMatch",
            FilterKind::PartialMatch => "PartialMatch",
            FilterKind::StartsWith => "StartsWith",
            FilterKind::EndsWith => "EndsWith",
            FilterKind::GreaterThan => "GreaterThan",
            FilterKind::GreaterThanOrEqual => "GreaterThanOrEqual",
            FilterKind::LessThan => "LessThan",
            FilterKind::LessThanOrEqual => "LessThanOrEqual",
        }
    }

    pub fn op(self) -> Op {
        match self {
            FilterKind::ExactMatch => Op::Eq,
            FilterKind::PartialMatch => Op::Contains,
            FilterKind::StartsWith => Op::StartsWith,
            FilterKind::EndsWith => Op::EndsWith,
            FilterKind::GreaterThan => Op::Gt,
            FilterKind::GreaterThanOrEqual => Op::Gte,
            FilterKind::LessThan => Op::Lt,
            FilterKind::LessThanOrEqual => Op::Lte,
        }
    }

    /// Text-matching kinds always compare against the text of a field.
    pub fn is_textual(self) -> bool {
        matches!(
            self,
            FilterKind::PartialMatch | FilterKind::StartsWith | FilterKind::EndsWith
        )
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s.trim();
        let bare = bare.strip_suffix("Filter").unwrap_or(bare);
        let kind = match bare {
            "ExactMatch" => FilterKind::ExactMatch,
            "PartialMatch" => FilterKind::PartialMatch,
            "StartsWith" => FilterKind::StartsWith,
            "EndsWith" => FilterKind::EndsWith,
            "GreaterThan" => FilterKind::GreaterThan,
            "GreaterThanOrEqual" => FilterKind::GreaterThanOrEqual,
            "LessThan" => FilterKind::LessThan,
            "LessThanOrEqual" => FilterKind::LessThanOrEqual,
            _ => return Err(GridError::UnknownFilter(s.to_string())),
        };
        Ok(kind)
    }
}

/// A filter kind plus its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FilterSpec {
    pub kind: FilterKind,
    pub negate: bool,
    pub case_sensitive: bool,
}

impl FilterSpec {
    pub fn new(kind: FilterKind) -> Self {
        FilterSpec {
            kind,
            negate: false,
            case_sensitive: false,
        }
    }

    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    /// Builds the clause matching `field` against a submitted value.
    ///
    /// Exact and comparison filters on numeric or boolean fields type the
    /// value first; text kinds always match on text. A comparison kind on a
    /// boolean field is rejected once the submitted value reads as a flag.
    pub fn clause(&self, field: &str, value: &str, field_type: FieldType) -> crate::error::Result<Clause> {
        let value = value.trim();
        let typed = if self.kind.is_textual() {
            None
        } else {
            match field_type {
                FieldType::Int | FieldType::Decimal => Number::parse(value).map(ClauseValue::Number),
                FieldType::Boolean => Value::from(value).as_flag().map(ClauseValue::Bool),
                _ => None,
            }
        };
        let value = typed.unwrap_or_else(|| ClauseValue::String(value.to_string()));
        Ok(Clause::try_new(field, self.kind.op(), value)?.case_sensitive(self.case_sensitive))
    }
}

impl From<FilterKind> for FilterSpec {
    fn from(kind: FilterKind) -> Self {
        FilterSpec::new(kind)
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if self.negate {
            f.write_str(":not")?;
        }
        if self.case_sensitive {
            f.write_str(":case")?;
        }
        Ok(())
    }
}

impl FromStr for FilterSpec {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let kind: FilterKind = parts.next().unwrap_or_default().parse()?;
        let mut spec = FilterSpec::new(kind);
        for modifier in parts {
            match modifier.trim().to_ascii_lowercase().as_str() {
                "not" => spec.negate = true,
                "case" => spec.case_sensitive = true,
                "nocase" => spec.case_sensitive = false,
                _ => return Err(GridError::UnknownFilter(s.to_string())),
            }
        }
        Ok(spec)
    }
}

impl TryFrom<String> for FilterSpec {
    type Error = GridError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FilterSpec> for String {
    fn from(spec: FilterSpec) -> Self {
        spec.to_string()
    }
}

/// A filter bound to a field: what a search context evaluates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub field: String,
    pub spec: FilterSpec,
}

impl SearchFilter {
    pub fn kind(&self) -> FilterKind {
        self.spec.kind
    }
}
