//! Single filter predicates.
//!
//! A [`Clause`] is a field name, an operator, a comparison value and a case
//! sensitivity flag. Text comparisons fold case unless the clause asks for
//! case sensitivity, matching how most database collations behave.

use std::cmp::Ordering;

use crate::error::{Result, SeekerError};
use crate::op::Op;
use crate::value::{Number, Value};

/// A single filter predicate.
///
/// ```
/// use gridview_seeker::{Clause, Op, Value};
///
/// let clause = Clause::new("Name", Op::Contains, "rov");
/// assert!(clause.matches(&Value::from("Rovers")));
/// assert!(!clause.clone().case_sensitive(true).matches(&Value::from("Rovers")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub field: String,
    pub op: Op,
    pub value: ClauseValue,
    pub case_sensitive: bool,
}

impl Clause {
    /// Creates a case-insensitive clause without validating the operator.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<ClauseValue>) -> Self {
        Clause {
            field: field.into(),
            op,
            value: value.into(),
            case_sensitive: false,
        }
    }

    /// Creates a clause, rejecting operators that make no sense for the value.
    pub fn try_new(field: impl Into<String>, op: Op, value: impl Into<ClauseValue>) -> Result<Self> {
        let value = value.into();
        let valid = match &value {
            ClauseValue::String(_) => op.is_string_op() || op.is_ordering_op(),
            ClauseValue::Number(_) => op.is_number_op(),
            ClauseValue::Bool(_) => op.is_bool_op(),
        };
        if !valid {
            return Err(SeekerError::InvalidOperatorForType {
                op: op.as_str(),
                value_type: value.type_name(),
            });
        }
        Ok(Clause::new(field, op, value))
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Evaluates this clause against a field value.
    ///
    /// Missing values never match, not even for `Ne`. Text clauses are
    /// compared against the textual form of numeric fields so a partial
    /// match on `"19"` finds `1984`. Flag clauses accept fields stored as
    /// `1`/`0` or as flag text (see [`Value::as_flag`]).
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        match (&self.value, field_value) {
            (_, Value::None) => false,

            (ClauseValue::String(pattern), Value::String(s)) => self.match_text(s, pattern),

            (ClauseValue::String(pattern), Value::Number(n)) => {
                match Number::parse(pattern) {
                    Some(clause_num) if self.op.is_number_op() => self.match_number(*n, clause_num),
                    _ if self.op.is_string_op() => self.match_text(&n.to_string(), pattern),
                    _ => false,
                }
            }

            (ClauseValue::Number(clause_num), Value::Number(n)) => self.match_number(*n, *clause_num),

            (ClauseValue::Number(clause_num), Value::String(s)) => Number::parse(s)
                .map(|n| self.match_number(n, *clause_num))
                .unwrap_or(false),

            (ClauseValue::Bool(clause_bool), other) => match (self.op, other.as_flag()) {
                (Op::Eq, Some(b)) => b == *clause_bool,
                (Op::Ne, Some(b)) => b != *clause_bool,
                _ => false,
            },

            _ => false,
        }
    }

    fn match_text(&self, field: &str, pattern: &str) -> bool {
        if self.case_sensitive {
            compare_text(self.op, field, pattern)
        } else {
            compare_text(self.op, &field.to_lowercase(), &pattern.to_lowercase())
        }
    }

    fn match_number(&self, field: Number, clause: Number) -> bool {
        field
            .compare(clause)
            .map(|ordering| self.op.eval_ordering(ordering))
            .unwrap_or(false)
    }
}

fn compare_text(op: Op, field: &str, pattern: &str) -> bool {
    match op {
        Op::Eq => field == pattern,
        Op::Ne => field != pattern,
        Op::Contains => field.contains(pattern),
        Op::StartsWith => field.starts_with(pattern),
        Op::EndsWith => field.ends_with(pattern),
        Op::Gt | Op::Gte | Op::Lt | Op::Lte => op.eval_ordering(field.cmp(pattern)),
    }
}

/// Owned comparison value stored in a clause.
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseValue {
    String(String),
    Number(Number),
    Bool(bool),
}

impl ClauseValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ClauseValue::String(_) => "string",
            ClauseValue::Number(_) => "number",
            ClauseValue::Bool(_) => "bool",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClauseValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::String(s)
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::String(s.to_string())
    }
}

impl From<Number> for ClauseValue {
    fn from(n: Number) -> Self {
        ClauseValue::Number(n)
    }
}

impl From<bool> for ClauseValue {
    fn from(b: bool) -> Self {
        ClauseValue::Bool(b)
    }
}

impl From<i64> for ClauseValue {
    fn from(n: i64) -> Self {
        ClauseValue::Number(Number::I64(n))
    }
}

impl From<i32> for ClauseValue {
    fn from(n: i32) -> Self {
        ClauseValue::Number(Number::from(n))
    }
}

impl From<u64> for ClauseValue {
    fn from(n: u64) -> Self {
        ClauseValue::Number(Number::U64(n))
    }
}

impl From<f64> for ClauseValue {
    fn from(n: f64) -> Self {
        ClauseValue::Number(Number::F64(n))
    }
}
