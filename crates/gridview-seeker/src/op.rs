//! Comparison operators for clauses.

use std::cmp::Ordering;
use std::fmt;

/// Comparison operator of a clause.
///
/// - **Text**: `Eq`, `Ne`, `Contains`, `StartsWith`, `EndsWith`
/// - **Numeric**: `Eq`, `Ne`, `Gt`, `Gte`, `Lt`, `Lte`
/// - **Bool**: `Eq`, `Ne`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Ne,
    Contains,
    StartsWith,
    EndsWith,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Op {
    pub fn is_string_op(self) -> bool {
        matches!(
            self,
            Op::Eq | Op::Ne | Op::Contains | Op::StartsWith | Op::EndsWith
        )
    }

    /// Ordering operators also work on text (lexicographic).
    pub fn is_ordering_op(self) -> bool {
        matches!(self, Op::Gt | Op::Gte | Op::Lt | Op::Lte)
    }

    pub fn is_number_op(self) -> bool {
        matches!(self, Op::Eq | Op::Ne) || self.is_ordering_op()
    }

    pub fn is_bool_op(self) -> bool {
        matches!(self, Op::Eq | Op::Ne)
    }

    /// Evaluates an ordering of `field` relative to the clause value.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            Op::Contains | Op::StartsWith | Op::EndsWith => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Ne => "ne",
            Op::Contains => "contains",
            Op::StartsWith => "startswith",
            Op::EndsWith => "endswith",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
