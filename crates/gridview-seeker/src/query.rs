//! Query builder and executor.

use crate::clause::{Clause, ClauseValue};
use crate::op::Op;
use crate::value::Value;

/// A conjunction of clause groups.
///
/// ```text
/// match = (every AND clause matches)
///       ∧ (every ANY group has at least one matching clause)
///       ∧ (no NOT clause matches)
/// ```
///
/// ANY groups carry the general search: each search term becomes one group
/// holding a clause per searchable field.
///
/// # Example
///
/// ```
/// use gridview_seeker::{Clause, Op, Query, Value};
///
/// struct Team { name: &'static str, city: &'static str }
///
/// fn accessor<'a>(team: &'a Team, field: &str) -> Value<'a> {
///     match field {
///         "Name" => Value::from(team.name),
///         "City" => Value::from(team.city),
///         _ => Value::None,
///     }
/// }
///
/// let teams = [
///     Team { name: "Rovers", city: "Bristol" },
///     Team { name: "United", city: "Leeds" },
/// ];
///
/// let query = Query::new().any_of(vec![
///     Clause::new("Name", Op::Contains, "lee"),
///     Clause::new("City", Op::Contains, "lee"),
/// ]);
///
/// let found = query.filter(&teams, accessor);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].name, "United");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    and_clauses: Vec<Clause>,
    any_groups: Vec<Vec<Clause>>,
    not_clauses: Vec<Clause>,
}

impl Query {
    /// Creates an empty query, which matches every row.
    pub fn new() -> Self {
        Query::default()
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    pub fn and(self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.and_clause(Clause::new(field, op, value))
    }

    pub fn and_clause(mut self, clause: Clause) -> Self {
        self.and_clauses.push(clause);
        self
    }

    /// Adds a group of which at least one clause must match.
    ///
    /// An empty group is dropped rather than rejecting every row.
    pub fn any_of(mut self, clauses: Vec<Clause>) -> Self {
        if !clauses.is_empty() {
            self.any_groups.push(clauses);
        }
        self
    }

    pub fn not(self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.not_clause(Clause::new(field, op, value))
    }

    pub fn not_clause(mut self, clause: Clause) -> Self {
        self.not_clauses.push(clause);
        self
    }

    pub fn and_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Eq, value)
    }

    pub fn and_contains(self, field: &str, value: &str) -> Self {
        self.and(field, Op::Contains, value)
    }

    pub fn and_endswith(self, field: &str, value: &str) -> Self {
        self.and(field, Op::EndsWith, value)
    }

    pub fn and_gt(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Gt, value)
    }

    pub fn and_lt(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Lt, value)
    }

    pub fn not_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.not(field, Op::Eq, value)
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    pub fn and_clauses(&self) -> &[Clause] {
        &self.and_clauses
    }

    pub fn any_groups(&self) -> &[Vec<Clause>] {
        &self.any_groups
    }

    pub fn not_clauses(&self) -> &[Clause] {
        &self.not_clauses
    }

    /// Returns `true` when the query has no clauses and matches everything.
    pub fn is_empty(&self) -> bool {
        self.and_clauses.is_empty() && self.any_groups.is_empty() && self.not_clauses.is_empty()
    }

    /// Every clause in evaluation order: AND, ANY groups, NOT.
    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.and_clauses
            .iter()
            .chain(self.any_groups.iter().flatten())
            .chain(self.not_clauses.iter())
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    /// Tests a single row. The accessor extracts field values from it.
    pub fn matches<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        let eval = |clause: &Clause| clause.matches(&accessor(item, &clause.field));

        self.and_clauses.iter().all(eval)
            && self.any_groups.iter().all(|group| group.iter().any(eval))
            && !self.not_clauses.iter().any(eval)
    }

    /// Returns references to the matching rows, in input order.
    pub fn filter<'a, T, F>(&self, items: &'a [T], accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .collect()
    }

    /// Returns clones of the matching rows, in input order.
    pub fn filter_cloned<T, F>(&self, items: &[T], accessor: F) -> Vec<T>
    where
        T: Clone,
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.filter(items, accessor).into_iter().cloned().collect()
    }

    pub fn count<T, F>(&self, items: &[T], accessor: F) -> usize
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .count()
    }
}
