//! Search contexts: searchable fields plus the strategy that applies
//! submitted criteria to a list.
//!
//! Both contexts wrap a [`SearchDefinition`] and build their [`Query`] from
//! it, so an in-memory list and a queryable list of the same model always
//! expose the same fields and filter kinds. They differ only in who
//! evaluates the query.

use std::collections::BTreeMap;

use gridview_seeker::Query;
use tracing::{debug, trace};

use crate::error::Result;
use crate::list::DataSource;
use crate::model::Record;
use crate::search::fields::SearchableFields;
use crate::search::filter::{FilterKind, FilterSpec, SearchFilter};

/// Submitted criteria: field name (or the general search field) → value.
pub type SearchCriteria = BTreeMap<String, String>;

/// Everything needed to turn criteria into a [`Query`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchDefinition {
    model: String,
    fields: SearchableFields,
    general_field: String,
    general_filter: Option<FilterSpec>,
    split_terms: bool,
}

impl SearchDefinition {
    pub fn new(model: impl Into<String>, fields: SearchableFields) -> Self {
        SearchDefinition {
            model: model.into(),
            fields,
            general_field: "q".to_string(),
            general_filter: None,
            split_terms: true,
        }
    }

    pub fn general_field(mut self, name: impl Into<String>) -> Self {
        self.general_field = name.into();
        self
    }

    /// Filter used by the general search for every field. Without one each
    /// field's own filter is used.
    pub fn general_filter(mut self, filter: FilterSpec) -> Self {
        self.general_filter = Some(filter);
        self
    }

    /// Whether the general search phrase is split into terms on whitespace.
    pub fn split_terms(mut self, split: bool) -> Self {
        self.split_terms = split;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn fields(&self) -> &SearchableFields {
        &self.fields
    }

    pub fn general_field_name(&self) -> &str {
        &self.general_field
    }

    pub fn filters(&self) -> Vec<SearchFilter> {
        self.fields.filters()
    }

    /// Builds the query for `criteria`.
    ///
    /// Empty values are skipped, as are names that are neither a searchable
    /// field nor the general search field. Each general search term must
    /// match at least one non-negated field. A filter whose operator cannot
    /// apply to the typed value fails with [`GridError::Query`].
    ///
    /// [`GridError::Query`]: crate::GridError::Query
    pub fn query(&self, criteria: &SearchCriteria) -> Result<Query> {
        let mut query = Query::new();
        for (name, value) in criteria {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if *name == self.general_field {
                query = self.general_search(query, value)?;
                continue;
            }
            match self.fields.get(name) {
                Some(field) => {
                    let clause = field.filter.clause(&field.name, value, field.field_type)?;
                    query = if field.filter.negate {
                        query.not_clause(clause)
                    } else {
                        query.and_clause(clause)
                    };
                }
                None => trace!(field = %name, "ignoring criterion for unknown search field"),
            }
        }
        Ok(query)
    }

    fn general_search(&self, mut query: Query, phrase: &str) -> Result<Query> {
        let terms: Vec<&str> = if self.split_terms {
            phrase.split_whitespace().collect()
        } else {
            vec![phrase]
        };
        for term in terms {
            let group = self
                .fields
                .iter()
                .filter(|field| !field.filter.negate)
                .map(|field| {
                    let mut spec = self.general_filter.unwrap_or(field.filter);
                    spec.negate = false;
                    spec.clause(&field.name, term, field.field_type)
                })
                .collect::<Result<Vec<_>>>()?;
            query = query.any_of(group);
        }
        Ok(query)
    }

    /// The filters that `criteria` would activate.
    pub fn active_filters(&self, criteria: &SearchCriteria) -> Vec<SearchFilter> {
        criteria
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .filter_map(|(name, _)| {
                if *name == self.general_field {
                    let spec = self
                        .general_filter
                        .unwrap_or_else(|| FilterSpec::new(FilterKind::PartialMatch));
                    return Some(SearchFilter {
                        field: name.clone(),
                        spec,
                    });
                }
                self.fields.get(name).map(|field| field.search_filter())
            })
            .collect()
    }
}

/// Who evaluates the query built by a search context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backing {
    /// Rows are scanned and matched in memory.
    InMemory,
    /// The list evaluates the query itself.
    Queryable,
}

/// Applies search criteria to a grid's list.
pub trait SearchContext<R> {
    fn definition(&self) -> &SearchDefinition;

    fn backing(&self) -> Backing;

    /// A narrowed copy of `list`. The source is left untouched.
    fn apply(&self, list: &DataSource<R>, criteria: &SearchCriteria) -> Result<DataSource<R>>;

    fn search_fields(&self) -> Vec<&str> {
        self.definition().fields().names().collect()
    }

    fn filters(&self) -> Vec<SearchFilter> {
        self.definition().filters()
    }

    fn query(&self, criteria: &SearchCriteria) -> Result<Query> {
        self.definition().query(criteria)
    }

    fn active_filters(&self, criteria: &SearchCriteria) -> Vec<SearchFilter> {
        self.definition().active_filters(criteria)
    }
}

/// Matches rows in memory, for lists that cannot evaluate queries.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemorySearchContext {
    definition: SearchDefinition,
}

impl InMemorySearchContext {
    pub fn new(definition: SearchDefinition) -> Self {
        InMemorySearchContext { definition }
    }
}

impl<R: Record + Clone> SearchContext<R> for InMemorySearchContext {
    fn definition(&self) -> &SearchDefinition {
        &self.definition
    }

    fn backing(&self) -> Backing {
        Backing::InMemory
    }

    fn apply(&self, list: &DataSource<R>, criteria: &SearchCriteria) -> Result<DataSource<R>> {
        let query = self.definition.query(criteria)?;
        let narrowed = list.narrowed(&query);
        debug!(before = list.len(), after = narrowed.len(), "narrowed list in memory");
        Ok(narrowed)
    }
}

/// Hands the query to the list.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryableSearchContext {
    definition: SearchDefinition,
}

impl QueryableSearchContext {
    pub fn new(definition: SearchDefinition) -> Self {
        QueryableSearchContext { definition }
    }
}

impl<R: Record + Clone> SearchContext<R> for QueryableSearchContext {
    fn definition(&self) -> &SearchDefinition {
        &self.definition
    }

    fn backing(&self) -> Backing {
        Backing::Queryable
    }

    fn apply(&self, list: &DataSource<R>, criteria: &SearchCriteria) -> Result<DataSource<R>> {
        let query = self.definition.query(criteria)?;
        debug!(clauses = query.clauses().count(), "handing query to the list");
        Ok(list.narrowed(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldType;
    use crate::search::fields::SearchField;
    use gridview_seeker::{ClauseValue, Number, Op};

    fn definition() -> SearchDefinition {
        let fields = SearchableFields::new()
            .with(SearchField::new("Name", FieldType::Text))
            .with(SearchField::new("City", FieldType::Text))
            .with(SearchField::new("Founded", FieldType::Int))
            .with(
                SearchField::new("Status", FieldType::Text)
                    .filter(FilterSpec::new(FilterKind::ExactMatch).negated()),
            );
        SearchDefinition::new("Team", fields)
    }

    fn criteria(pairs: &[(&str, &str)]) -> SearchCriteria {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn field_criteria_become_and_clauses() {
        let query = definition().query(&criteria(&[("Name", "rov"), ("Founded", "1883")])).unwrap();
        let clauses = query.and_clauses();
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].field, "Founded");
        assert_eq!(clauses[0].value, ClauseValue::Number(Number::I64(1883)));
        assert_eq!(clauses[1].op, Op::Contains);
    }

    #[test]
    fn negated_filters_become_not_clauses() {
        let query = definition().query(&criteria(&[("Status", "Folded")])).unwrap();
        assert!(query.and_clauses().is_empty());
        assert_eq!(query.not_clauses().len(), 1);
    }

    #[test]
    fn empty_and_unknown_criteria_are_ignored() {
        let query = definition().query(&criteria(&[("Name", "  "), ("Nickname", "x")])).unwrap();
        assert!(query.is_empty());
    }

    #[test]
    fn general_search_groups_each_term() {
        let query = definition().query(&criteria(&[("q", "bristol 1883")])).unwrap();
        let groups = query.any_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 3);
        assert!(groups[0].iter().all(|clause| clause.field != "Status"));
    }

    #[test]
    fn general_search_without_splitting() {
        let query = definition()
            .split_terms(false)
            .general_filter(FilterSpec::new(FilterKind::StartsWith))
            .query(&criteria(&[("q", "bristol rovers")]))
            .unwrap();
        let groups = query.any_groups();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].iter().all(|clause| clause.op == Op::StartsWith));
    }

    #[test]
    fn operators_invalid_for_the_field_type_are_errors() {
        let fields = SearchableFields::new().with(
            SearchField::new("Active", FieldType::Boolean)
                .filter(FilterSpec::new(FilterKind::GreaterThan)),
        );
        let definition = SearchDefinition::new("Team", fields);
        let err = definition.query(&criteria(&[("Active", "1")])).unwrap_err();
        assert!(matches!(err, crate::GridError::Query(_)));
        assert!(definition.query(&criteria(&[("q", "yes")])).is_err());
    }

    #[test]
    fn active_filters_follow_criteria() {
        let active = definition().active_filters(&criteria(&[("City", "Leeds"), ("Name", ""), ("q", "x")]));
        let kinds: Vec<(&str, FilterKind)> =
            active.iter().map(|f| (f.field.as_str(), f.kind())).collect();
        assert_eq!(
            kinds,
            vec![("City", FilterKind::PartialMatch), ("q", FilterKind::PartialMatch)]
        );
    }
}
