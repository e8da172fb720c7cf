//! Searchable field resolution.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ModelConfig;
use crate::model::{DbField, FieldType};
use crate::search::filter::{FilterSpec, SearchFilter};

/// Kind of form input scaffolded for a searchable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormFieldKind {
    Text,
    Numeric,
    Date,
    /// Any / Yes / No dropdown for boolean fields.
    Dropdown,
}

impl FormFieldKind {
    pub fn for_type(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Int | FieldType::Decimal | FieldType::ForeignKey => FormFieldKind::Numeric,
            FieldType::Date => FormFieldKind::Date,
            FieldType::Boolean => FormFieldKind::Dropdown,
            FieldType::Text => FormFieldKind::Text,
        }
    }
}

/// One searchable field, fully resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchField {
    /// Field name, with `.` separating relation traversals.
    pub name: String,
    pub title: String,
    pub filter: FilterSpec,
    pub field_type: FieldType,
    pub form_field: FormFieldKind,
}

impl SearchField {
    /// A field using the defaults for its type.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        SearchField {
            title: name.clone(),
            name,
            filter: field_type.default_filter(),
            field_type,
            form_field: FormFieldKind::for_type(field_type),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn filter(mut self, filter: impl Into<FilterSpec>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn form_field(mut self, kind: FormFieldKind) -> Self {
        self.form_field = kind;
        self
    }

    pub fn search_filter(&self) -> SearchFilter {
        SearchFilter {
            field: self.name.clone(),
            spec: self.filter,
        }
    }
}

/// Ordered searchable fields of a model. Names are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchableFields(Vec<SearchField>);

impl SearchableFields {
    pub fn new() -> Self {
        SearchableFields::default()
    }

    /// Adds a field, replacing any field with the same name in place.
    pub fn with(mut self, field: SearchField) -> Self {
        self.insert(field);
        self
    }

    pub fn insert(&mut self, field: SearchField) {
        match self.0.iter_mut().find(|existing| existing.name == field.name) {
            Some(existing) => *existing = field,
            None => self.0.push(field),
        }
    }

    /// Resolves a model's searchable fields from its configuration.
    ///
    /// Explicit `searchable_fields` win, and every listed name counts even if
    /// no such persisted field exists. Declaring only `summary_fields` yields
    /// no searchable fields. Otherwise every persisted field is searchable.
    pub fn resolve(
        config: &ModelConfig,
        db_fields: &[DbField],
        title_for: impl Fn(&str) -> String,
    ) -> Self {
        let type_of = |name: &str| {
            db_fields
                .iter()
                .find(|field| field.name == name)
                .map(|field| field.field_type)
                .unwrap_or_default()
        };

        if let Some(configured) = &config.searchable_fields {
            debug!(count = configured.len(), "searchable fields from configuration");
            return configured
                .iter()
                .map(|(name, entry)| {
                    let mut field = SearchField::new(name.clone(), type_of(name));
                    field.title = entry.title.clone().unwrap_or_else(|| title_for(name));
                    if let Some(filter) = entry.filter {
                        field.filter = filter;
                    }
                    if let Some(kind) = entry.field {
                        field.form_field = kind;
                    }
                    field
                })
                .fold(SearchableFields::new(), SearchableFields::with);
        }

        if config.summary_fields.is_some() {
            debug!("summary fields declared without searchable fields, nothing to search");
            return SearchableFields::new();
        }

        debug!(count = db_fields.len(), "searchable fields scaffolded from persisted fields");
        db_fields
            .iter()
            .map(|db| SearchField::new(db.name.clone(), db.field_type).title(title_for(&db.name)))
            .fold(SearchableFields::new(), SearchableFields::with)
    }

    pub fn get(&self, name: &str) -> Option<&SearchField> {
        self.0.iter().find(|field| field.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|field| field.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchField> {
        self.0.iter()
    }

    pub fn filters(&self) -> Vec<SearchFilter> {
        self.0.iter().map(SearchField::search_filter).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<SearchField> for SearchableFields {
    fn from_iter<I: IntoIterator<Item = SearchField>>(iter: I) -> Self {
        iter.into_iter().fold(SearchableFields::new(), SearchableFields::with)
    }
}

impl<'a> IntoIterator for &'a SearchableFields {
    type Item = &'a SearchField;
    type IntoIter = std::slice::Iter<'a, SearchField>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
