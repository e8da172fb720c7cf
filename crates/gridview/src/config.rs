//! Per-model configuration.
//!
//! Model configuration is plain data, usually loaded from a YAML document
//! keyed by model type name:
//!
//! ```yaml
//! Team:
//!   plural_name: Teams
//!   db:
//!     Name: Varchar
//!     City: Varchar
//!     Founded: Int
//!   summary_fields:
//!     Name: Team name
//!     City: City
//!   searchable_fields:
//!     - Name
//!     - City
//!   general_search_field_filter: PartialMatch
//! ```
//!
//! Field lists accept either a sequence of names or a mapping. Mappings keep
//! the order in which they were written.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{DeserializeOwned, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::Result;
use crate::model::{DataModel, FieldType};
use crate::search::{FilterSpec, FormFieldKind};

/// Configuration for a single model type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    pub singular_name: Option<String>,
    pub plural_name: Option<String>,
    /// Persisted fields and their storage types.
    pub db: Option<FieldList<FieldType>>,
    pub searchable_fields: Option<FieldList<SearchableFieldEntry>>,
    /// Column name → title.
    pub summary_fields: Option<FieldList<String>>,
    pub general_search_field: Option<String>,
    pub general_search_field_filter: Option<FilterSpec>,
    pub general_search_split_terms: Option<bool>,
}

/// Values allowed in a field list written as a plain sequence of names.
pub trait ListEntry: DeserializeOwned {
    fn from_name(name: &str) -> Self;
}

impl ListEntry for String {
    fn from_name(name: &str) -> Self {
        name.to_string()
    }
}

impl ListEntry for FieldType {
    fn from_name(_name: &str) -> Self {
        FieldType::default()
    }
}

/// An ordered list of field names with a value per field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldList<T>(Vec<(String, T)>);

impl<T> Default for FieldList<T> {
    fn default() -> Self {
        FieldList(Vec::new())
    }
}

impl<T> FieldList<T> {
    pub fn new() -> Self {
        FieldList::default()
    }

    /// Adds `name`, replacing the value in place if it is already listed.
    pub fn insert(&mut self, name: impl Into<String>, value: T) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, T)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>, T> FromIterator<(N, T)> for FieldList<T> {
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        let mut list = FieldList::new();
        for (name, value) in iter {
            list.insert(name, value);
        }
        list
    }
}

impl<'de, T: ListEntry> Deserialize<'de> for FieldList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(FieldListVisitor(PhantomData))
    }
}

struct FieldListVisitor<T>(PhantomData<T>);

impl<'de, T: ListEntry> Visitor<'de> for FieldListVisitor<T> {
    type Value = FieldList<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of field names or a map of field names")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error> {
        let mut list = FieldList::new();
        while let Some(name) = seq.next_element::<String>()? {
            let value = T::from_name(&name);
            list.insert(name, value);
        }
        Ok(list)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        let mut list = FieldList::new();
        while let Some((name, value)) = map.next_entry::<String, T>()? {
            list.insert(name, value);
        }
        Ok(list)
    }
}

/// Configuration of one searchable field.
///
/// Written as a bare name, as a filter (`Name: StartsWith`) or in full:
///
/// ```yaml
/// Founded:
///   title: Year founded
///   filter: GreaterThanOrEqual
///   field: numeric
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawSearchableField")]
pub struct SearchableFieldEntry {
    pub title: Option<String>,
    pub filter: Option<FilterSpec>,
    pub field: Option<FormFieldKind>,
}

impl ListEntry for SearchableFieldEntry {
    fn from_name(_name: &str) -> Self {
        SearchableFieldEntry::default()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSearchableField {
    Filter(FilterSpec),
    Detailed {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        filter: Option<FilterSpec>,
        #[serde(default)]
        field: Option<FormFieldKind>,
    },
}

impl From<RawSearchableField> for SearchableFieldEntry {
    fn from(raw: RawSearchableField) -> Self {
        match raw {
            RawSearchableField::Filter(filter) => SearchableFieldEntry {
                filter: Some(filter),
                ..Default::default()
            },
            RawSearchableField::Detailed {
                title,
                filter,
                field,
            } => SearchableFieldEntry {
                title,
                filter,
                field,
            },
        }
    }
}

/// Model configuration for many types, keyed by type name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ConfigRegistry {
    models: HashMap<String, ModelConfig>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        ConfigRegistry::default()
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn insert(&mut self, type_name: impl Into<String>, config: ModelConfig) {
        self.models.insert(type_name.into(), config);
    }

    pub fn get(&self, type_name: &str) -> Option<&ModelConfig> {
        self.models.get(type_name)
    }

    /// Builds the configured model for `type_name`, if there is one.
    pub fn model(&self, type_name: &str) -> Option<DataModel> {
        self.get(type_name)
            .map(|config| DataModel::from_config(type_name, config.clone()))
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}
