//! Models, their optional capabilities, and row access.
//!
//! A [`Model`] describes the type of the rows a grid shows. What the grid can
//! do with it depends on the capabilities the model opts into:
//!
//! - [`Describable`]: summary fields and display names, enough to derive
//!   columns and a search placeholder.
//! - [`Searchable`]: searchable fields and a default search definition,
//!   enough to build search forms and filter the list.
//!
//! Capabilities are returned as optional trait objects so components can ask
//! for them without knowing the concrete model type.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use gridview_seeker::Value;

use crate::config::ModelConfig;
use crate::search::{FilterKind, FilterSpec, SearchDefinition, SearchableFields};
use crate::value::DataValue;

/// Row-level field access.
///
/// Missing fields return [`DataValue::Null`]; they never fail.
pub trait Record {
    fn field_value(&self, field: &str) -> DataValue;
}

impl Record for serde_json::Map<String, serde_json::Value> {
    /// Looks `field` up as a key first, then as a dotted relation path.
    fn field_value(&self, field: &str) -> DataValue {
        if let Some(value) = self.get(field) {
            return DataValue::from(value);
        }
        let mut parts = field.split('.');
        let mut current = match parts.next().and_then(|head| self.get(head)) {
            Some(value) => value,
            None => return DataValue::Null,
        };
        for part in parts {
            current = match current.get(part) {
                Some(value) => value,
                None => return DataValue::Null,
            };
        }
        DataValue::from(current)
    }
}

impl Record for serde_json::Value {
    fn field_value(&self, field: &str) -> DataValue {
        match self {
            serde_json::Value::Object(map) => map.field_value(field),
            _ => DataValue::Null,
        }
    }
}

/// Accessor handing record values to query evaluation.
pub fn record_accessor<'a, R: Record>(row: &'a R, field: &str) -> Value<'a> {
    row.field_value(field).to_seek_value()
}

/// Storage type of a persisted field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[default]
    #[serde(alias = "Varchar", alias = "HTMLText", alias = "HTMLVarchar", alias = "Enum")]
    Text,
    #[serde(alias = "BigInt")]
    Int,
    #[serde(alias = "Currency", alias = "Float", alias = "Double", alias = "Percentage")]
    Decimal,
    Boolean,
    #[serde(alias = "Datetime", alias = "DBDatetime", alias = "Time")]
    Date,
    ForeignKey,
}

impl FieldType {
    /// Filter a field of this type gets when nothing else is configured.
    pub fn default_filter(self) -> FilterSpec {
        match self {
            FieldType::Text => FilterSpec::new(FilterKind::PartialMatch),
            _ => FilterSpec::new(FilterKind::ExactMatch),
        }
    }
}

/// A persisted field: name and storage type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbField {
    pub name: String,
    pub field_type: FieldType,
}

impl DbField {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        DbField {
            name: name.into(),
            field_type,
        }
    }
}

/// The type of the rows shown in a grid.
pub trait Model: Send + Sync {
    /// Fully qualified type name, used in error messages.
    fn type_name(&self) -> &str;

    /// Type name without any namespace or module path.
    fn short_name(&self) -> &str {
        short_type_name(self.type_name())
    }

    fn describable(&self) -> Option<&dyn Describable> {
        None
    }

    fn searchable(&self) -> Option<&dyn Searchable> {
        None
    }
}

/// Models that can describe their own summary columns and names.
pub trait Describable {
    /// Column name → title, in display order.
    fn summary_fields(&self) -> Vec<(String, String)>;

    fn plural_name(&self) -> String;

    /// Name of the free text search field.
    fn general_search_field_name(&self) -> String {
        "q".to_string()
    }
}

/// Models whose lists can be searched and filtered.
pub trait Searchable {
    fn searchable_fields(&self) -> SearchableFields;

    fn default_search_context(&self) -> SearchDefinition;
}

/// Strips a `\`-separated namespace or `::`-separated module path, and any
/// generic arguments.
pub fn short_type_name(name: &str) -> &str {
    let name = name.split('<').next().unwrap_or(name);
    let name = name.rsplit('\\').next().unwrap_or(name);
    name.rsplit("::").next().unwrap_or(name)
}

/// A model with no capabilities, used for arbitrary row types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BareModel {
    type_name: String,
}

impl BareModel {
    pub fn new(type_name: impl Into<String>) -> Self {
        BareModel {
            type_name: type_name.into(),
        }
    }

    /// Names the model after a Rust type.
    pub fn of<T: ?Sized>() -> Self {
        BareModel::new(std::any::type_name::<T>())
    }
}

impl Model for BareModel {
    fn type_name(&self) -> &str {
        &self.type_name
    }
}

static WORD_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z]+)([A-Z])").expect("valid regex"));

/// A persisted model type described by its fields and configuration.
///
/// Supports every capability. Names, summary fields and searchable fields
/// come from [`ModelConfig`] where set and are derived from the field list
/// otherwise.
///
/// ```
/// use gridview::{DataModel, Describable, FieldType};
///
/// let model = DataModel::new("App\\Model\\TeamMember")
///     .field("Name", FieldType::Text)
///     .field("Age", FieldType::Int);
///
/// assert_eq!(model.singular_name(), "Team Member");
/// assert_eq!(model.plural_name(), "Team Members");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DataModel {
    type_name: String,
    db_fields: Vec<DbField>,
    config: ModelConfig,
}

impl DataModel {
    pub fn new(type_name: impl Into<String>) -> Self {
        DataModel {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    /// Builds a model from configuration, taking its fields from `db`.
    pub fn from_config(type_name: impl Into<String>, config: ModelConfig) -> Self {
        let db_fields = config
            .db
            .as_ref()
            .map(|db| {
                db.iter()
                    .map(|(name, field_type)| DbField::new(name.clone(), *field_type))
                    .collect()
            })
            .unwrap_or_default();
        DataModel {
            type_name: type_name.into(),
            db_fields,
            config,
        }
    }

    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.db_fields.push(DbField::new(name, field_type));
        self
    }

    pub fn with_config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn db_fields(&self) -> &[DbField] {
        &self.db_fields
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn singular_name(&self) -> String {
        match &self.config.singular_name {
            Some(name) => name.clone(),
            None => WORD_BOUNDARY
                .replace_all(self.short_name(), "$1 $2")
                .into_owned(),
        }
    }
}

impl Model for DataModel {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn describable(&self) -> Option<&dyn Describable> {
        Some(self)
    }

    fn searchable(&self) -> Option<&dyn Searchable> {
        Some(self)
    }
}

impl Describable for DataModel {
    fn summary_fields(&self) -> Vec<(String, String)> {
        match &self.config.summary_fields {
            Some(fields) => fields.iter().cloned().collect(),
            None => self
                .db_fields
                .iter()
                .filter(|field| field.field_type != FieldType::ForeignKey)
                .map(|field| (field.name.clone(), field.name.clone()))
                .collect(),
        }
    }

    fn plural_name(&self) -> String {
        match &self.config.plural_name {
            Some(name) => name.clone(),
            None => pluralize(&self.singular_name()),
        }
    }

    fn general_search_field_name(&self) -> String {
        self.config
            .general_search_field
            .clone()
            .unwrap_or_else(|| "q".to_string())
    }
}

impl Searchable for DataModel {
    fn searchable_fields(&self) -> SearchableFields {
        let titles = self.config.summary_fields.as_ref();
        SearchableFields::resolve(&self.config, &self.db_fields, |name| {
            titles
                .and_then(|fields| fields.get(name))
                .cloned()
                .unwrap_or_else(|| name.to_string())
        })
    }

    fn default_search_context(&self) -> SearchDefinition {
        let mut definition = SearchDefinition::new(self.type_name.clone(), self.searchable_fields())
            .general_field(self.general_search_field_name());
        if let Some(filter) = self.config.general_search_field_filter {
            definition = definition.general_filter(filter);
        }
        if let Some(split) = self.config.general_search_split_terms {
            definition = definition.split_terms(split);
        }
        definition
    }
}

fn pluralize(singular: &str) -> String {
    let lower = singular.to_ascii_lowercase();
    let mut chars = lower.chars().rev();
    let last = chars.next();
    let before_last = chars.next();
    match (before_last, last) {
        (Some(c), Some('y')) if !"aeiou".contains(c) => {
            format!("{}ies", &singular[..singular.len() - 1])
        }
        _ if lower.ends_with('s')
            || lower.ends_with('x')
            || lower.ends_with("ch")
            || lower.ends_with("sh") =>
        {
            format!("{singular}es")
        }
        _ => format!("{singular}s"),
    }
}
