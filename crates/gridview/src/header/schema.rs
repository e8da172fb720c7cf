//! The search field schema handed to the client-side search component.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;

/// Wire format:
///
/// ```json
/// {
///   "formSchemaUrl": "field/teams/schema/SearchForm",
///   "name": "q",
///   "placeholder": "Search \"Teams\"",
///   "filters": {"Search__Name": "test"},
///   "gridfield": "teams"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchFieldSchema {
    #[serde(rename = "formSchemaUrl")]
    pub form_schema_url: String,
    pub name: String,
    pub placeholder: String,
    /// Active criteria keyed by form input name.
    pub filters: BTreeMap<String, String>,
    #[serde(rename = "gridfield")]
    pub grid_field: String,
}

impl SearchFieldSchema {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
