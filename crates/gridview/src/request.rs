//! The current request, as far as grids care about it.

use serde_json::{Map, Value};

use crate::search::SearchCriteria;

/// Prefix of search form field names.
pub const SEARCH_PREFIX: &str = "Search__";

/// An HTTP-style request carrying submitted form data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridRequest {
    pub method: String,
    pub url: String,
    post_vars: Map<String, Value>,
}

impl GridRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        GridRequest {
            method: method.into(),
            url: url.into(),
            post_vars: Map::new(),
        }
    }

    /// Replaces the submitted data. Anything but a JSON object counts as empty.
    pub fn with_post_vars(mut self, vars: Value) -> Self {
        self.post_vars = match vars {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    pub fn post_var(&self, name: &str) -> Option<&Value> {
        self.post_vars.get(name)
    }

    /// Criteria submitted for `grid` under `filter[<grid>]`.
    pub fn filter_vars(&self, grid: &str) -> SearchCriteria {
        filter_criteria(self.post_var("filter"), grid)
    }
}

/// Reads the criteria for `grid` out of a submitted `filter` object.
///
/// Names may carry the search form prefix and `__` relation separators;
/// both are normalised to plain dotted field names. Values that are not
/// scalars are dropped.
pub fn filter_criteria(filter: Option<&Value>, grid: &str) -> SearchCriteria {
    let Some(Value::Object(vars)) = filter.and_then(|f| f.get(grid)) else {
        return SearchCriteria::new();
    };
    vars.iter()
        .filter_map(|(name, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
                _ => return None,
            };
            Some((field_name_from_input(name), value))
        })
        .collect()
}

/// `Search__Team__Name` → `Team.Name`.
pub fn field_name_from_input(name: &str) -> String {
    name.strip_prefix(SEARCH_PREFIX)
        .unwrap_or(name)
        .replace("__", ".")
}

/// `Team.Name` → `Search__Team__Name`.
pub fn input_name_for_field(field: &str) -> String {
    format!("{SEARCH_PREFIX}{}", field.replace('.', "__"))
}
