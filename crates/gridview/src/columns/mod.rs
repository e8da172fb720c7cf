//! Data columns: turns rows into safe cell HTML.
//!
//! Every cell goes through four steps:
//!
//! 1. **Resolve** the raw value: a display field callback or template, else
//!    the row field named like the column.
//! 2. **Cast** it to HTML: a configured cast is trusted as-is; otherwise the
//!    value is escaped and line breaks are kept.
//! 3. **Format** it with the column's formatter, if any.
//! 4. **Escape** it with the grid's field escape table.
//!
//! Columns come from explicitly configured display fields or, failing that,
//! from the model's summary fields.

mod display;
mod format;

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

pub use display::{CellCallback, DisplayField, DisplayFields};
pub use format::{FormatCallback, FormatTemplate, Formatter};

use crate::components::{ColumnMetadata, ColumnProvider};
use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::model::Record;
use crate::value::{escape_text_block, DataValue};

pub(crate) static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid regex"));

/// CSS class of a column: `col-` plus the name with every non-word
/// character replaced by `-`.
pub fn column_class(column: &str) -> String {
    format!("col-{}", NON_WORD.replace_all(column, "-"))
}

/// Column provider rendering row fields.
///
/// ```
/// use gridview::{DataColumns, DisplayFields, Grid};
/// use serde_json::{json, Value};
///
/// let columns: DataColumns<Value> = DataColumns::new()
///     .with_display_fields([("Name", "Team"), ("Budget", "Budget")].into_iter().collect::<DisplayFields<_>>())
///     .with_field_casting([("Budget", "Currency")]);
/// let grid = Grid::new("teams", vec![json!({"Name": "Rovers & Co", "Budget": 1500})]);
///
/// assert_eq!(grid.render_rows(&columns).unwrap(), vec![vec!["Rovers &amp; Co", "$1,500.00"]]);
/// ```
pub struct DataColumns<R> {
    display_fields: DisplayFields<R>,
    field_casting: HashMap<String, String>,
    field_formatting: HashMap<String, Formatter<R>>,
}

impl<R> Default for DataColumns<R> {
    fn default() -> Self {
        DataColumns {
            display_fields: DisplayFields::new(),
            field_casting: HashMap::new(),
            field_formatting: HashMap::new(),
        }
    }
}

impl<R> Clone for DataColumns<R> {
    fn clone(&self) -> Self {
        DataColumns {
            display_fields: self.display_fields.clone(),
            field_casting: self.field_casting.clone(),
            field_formatting: self.field_formatting.clone(),
        }
    }
}

impl<R> std::fmt::Debug for DataColumns<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataColumns")
            .field("display_fields", &self.display_fields)
            .field("field_casting", &self.field_casting)
            .field("field_formatting", &self.field_formatting)
            .finish()
    }
}

impl<R: Record + Clone> DataColumns<R> {
    pub fn new() -> Self {
        DataColumns::default()
    }

    /// Sets the columns explicitly. An empty set means "derive them".
    pub fn with_display_fields(mut self, fields: DisplayFields<R>) -> Self {
        self.display_fields = fields;
        self
    }

    /// Column name → casting definition, e.g. `Currency` or `Text->FirstSentence`.
    pub fn with_field_casting<C: Into<String>, D: Into<String>>(
        mut self,
        casting: impl IntoIterator<Item = (C, D)>,
    ) -> Self {
        self.field_casting = casting
            .into_iter()
            .map(|(column, definition)| (column.into(), definition.into()))
            .collect();
        self
    }

    pub fn with_field_formatting<C: Into<String>>(
        mut self,
        formatting: impl IntoIterator<Item = (C, Formatter<R>)>,
    ) -> Self {
        self.field_formatting = formatting
            .into_iter()
            .map(|(column, formatter)| (column.into(), formatter))
            .collect();
        self
    }

    /// Adds a template formatter for one column. Malformed templates fail here.
    pub fn with_format_template(mut self, column: impl Into<String>, template: &str) -> Result<Self> {
        self.field_formatting
            .insert(column.into(), Formatter::template(template)?);
        Ok(self)
    }

    pub fn with_format_callback(
        mut self,
        column: impl Into<String>,
        callback: impl Fn(&str, &R) -> String + Send + Sync + 'static,
    ) -> Self {
        self.field_formatting
            .insert(column.into(), Formatter::callback(callback));
        self
    }

    pub fn field_casting(&self) -> &HashMap<String, String> {
        &self.field_casting
    }

    pub fn field_formatting(&self) -> &HashMap<String, Formatter<R>> {
        &self.field_formatting
    }

    /// The configured columns, or the model's summary fields.
    pub fn display_fields(&self, grid: &Grid<R>) -> Result<Cow<'_, DisplayFields<R>>> {
        if !self.display_fields.is_empty() {
            return Ok(Cow::Borrowed(&self.display_fields));
        }
        let model = grid.model();
        let describable = model.describable().ok_or_else(|| {
            GridError::Configuration(format!(
                "Cannot dynamically determine columns for {model}. Pass the column names to \
                 with_display_fields() or implement Describable::summary_fields() on {model}",
                model = model.type_name()
            ))
        })?;
        let fields: DisplayFields<R> = describable.summary_fields().into_iter().collect();
        debug!(model = model.type_name(), columns = fields.len(), "display fields from summary fields");
        Ok(Cow::Owned(fields))
    }

    fn cell(&self, grid: &Grid<R>, fields: &DisplayFields<R>, row: &R, column: &str) -> Result<String> {
        let value = self.resolve_value(grid, fields.get(column), row, column);
        let value = self.cast_value(grid, column, &value)?;
        let value = self.format_value(row, column, value);
        Ok(self.escape_value(grid, value))
    }

    fn resolve_value(&self, grid: &Grid<R>, field: Option<&DisplayField<R>>, row: &R, column: &str) -> DataValue {
        match field {
            Some(DisplayField::Spec {
                callback: Some(callback),
                ..
            }) => callback(row, column, grid),
            Some(DisplayField::Template { template, .. }) => DataValue::Text(
                template.render_with("", |name| row.field_value(name).as_plain_text()),
            ),
            _ => grid.data_field_value(row, column),
        }
    }

    /// Turns a raw value into cell HTML.
    pub fn cast_value(&self, grid: &Grid<R>, column: &str, value: &DataValue) -> Result<String> {
        if let Some(definition) = self.field_casting.get(column) {
            return grid.casted_value(value, definition);
        }
        Ok(match value {
            DataValue::Nice(text) => escape_text_block(text),
            DataValue::Html(html) => html.clone(),
            other => escape_text_block(&other.as_plain_text()),
        })
    }

    /// Applies the column's formatter. Columns without one pass through.
    pub fn format_value(&self, row: &R, column: &str, value: String) -> String {
        match self.field_formatting.get(column) {
            Some(formatter) => formatter.apply(&value, row),
            None => value,
        }
    }

    /// Applies the grid's field escape table, in order.
    pub fn escape_value(&self, grid: &Grid<R>, value: String) -> String {
        grid.field_escape()
            .iter()
            .fold(value, |value, (search, replace)| {
                if search.is_empty() {
                    value
                } else {
                    value.replace(search.as_str(), replace)
                }
            })
    }
}

impl<R: Record + Clone> ColumnProvider<R> for DataColumns<R> {
    fn augment_columns(&self, grid: &Grid<R>, columns: &mut Vec<String>) -> Result<()> {
        columns.extend(self.columns_handled(grid)?);
        let mut seen = std::collections::HashSet::new();
        columns.retain(|column| seen.insert(column.clone()));
        Ok(())
    }

    fn columns_handled(&self, grid: &Grid<R>) -> Result<Vec<String>> {
        Ok(self
            .display_fields(grid)?
            .names()
            .map(str::to_string)
            .collect())
    }

    fn column_content(&self, grid: &Grid<R>, row: &R, column: &str) -> Result<String> {
        let fields = self.display_fields(grid)?;
        self.cell(grid, &fields, row, column)
    }

    /// Resolves the display fields once for the whole batch.
    fn rows_content(&self, grid: &Grid<R>, rows: &[R], columns: &[String]) -> Result<Vec<Vec<String>>> {
        let fields = self.display_fields(grid)?;
        rows.iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| self.cell(grid, &fields, row, column))
                    .collect()
            })
            .collect()
    }

    fn column_attributes(&self, _grid: &Grid<R>, _row: &R, column: &str) -> BTreeMap<String, String> {
        BTreeMap::from([("class".to_string(), column_class(column))])
    }

    fn column_metadata(&self, grid: &Grid<R>, column: &str) -> Result<ColumnMetadata> {
        let fields = self.display_fields(grid)?;
        Ok(ColumnMetadata {
            title: fields
                .get(column)
                .and_then(DisplayField::title)
                .map(str::to_string),
        })
    }
}
