//! Display field definitions.

use std::fmt;
use std::sync::Arc;

use crate::columns::format::FormatTemplate;
use crate::error::Result;
use crate::grid::Grid;
use crate::value::DataValue;

/// Produces a cell value: `(row, column, grid) -> value`.
pub type CellCallback<R> = Arc<dyn Fn(&R, &str, &Grid<R>) -> DataValue + Send + Sync>;

/// How one column gets its title and raw value.
pub enum DisplayField<R> {
    /// A title; the value is the row field named like the column.
    Title(String),
    /// Optional title and optional value callback.
    Spec {
        title: Option<String>,
        callback: Option<CellCallback<R>>,
    },
    /// The value is a template over row fields, e.g. `$FirstName $Surname`.
    Template {
        title: Option<String>,
        template: FormatTemplate,
    },
}

impl<R> DisplayField<R> {
    pub fn title(&self) -> Option<&str> {
        match self {
            DisplayField::Title(title) => Some(title.as_str()),
            DisplayField::Spec { title, .. } | DisplayField::Template { title, .. } => {
                title.as_deref()
            }
        }
    }

    pub fn callback(
        title: impl Into<String>,
        callback: impl Fn(&R, &str, &Grid<R>) -> DataValue + Send + Sync + 'static,
    ) -> Self {
        DisplayField::Spec {
            title: Some(title.into()),
            callback: Some(Arc::new(callback)),
        }
    }

    pub fn template(title: impl Into<String>, template: &str) -> Result<Self> {
        Ok(DisplayField::Template {
            title: Some(title.into()),
            template: FormatTemplate::parse(template)?,
        })
    }
}

impl<R> Clone for DisplayField<R> {
    fn clone(&self) -> Self {
        match self {
            DisplayField::Title(title) => DisplayField::Title(title.clone()),
            DisplayField::Spec { title, callback } => DisplayField::Spec {
                title: title.clone(),
                callback: callback.clone(),
            },
            DisplayField::Template { title, template } => DisplayField::Template {
                title: title.clone(),
                template: template.clone(),
            },
        }
    }
}

impl<R> fmt::Debug for DisplayField<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayField::Title(title) => f.debug_tuple("Title").field(title).finish(),
            DisplayField::Spec { title, callback } => f
                .debug_struct("Spec")
                .field("title", title)
                .field("callback", &callback.as_ref().map(|_| ".."))
                .finish(),
            DisplayField::Template { title, template } => f
                .debug_struct("Template")
                .field("title", title)
                .field("template", &template.source())
                .finish(),
        }
    }
}

impl<R> From<&str> for DisplayField<R> {
    fn from(title: &str) -> Self {
        DisplayField::Title(title.to_string())
    }
}

impl<R> From<String> for DisplayField<R> {
    fn from(title: String) -> Self {
        DisplayField::Title(title)
    }
}

/// Ordered columns. Insertion order is display order and names are unique.
pub struct DisplayFields<R>(Vec<(String, DisplayField<R>)>);

impl<R> DisplayFields<R> {
    pub fn new() -> Self {
        DisplayFields(Vec::new())
    }

    /// Adds a column, replacing an existing one with the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, field: impl Into<DisplayField<R>>) {
        let name = name.into();
        let field = field.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = field,
            None => self.0.push((name, field)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, field: impl Into<DisplayField<R>>) -> Self {
        self.insert(name, field);
        self
    }

    pub fn get(&self, name: &str) -> Option<&DisplayField<R>> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, field)| field)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, DisplayField<R>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<R> Default for DisplayFields<R> {
    fn default() -> Self {
        DisplayFields::new()
    }
}

impl<R> Clone for DisplayFields<R> {
    fn clone(&self) -> Self {
        DisplayFields(self.0.clone())
    }
}

impl<R> fmt::Debug for DisplayFields<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(name, field)| (name, field)))
            .finish()
    }
}

impl<R, N: Into<String>, F: Into<DisplayField<R>>> FromIterator<(N, F)> for DisplayFields<R> {
    fn from_iter<I: IntoIterator<Item = (N, F)>>(iter: I) -> Self {
        let mut fields = DisplayFields::new();
        for (name, field) in iter {
            fields.insert(name, field);
        }
        fields
    }
}
