//! Roles a grid component can play.
//!
//! A component implements the roles it supports. The grid container asks
//! column providers for columns and cells, fragment providers for header
//! markup, action providers to handle submitted actions, and data
//! manipulators to narrow the list before rendering.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::grid::Grid;
use crate::list::DataSource;

/// Display metadata for one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMetadata {
    pub title: Option<String>,
}

/// Named HTML fragments, keyed by the region they render into.
pub type HtmlFragments = BTreeMap<String, String>;

pub trait ColumnProvider<R> {
    /// Appends the handled columns to `columns`, keeping names unique.
    fn augment_columns(&self, grid: &Grid<R>, columns: &mut Vec<String>) -> Result<()>;

    fn columns_handled(&self, grid: &Grid<R>) -> Result<Vec<String>>;

    /// Safe HTML for one cell.
    fn column_content(&self, grid: &Grid<R>, row: &R, column: &str) -> Result<String>;

    /// Safe HTML for every cell of `rows`, one `Vec` per row in `columns`
    /// order. Providers that resolve per-grid setup override this to do it
    /// once per batch.
    fn rows_content(&self, grid: &Grid<R>, rows: &[R], columns: &[String]) -> Result<Vec<Vec<String>>> {
        rows.iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| self.column_content(grid, row, column))
                    .collect()
            })
            .collect()
    }

    fn column_attributes(&self, grid: &Grid<R>, row: &R, column: &str) -> BTreeMap<String, String>;

    fn column_metadata(&self, grid: &Grid<R>, column: &str) -> Result<ColumnMetadata>;
}

pub trait HtmlFragmentProvider<R> {
    /// Fragments to render, or `None` to render nothing.
    fn html_fragments(&self, grid: &Grid<R>) -> Result<Option<HtmlFragments>>;
}

pub trait ActionProvider<R> {
    /// Names of the actions this component handles.
    fn actions(&self, grid: &Grid<R>) -> Vec<&'static str>;

    fn handle_action(
        &self,
        grid: &mut Grid<R>,
        action: &str,
        data: &serde_json::Value,
    ) -> Result<()>;
}

pub trait DataManipulator<R> {
    /// A narrowed or reordered copy of `list`.
    fn manipulated_data(&self, grid: &Grid<R>, list: &DataSource<R>) -> Result<DataSource<R>>;
}
