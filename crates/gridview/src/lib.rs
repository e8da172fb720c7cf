//! # Gridview - data grid columns and search headers
//!
//! `gridview` renders the body and search header of an admin data grid: a
//! list of rows shown as columns, narrowed by a search/filter form.
//!
//! ## Core Concepts
//!
//! - [`Grid`]: a named list plus the request, retained state and cast
//!   registry its components read from
//! - [`DataColumns`]: column provider turning row fields into safe cell HTML
//! - [`FilterHeader`]: search schema, search form, `filter`/`reset` actions
//!   and list narrowing
//! - [`Model`]: the row type, with optional [`Describable`] and
//!   [`Searchable`] capabilities
//! - [`SearchContext`]: applies criteria to an in-memory or a queryable list
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use gridview::{
//!     DataColumns, DataManipulator, DataModel, FieldType, FilterHeader, Grid, GridRequest,
//! };
//! use serde_json::json;
//!
//! let model = DataModel::new("Team")
//!     .field("Name", FieldType::Text)
//!     .field("City", FieldType::Text);
//! let request = GridRequest::new("POST", "admin/teams")
//!     .with_post_vars(json!({"filter": {"teams": {"City": "bris"}}}));
//! let mut grid = Grid::new(
//!     "teams",
//!     vec![
//!         json!({"Name": "Rovers", "City": "Bristol"}),
//!         json!({"Name": "United", "City": "Leeds"}),
//!     ],
//! )
//! .with_model(Arc::new(model))
//! .with_request(request);
//!
//! let narrowed = FilterHeader::new().manipulated_data(&grid, grid.list()).unwrap();
//! grid.set_list(narrowed);
//!
//! let columns: DataColumns<serde_json::Value> = DataColumns::new();
//! let rows = grid.render_rows(&columns).unwrap();
//! assert_eq!(rows, vec![vec!["Rovers".to_string(), "Bristol".to_string()]]);
//! ```
//!
//! ## Configuration
//!
//! Model names, summary and searchable fields can be declared in YAML and
//! loaded through [`ConfigRegistry`]; see the [`config`] module.

pub mod assets;
pub mod cast;
pub mod columns;
pub mod components;
pub mod config;
mod error;
pub mod grid;
pub mod header;
pub mod list;
pub mod model;
pub mod request;
pub mod search;
pub mod state;
pub mod value;

pub use cast::{CastDefinition, CastRegistry, Caster};
pub use columns::{column_class, DataColumns, DisplayField, DisplayFields, FormatTemplate, Formatter};
pub use components::{
    ActionProvider, ColumnMetadata, ColumnProvider, DataManipulator, HtmlFragmentProvider,
    HtmlFragments,
};
pub use config::{ConfigRegistry, FieldList, ModelConfig, SearchableFieldEntry};
pub use error::{GridError, Result};
pub use grid::Grid;
pub use header::{FilterHeader, FormField, SearchFieldSchema, SearchForm, SearchState};
pub use list::{ArrayList, DataSource, QueryableList};
pub use model::{
    BareModel, DataModel, DbField, Describable, FieldType, Model, Record, Searchable,
};
pub use request::GridRequest;
pub use search::{
    Backing, FilterKind, FilterSpec, FormFieldKind, InMemorySearchContext, QueryableSearchContext,
    SearchContext, SearchCriteria, SearchDefinition, SearchField, SearchableFields,
};
pub use state::{FilterState, GridState, MemoryStateStore, StateStore};
pub use value::DataValue;
