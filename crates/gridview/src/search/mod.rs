//! Searchable fields, filters and search contexts.

mod context;
mod fields;
mod filter;

pub use context::{
    Backing, InMemorySearchContext, QueryableSearchContext, SearchContext, SearchCriteria,
    SearchDefinition,
};
pub use fields::{FormFieldKind, SearchField, SearchableFields};
pub use filter::{FilterKind, FilterSpec, SearchFilter};
