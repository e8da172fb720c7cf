//! Collections a grid can show.
//!
//! A grid either wraps rows held in memory ([`ArrayList`]) or a collection
//! that evaluates queries itself ([`QueryableList`]), typically backed by a
//! database. Narrowing never mutates the source: both kinds return a new
//! collection.

use std::sync::Arc;

use gridview_seeker::Query;

use crate::model::{record_accessor, Model, Record};

/// A collection able to narrow itself with a [`Query`].
pub trait QueryableList<R> {
    /// The model of the rows in this collection.
    fn model(&self) -> Arc<dyn Model>;

    /// A new collection holding only the rows matching `query`.
    fn filtered(&self, query: &Query) -> Box<dyn QueryableList<R>>;

    fn rows(&self) -> Vec<R>;

    fn count(&self) -> usize {
        self.rows().len()
    }
}

/// Rows held in memory, optionally tagged with their model.
#[derive(Clone)]
pub struct ArrayList<R> {
    rows: Vec<R>,
    model: Option<Arc<dyn Model>>,
}

impl<R> ArrayList<R> {
    pub fn new(rows: Vec<R>) -> Self {
        ArrayList { rows, model: None }
    }

    pub fn with_model(mut self, model: Arc<dyn Model>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn model(&self) -> Option<Arc<dyn Model>> {
        self.model.clone()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R: Record + Clone> ArrayList<R> {
    /// Matching rows, evaluated in memory. The model tag is kept.
    pub fn filtered(&self, query: &Query) -> ArrayList<R> {
        ArrayList {
            rows: query.filter_cloned(&self.rows, record_accessor),
            model: self.model.clone(),
        }
    }
}

impl<R> From<Vec<R>> for ArrayList<R> {
    fn from(rows: Vec<R>) -> Self {
        ArrayList::new(rows)
    }
}

/// The list behind a grid.
pub enum DataSource<R> {
    Array(ArrayList<R>),
    Queryable(Box<dyn QueryableList<R>>),
}

impl<R> std::fmt::Debug for DataSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Array(_) => f.write_str("DataSource::Array(..)"),
            DataSource::Queryable(_) => f.write_str("DataSource::Queryable(..)"),
        }
    }
}

impl<R: Clone> DataSource<R> {
    /// The model the list knows about, if any.
    pub fn model(&self) -> Option<Arc<dyn Model>> {
        match self {
            DataSource::Array(list) => list.model(),
            DataSource::Queryable(list) => Some(list.model()),
        }
    }

    pub fn rows(&self) -> Vec<R> {
        match self {
            DataSource::Array(list) => list.rows().to_vec(),
            DataSource::Queryable(list) => list.rows(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DataSource::Array(list) => list.len(),
            DataSource::Queryable(list) => list.count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_queryable(&self) -> bool {
        matches!(self, DataSource::Queryable(_))
    }
}

impl<R: Record + Clone> DataSource<R> {
    /// A new list holding the rows that match `query`.
    ///
    /// In-memory lists are scanned here; queryable lists evaluate the query
    /// themselves.
    pub fn narrowed(&self, query: &Query) -> DataSource<R> {
        match self {
            DataSource::Array(list) => DataSource::Array(list.filtered(query)),
            DataSource::Queryable(list) => DataSource::Queryable(list.filtered(query)),
        }
    }
}

impl<R> From<ArrayList<R>> for DataSource<R> {
    fn from(list: ArrayList<R>) -> Self {
        DataSource::Array(list)
    }
}

impl<R> From<Vec<R>> for DataSource<R> {
    fn from(rows: Vec<R>) -> Self {
        DataSource::Array(ArrayList::new(rows))
    }
}

impl<R> From<Box<dyn QueryableList<R>>> for DataSource<R> {
    fn from(list: Box<dyn QueryableList<R>>) -> Self {
        DataSource::Queryable(list)
    }
}
