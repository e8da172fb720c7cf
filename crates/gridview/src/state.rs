//! Retained grid state.
//!
//! Each grid keeps a small JSON document between requests, namespaced per
//! component. The filter header stores its criteria as
//! `{"FilterHeader": {"Columns": {"Name": "x"}}}`. Where that document lives
//! is up to the [`StateStore`] the grid is given; a grid without a store
//! starts every request with empty state.

use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Namespace the filter header keeps its criteria under.
pub const FILTER_HEADER_NAMESPACE: &str = "FilterHeader";

/// The retained state of one grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridState(BTreeMap<String, serde_json::Value>);

impl GridState {
    pub fn new() -> Self {
        GridState::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reads a component's state, or its default when nothing is stored.
    pub fn component<T: DeserializeOwned + Default>(&self, namespace: &str) -> Result<T> {
        match self.0.get(namespace) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(T::default()),
        }
    }

    pub fn set_component<T: Serialize>(&mut self, namespace: &str, state: &T) -> Result<()> {
        self.0
            .insert(namespace.to_string(), serde_json::to_value(state)?);
        Ok(())
    }

    pub fn remove(&mut self, namespace: &str) -> Option<serde_json::Value> {
        self.0.remove(namespace)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Filter header state: the criteria applied by the last `filter` action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(rename = "Columns", default)]
    pub columns: BTreeMap<String, String>,
}

/// Where retained grid state is kept between requests.
pub trait StateStore {
    fn load(&self, grid: &str) -> Option<GridState>;

    fn save(&mut self, grid: &str, state: &GridState);
}

/// A [`StateStore`] kept in memory, keyed by grid name.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    states: HashMap<String, GridState>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        MemoryStateStore::default()
    }

    /// A store already holding `state` for `grid`.
    pub fn with_state(mut self, grid: impl Into<String>, state: GridState) -> Self {
        self.states.insert(grid.into(), state);
        self
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, grid: &str) -> Option<GridState> {
        self.states.get(grid).cloned()
    }

    fn save(&mut self, grid: &str, state: &GridState) {
        self.states.insert(grid.to_string(), state.clone());
    }
}
