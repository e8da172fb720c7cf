//! The grid context components render against.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::cast::CastRegistry;
use crate::components::ColumnProvider;
use crate::error::Result;
use crate::list::DataSource;
use crate::model::{BareModel, Model, Record};
use crate::request::GridRequest;
use crate::state::{GridState, StateStore};
use crate::value::DataValue;

/// A named grid over a list of rows.
///
/// Carries everything its components need from the outside world: the list,
/// the model of its rows, the current request, a cast registry, the grid-wide
/// field escape table and the store for retained state.
pub struct Grid<R> {
    name: String,
    list: DataSource<R>,
    model: Option<Arc<dyn Model>>,
    request: GridRequest,
    state_store: Option<Box<dyn StateStore>>,
    casts: CastRegistry,
    field_escape: Vec<(String, String)>,
    form_link: Option<String>,
}

impl<R> fmt::Debug for Grid<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("name", &self.name)
            .field("model", &self.model.as_ref().map(|m| m.type_name().to_string()))
            .field("request", &self.request)
            .field("field_escape", &self.field_escape)
            .finish_non_exhaustive()
    }
}

impl<R: Record + Clone> Grid<R> {
    pub fn new(name: impl Into<String>, list: impl Into<DataSource<R>>) -> Self {
        Grid {
            name: name.into(),
            list: list.into(),
            model: None,
            request: GridRequest::default(),
            state_store: None,
            casts: CastRegistry::with_defaults(),
            field_escape: Vec::new(),
            form_link: None,
        }
    }

    /// Sets the model explicitly, overriding whatever the list reports.
    pub fn with_model(mut self, model: Arc<dyn Model>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_request(mut self, request: GridRequest) -> Self {
        self.request = request;
        self
    }

    pub fn with_state_store(mut self, store: impl StateStore + 'static) -> Self {
        self.state_store = Some(Box::new(store));
        self
    }

    pub fn with_casts(mut self, casts: CastRegistry) -> Self {
        self.casts = casts;
        self
    }

    /// Literal search → replace pairs applied, in order, to every cell.
    pub fn with_field_escape<S: Into<String>, T: Into<String>>(
        mut self,
        pairs: impl IntoIterator<Item = (S, T)>,
    ) -> Self {
        self.field_escape = pairs
            .into_iter()
            .map(|(search, replace)| (search.into(), replace.into()))
            .collect();
        self
    }

    /// Link of the form the grid is embedded in.
    pub fn with_form_link(mut self, link: impl Into<String>) -> Self {
        self.form_link = Some(link.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn list(&self) -> &DataSource<R> {
        &self.list
    }

    pub fn set_list(&mut self, list: impl Into<DataSource<R>>) {
        self.list = list.into();
    }

    /// The explicit model, else the list's, else a bare model named after `R`.
    pub fn model(&self) -> Arc<dyn Model> {
        self.model
            .clone()
            .or_else(|| self.list.model())
            .unwrap_or_else(|| Arc::new(BareModel::of::<R>()))
    }

    pub fn request(&self) -> &GridRequest {
        &self.request
    }

    pub fn set_request(&mut self, request: GridRequest) {
        self.request = request;
    }

    pub fn casts(&self) -> &CastRegistry {
        &self.casts
    }

    pub fn field_escape(&self) -> &[(String, String)] {
        &self.field_escape
    }

    pub fn data_field_value(&self, row: &R, field: &str) -> DataValue {
        row.field_value(field)
    }

    pub fn casted_value(&self, value: &DataValue, definition: &str) -> Result<String> {
        self.casts.cast(definition, value)
    }

    /// Link to one of the grid's own actions, e.g. `schema/SearchForm`.
    pub fn link(&self, action: &str) -> String {
        let own = format!("field/{}", self.name);
        [self.form_link.as_deref(), Some(own.as_str()), Some(action)]
            .into_iter()
            .flatten()
            .map(|part| part.trim_matches('/'))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Retained state, empty when there is no store or nothing was saved.
    pub fn load_state(&self) -> GridState {
        self.state_store
            .as_ref()
            .and_then(|store| store.load(&self.name))
            .unwrap_or_default()
    }

    pub fn save_state(&mut self, state: &GridState) {
        match self.state_store.as_mut() {
            Some(store) => store.save(&self.name, state),
            None => trace!(grid = %self.name, "no state store, state change dropped"),
        }
    }

    /// Renders every row of the list through `columns`.
    pub fn render_rows(&self, columns: &dyn ColumnProvider<R>) -> Result<Vec<Vec<String>>> {
        let names = columns.columns_handled(self)?;
        columns.rows_content(self, &self.list.rows(), &names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::ArrayList;
    use crate::state::MemoryStateStore;
    use serde_json::{json, Value};

    fn grid() -> Grid<Value> {
        Grid::new("teams", vec![json!({"Name": "Rovers"})])
    }

    #[test]
    fn links_join_form_and_action() {
        assert_eq!(grid().link("schema/SearchForm"), "field/teams/schema/SearchForm");
        assert_eq!(
            grid().with_form_link("admin/teams/EditForm/").link("reset"),
            "admin/teams/EditForm/field/teams/reset"
        );
    }

    #[test]
    fn model_falls_back_to_the_row_type() {
        assert!(grid().model().type_name().contains("Value"));
        let tagged: Grid<Value> = Grid::new(
            "teams",
            ArrayList::new(vec![]).with_model(Arc::new(BareModel::new("Team"))),
        );
        assert_eq!(tagged.model().type_name(), "Team");
        let explicit = tagged.with_model(Arc::new(BareModel::new("Club")));
        assert_eq!(explicit.model().type_name(), "Club");
    }

    #[test]
    fn state_without_a_store_is_empty() {
        let mut grid = grid();
        let state = GridState::from_json(r#"{"FilterHeader":{}}"#).unwrap();
        grid.save_state(&state);
        assert!(grid.load_state().is_empty());
    }

    #[test]
    fn state_round_trips_through_the_store() {
        let mut grid = grid().with_state_store(MemoryStateStore::new());
        let state = GridState::from_json(r#"{"FilterHeader":{"Columns":{"Name":"x"}}}"#).unwrap();
        grid.save_state(&state);
        assert_eq!(grid.load_state(), state);
    }

    #[test]
    fn reads_and_casts_values() {
        let grid = grid();
        let row = json!({"Budget": 1500});
        let value = grid.data_field_value(&row, "Budget");
        assert_eq!(grid.casted_value(&value, "Currency").unwrap(), "$1,500.00");
        assert_eq!(grid.data_field_value(&row, "Missing"), DataValue::Null);
    }
}
