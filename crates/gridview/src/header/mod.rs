//! The filter header: search schema, search form, header fragments, the
//! `filter` / `reset` actions and list narrowing.
//!
//! Criteria reach the header two ways: submitted with the current request
//! under `filter[<grid>]`, or retained in grid state by an earlier `filter`
//! action. When both are present the request wins, field by field.

mod form;
mod schema;

use std::sync::Arc;

use minijinja::context;
use tracing::{debug, trace};

pub use form::{FormField, SearchForm, BOOLEAN_OPTIONS};
pub use schema::SearchFieldSchema;

use crate::assets::{self, SEARCH_HOLDER, SEARCH_TOGGLE};
use crate::columns::NON_WORD;
use crate::components::{ActionProvider, DataManipulator, HtmlFragmentProvider, HtmlFragments};
use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::list::DataSource;
use crate::model::{Model, Record};
use crate::request::{filter_criteria, input_name_for_field};
use crate::search::{
    FormFieldKind, InMemorySearchContext, QueryableSearchContext, SearchContext, SearchCriteria,
    SearchDefinition,
};
use crate::state::{FilterState, FILTER_HEADER_NAMESPACE};

/// Label of the toolbar button opening the search panel.
pub const OPEN_SEARCH_LABEL: &str = "Open search and filter";

/// Classes every search form field carries.
const FIELD_CLASSES: [&str; 2] = ["stacked", "no-change-track"];

/// Where a grid is in its search lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    NoFilter,
    /// The current request carries criteria.
    FilterSubmitted,
    /// Criteria retained from an earlier request narrow the list.
    FilterApplied,
}

/// Search and filter header for a grid.
#[derive(Debug, Clone, Default)]
pub struct FilterHeader {
    search_field: Option<String>,
    placeholder_text: Option<String>,
    search_context: Option<SearchDefinition>,
}

impl FilterHeader {
    pub fn new() -> Self {
        FilterHeader::default()
    }

    /// Overrides the name of the general search field.
    pub fn with_search_field(mut self, name: impl Into<String>) -> Self {
        self.search_field = Some(name.into());
        self
    }

    pub fn search_field(&self) -> Option<&str> {
        self.search_field.as_deref()
    }

    pub fn with_placeholder_text(mut self, text: impl Into<String>) -> Self {
        self.placeholder_text = Some(text.into());
        self
    }

    /// Uses `definition` instead of the model's default search context.
    pub fn with_search_context(mut self, definition: SearchDefinition) -> Self {
        self.search_context = Some(definition);
        self
    }

    /// Whether the grid's model has anything to filter on.
    pub fn can_filter_any_columns<R: Record + Clone>(&self, grid: &Grid<R>) -> bool {
        let model = grid.model();
        match model.searchable() {
            Some(searchable) => !searchable.searchable_fields().is_empty(),
            None => {
                trace!(model = model.type_name(), "model is not searchable");
                false
            }
        }
    }

    fn definition(&self, model: &dyn Model) -> Result<SearchDefinition> {
        let definition = match (&self.search_context, model.searchable()) {
            (Some(definition), _) => definition.clone(),
            (None, Some(searchable)) => searchable.default_search_context(),
            (None, None) => {
                return Err(GridError::Configuration(format!(
                    "Cannot dynamically instantiate search context for {model}. Pass a \
                     SearchDefinition to with_search_context() or implement \
                     Searchable::default_search_context() on {model}",
                    model = model.type_name()
                )))
            }
        };
        Ok(match &self.search_field {
            Some(name) => definition.general_field(name.clone()),
            None => definition,
        })
    }

    /// The search context for the grid's list.
    ///
    /// In-memory lists get an [`InMemorySearchContext`], queryable lists a
    /// [`QueryableSearchContext`]; both share the same definition.
    pub fn search_context<R: Record + Clone>(&self, grid: &Grid<R>) -> Result<Box<dyn SearchContext<R>>> {
        let model = grid.model();
        let definition = self.definition(model.as_ref())?;
        if grid.list().is_queryable() {
            debug!(model = model.type_name(), "queryable search context");
            Ok(Box::new(QueryableSearchContext::new(definition)))
        } else {
            debug!(model = model.type_name(), "in-memory search context");
            Ok(Box::new(InMemorySearchContext::new(definition)))
        }
    }

    /// Retained criteria overlaid with the criteria of the current request.
    pub fn criteria<R: Record + Clone>(&self, grid: &Grid<R>) -> Result<SearchCriteria> {
        let retained: FilterState = grid.load_state().component(FILTER_HEADER_NAMESPACE)?;
        let mut criteria = retained.columns;
        criteria.extend(grid.request().filter_vars(grid.name()));
        Ok(criteria)
    }

    pub fn search_state<R: Record + Clone>(&self, grid: &Grid<R>) -> Result<SearchState> {
        let has_values = |criteria: &SearchCriteria| criteria.values().any(|v| !v.trim().is_empty());
        if has_values(&grid.request().filter_vars(grid.name())) {
            return Ok(SearchState::FilterSubmitted);
        }
        let retained: FilterState = grid.load_state().component(FILTER_HEADER_NAMESPACE)?;
        Ok(if has_values(&retained.columns) {
            SearchState::FilterApplied
        } else {
            SearchState::NoFilter
        })
    }

    /// Name of the general search field.
    pub fn general_search_field<R: Record + Clone>(&self, grid: &Grid<R>) -> String {
        if let Some(name) = &self.search_field {
            return name.clone();
        }
        let model = grid.model();
        match self.definition(model.as_ref()) {
            Ok(definition) => definition.general_field_name().to_string(),
            Err(_) => model
                .describable()
                .map(|describable| describable.general_search_field_name())
                .unwrap_or_else(|| "q".to_string()),
        }
    }

    /// Search placeholder: explicit text, else the model's plural name, else
    /// its short type name.
    pub fn placeholder(&self, model: &dyn Model) -> String {
        if let Some(text) = &self.placeholder_text {
            return text.clone();
        }
        format!("Search \"{}\"", display_plural(model))
    }

    pub fn search_field_schema<R: Record + Clone>(&self, grid: &Grid<R>) -> Result<SearchFieldSchema> {
        let model = grid.model();
        let context = self.search_context(grid)?;
        let filters = self
            .criteria(grid)?
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(name, value)| (input_name_for_field(&name), value))
            .collect();

        Ok(SearchFieldSchema {
            form_schema_url: grid.link("schema/SearchForm"),
            name: context.definition().general_field_name().to_string(),
            placeholder: self.placeholder(model.as_ref()),
            filters,
            grid_field: grid.name().to_string(),
        })
    }

    /// The search form: the general search field, then one field per
    /// searchable field, prefilled with the current criteria.
    pub fn search_form<R: Record + Clone>(&self, grid: &Grid<R>) -> Result<SearchForm> {
        let model = grid.model();
        let context = self.search_context(grid)?;
        let definition = context.definition();
        let criteria = self.criteria(grid)?;
        let value_of = |name: &str| criteria.get(name).cloned().unwrap_or_default();

        let form_name = format!(
            "{}SearchForm",
            NON_WORD.replace_all(&display_plural(model.as_ref()), "")
        );
        let mut form = SearchForm::new(form_name);
        form.add_extra_class("cms-search-form");

        let general = definition.general_field_name();
        form.fields.push(
            FormField::new(input_name_for_field(general), "Search", FormFieldKind::Text)
                .with_value(value_of(general)),
        );
        for field in definition.fields() {
            form.fields.push(
                FormField::new(input_name_for_field(&field.name), field.title.clone(), field.form_field)
                    .with_value(value_of(&field.name)),
            );
        }
        for field in &mut form.fields {
            for class in FIELD_CLASSES {
                field.add_extra_class(class);
            }
        }
        Ok(form)
    }

    fn store_criteria<R: Record + Clone>(&self, grid: &mut Grid<R>, criteria: SearchCriteria) -> Result<()> {
        let mut state = grid.load_state();
        state.set_component(FILTER_HEADER_NAMESPACE, &FilterState { columns: criteria })?;
        grid.save_state(&state);
        Ok(())
    }
}

fn display_plural(model: &dyn Model) -> String {
    model
        .describable()
        .map(|describable| describable.plural_name())
        .unwrap_or_else(|| model.short_name().to_string())
}

impl<R: Record + Clone> HtmlFragmentProvider<R> for FilterHeader {
    /// Nothing is rendered for grids whose model cannot be filtered.
    fn html_fragments(&self, grid: &Grid<R>) -> Result<Option<HtmlFragments>> {
        if !self.can_filter_any_columns(grid) {
            return Ok(None);
        }
        let schema = self.search_field_schema(grid)?.to_json()?;
        let env = assets::environment()?;
        let before = env
            .get_template(SEARCH_HOLDER)?
            .render(context! { schema => schema })?;
        let toggle = env
            .get_template(SEARCH_TOGGLE)?
            .render(context! { label => OPEN_SEARCH_LABEL })?;

        Ok(Some(HtmlFragments::from([
            ("before".to_string(), before),
            ("buttons-before-right".to_string(), toggle),
        ])))
    }
}

impl<R: Record + Clone> ActionProvider<R> for FilterHeader {
    fn actions(&self, _grid: &Grid<R>) -> Vec<&'static str> {
        vec!["filter", "reset"]
    }

    /// `reset` clears the retained criteria whatever was submitted. `filter`
    /// replaces them with `data["filter"][<grid>]`.
    fn handle_action(&self, grid: &mut Grid<R>, action: &str, data: &serde_json::Value) -> Result<()> {
        let criteria = match action {
            "reset" => SearchCriteria::new(),
            "filter" => filter_criteria(data.get("filter"), grid.name()),
            _ => {
                trace!(action, "action not handled by filter header");
                return Ok(());
            }
        };
        debug!(grid = grid.name(), action, criteria = criteria.len(), "storing filter criteria");
        self.store_criteria(grid, criteria)
    }
}

impl<R: Record + Clone> DataManipulator<R> for FilterHeader {
    /// Narrows `list` with the current criteria. Lists of models that cannot
    /// be searched come back unchanged.
    fn manipulated_data(&self, grid: &Grid<R>, list: &DataSource<R>) -> Result<DataSource<R>> {
        let criteria = self.criteria(grid)?;
        let model: Arc<dyn Model> = grid.model();
        if criteria.values().all(|value| value.trim().is_empty())
            || (self.search_context.is_none() && model.searchable().is_none())
        {
            return Ok(list.narrowed(&Default::default()));
        }
        let context = self.search_context(grid)?;
        context.apply(list, &criteria)
    }
}
