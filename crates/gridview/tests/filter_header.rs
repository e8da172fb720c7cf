//! Filter header behaviour against in-memory and queryable lists.

use std::sync::Arc;

use gridview::model::record_accessor;
use gridview::request::GridRequest;
use gridview::{
    ActionProvider, Backing, BareModel, ConfigRegistry, DataManipulator, DataSource,
    FieldType, FilterHeader, FilterKind, FilterSpec, FormFieldKind, GridError, Grid,
    HtmlFragmentProvider, MemoryStateStore, Model, QueryableList, SearchCriteria,
    SearchDefinition, SearchField, SearchableFields,
};
use gridview_seeker::Query;
use serde_json::{json, Value};

// ============================================================================
// Fixtures
// ============================================================================

const MODELS: &str = r#"
Team:
  db:
    Name: Varchar
    City: Varchar
    Founded: Int
Cheerleader:
  db:
    Name: Varchar
  searchable_fields:
    - Name
    - Hat.Colour
Mom:
  db:
    Name: Varchar
  summary_fields:
    Name: Name
"#;

fn model(name: &str) -> Arc<dyn Model> {
    let registry = ConfigRegistry::from_yaml(MODELS).unwrap();
    Arc::new(registry.model(name).unwrap())
}

fn teams() -> Vec<Value> {
    vec![
        json!({"Name": "Rovers", "City": "Bristol", "Founded": 1883}),
        json!({"Name": "City", "City": "Bristol", "Founded": 1894}),
        json!({"Name": "United", "City": "Leeds", "Founded": 1919}),
    ]
}

fn team_grid() -> Grid<Value> {
    Grid::new("testfield", teams())
        .with_model(model("Team"))
        .with_state_store(MemoryStateStore::new())
}

fn names(list: &DataSource<Value>) -> Vec<String> {
    list.rows()
        .iter()
        .map(|row| row["Name"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// A list that evaluates queries itself, standing in for a database table.
struct FakeTable {
    rows: Vec<Value>,
    model: Arc<dyn Model>,
}

impl QueryableList<Value> for FakeTable {
    fn model(&self) -> Arc<dyn Model> {
        self.model.clone()
    }

    fn filtered(&self, query: &Query) -> Box<dyn QueryableList<Value>> {
        Box::new(FakeTable {
            rows: query.filter_cloned(&self.rows, record_accessor),
            model: self.model.clone(),
        })
    }

    fn rows(&self) -> Vec<Value> {
        self.rows.clone()
    }
}

fn queryable_team_grid() -> Grid<Value> {
    let table: Box<dyn QueryableList<Value>> = Box::new(FakeTable {
        rows: teams(),
        model: model("Team"),
    });
    Grid::new("testfield", table).with_state_store(MemoryStateStore::new())
}

fn filter_request(vars: Value) -> GridRequest {
    GridRequest::new("POST", "admin/teams").with_post_vars(json!({"filter": {"testfield": vars}}))
}

// ============================================================================
// Schema
// ============================================================================

#[test]
fn schema_without_filters() {
    let schema = FilterHeader::new().search_field_schema(&team_grid()).unwrap();
    insta::assert_snapshot!(
        schema.to_json().unwrap(),
        @r#"{"formSchemaUrl":"field/testfield/schema/SearchForm","name":"q","placeholder":"Search \"Teams\"","filters":{},"gridfield":"testfield"}"#
    );
}

#[test]
fn schema_with_submitted_filters() {
    let grid = team_grid().with_request(filter_request(json!({"Name": "test", "City": "place"})));
    let schema = FilterHeader::new().search_field_schema(&grid).unwrap();
    insta::assert_snapshot!(
        schema.to_json().unwrap(),
        @r#"{"formSchemaUrl":"field/testfield/schema/SearchForm","name":"q","placeholder":"Search \"Teams\"","filters":{"Search__City":"place","Search__Name":"test"},"gridfield":"testfield"}"#
    );
}

#[test]
fn schema_uses_the_custom_search_field() {
    let header = FilterHeader::new().with_search_field("Name");
    assert_eq!(header.search_field(), Some("Name"));
    let schema = header.search_field_schema(&team_grid()).unwrap();
    assert_eq!(schema.name, "Name");
}

#[test]
fn schema_respects_the_form_link() {
    let grid = team_grid().with_form_link("admin/EditForm");
    let schema = FilterHeader::new().search_field_schema(&grid).unwrap();
    assert_eq!(schema.form_schema_url, "admin/EditForm/field/testfield/schema/SearchForm");
}

#[test]
fn placeholder_prefers_explicit_text() {
    let header = FilterHeader::new().with_placeholder_text("Find a team");
    assert_eq!(header.search_field_schema(&team_grid()).unwrap().placeholder, "Find a team");
}

// ============================================================================
// Actions
// ============================================================================

#[test]
fn exposes_filter_and_reset() {
    assert_eq!(FilterHeader::new().actions(&team_grid()), vec!["filter", "reset"]);
}

#[test]
fn filter_stores_submitted_columns() {
    let mut grid = team_grid();
    let header = FilterHeader::new();
    header
        .handle_action(&mut grid, "filter", &json!({"filter": {"testfield": {"Name": "test", "City": "place"}}}))
        .unwrap();

    let criteria = header.criteria(&grid).unwrap();
    assert_eq!(
        criteria,
        SearchCriteria::from([("City".into(), "place".into()), ("Name".into(), "test".into())])
    );
}

#[test]
fn filter_replaces_earlier_columns() {
    let mut grid = team_grid();
    let header = FilterHeader::new();
    header
        .handle_action(&mut grid, "filter", &json!({"filter": {"testfield": {"Name": "a", "City": "b"}}}))
        .unwrap();
    header
        .handle_action(&mut grid, "filter", &json!({"filter": {"testfield": {"Name": "c"}}}))
        .unwrap();
    assert_eq!(header.criteria(&grid).unwrap().len(), 1);
}

#[test]
fn reset_clears_columns_whatever_is_submitted() {
    let mut grid = team_grid();
    let header = FilterHeader::new();
    header
        .handle_action(&mut grid, "filter", &json!({"filter": {"testfield": {"Name": "test"}}}))
        .unwrap();
    header
        .handle_action(&mut grid, "reset", &json!({"filter": {"testfield": {"Name": "other"}}}))
        .unwrap();
    assert!(header.criteria(&grid).unwrap().is_empty());
}

#[test]
fn request_filters_override_retained_ones() {
    let mut grid = team_grid();
    let header = FilterHeader::new();
    header
        .handle_action(&mut grid, "filter", &json!({"filter": {"testfield": {"Name": "a", "City": "b"}}}))
        .unwrap();
    grid.set_request(filter_request(json!({"Name": "z"})));

    let criteria = header.criteria(&grid).unwrap();
    assert_eq!(criteria["Name"], "z");
    assert_eq!(criteria["City"], "b");
}

// ============================================================================
// Capability checks
// ============================================================================

#[test]
fn can_filter_searchable_models() {
    let header = FilterHeader::new();
    assert!(header.can_filter_any_columns(&team_grid()));

    let moms: Grid<Value> = Grid::new("moms", Vec::new()).with_model(model("Mom"));
    assert!(!header.can_filter_any_columns(&moms));

    let bare: Grid<Value> = Grid::new("rows", Vec::new()).with_model(Arc::new(BareModel::new("ArrayData")));
    assert!(!header.can_filter_any_columns(&bare));
}

#[test]
fn fragments_render_holder_and_toggle() {
    let grid = team_grid();
    let fragments = FilterHeader::new().html_fragments(&grid).unwrap().unwrap();

    assert_eq!(
        fragments.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["before", "buttons-before-right"]
    );
    let before = &fragments["before"];
    assert!(before.contains("grid-field__search-holder--hidden"));
    assert!(before.contains("&quot;gridfield&quot;:&quot;testfield&quot;"));
    assert!(fragments["buttons-before-right"].contains(r#"title="Open search and filter""#));
}

#[test]
fn no_fragments_without_searchable_fields() {
    let moms: Grid<Value> = Grid::new("moms", Vec::new()).with_model(model("Mom"));
    assert!(FilterHeader::new().html_fragments(&moms).unwrap().is_none());

    let rows: Grid<Value> = Grid::new("rows", vec![json!({"Name": "x"})]);
    assert!(FilterHeader::new().html_fragments(&rows).unwrap().is_none());
}

#[test]
fn search_context_needs_a_searchable_model() {
    let rows: Grid<Value> = Grid::new("rows", Vec::new()).with_model(Arc::new(BareModel::new("ArrayData")));
    let err = FilterHeader::new().search_context(&rows).err().unwrap();
    assert!(matches!(err, GridError::Configuration(_)));
    assert!(err.to_string().contains("Cannot dynamically instantiate search context for ArrayData"));
}

#[test]
fn explicit_search_context_works_without_a_searchable_model() {
    let fields = SearchableFields::new().with(SearchField::new("Name", FieldType::Text));
    let header = FilterHeader::new()
        .with_search_context(SearchDefinition::new("ArrayData", fields));
    let grid: Grid<Value> = Grid::new("rows", vec![json!({"Name": "Ann"}), json!({"Name": "Bob"})])
        .with_request(GridRequest::new("POST", "/").with_post_vars(json!({"filter": {"rows": {"Name": "bo"}}})));

    assert_eq!(header.search_context(&grid).unwrap().search_fields(), vec!["Name"]);
    let narrowed = header.manipulated_data(&grid, grid.list()).unwrap();
    assert_eq!(narrowed.len(), 1);
}

// ============================================================================
// Search form
// ============================================================================

#[test]
fn search_form_lists_general_then_searchable_fields() {
    let grid: Grid<Value> = Grid::new("cheerleaders", Vec::new()).with_model(model("Cheerleader"));
    let form = FilterHeader::new().search_form(&grid).unwrap();

    assert_eq!(form.name, "CheerleadersSearchForm");
    assert!(form.has_extra_class("cms-search-form"));
    assert_eq!(
        form.field_names(),
        vec!["Search__q", "Search__Name", "Search__Hat__Colour"]
    );
    assert_eq!(form.field("Search__q").unwrap().title, "Search");
    for field in &form.fields {
        assert!(field.has_extra_class("stacked"), "{} lacks stacked", field.name);
        assert!(field.has_extra_class("no-change-track"), "{} lacks no-change-track", field.name);
    }
}

#[test]
fn search_form_name_drops_non_word_characters() {
    let registry = ConfigRegistry::from_yaml("Person:\n  plural_name: \"People & Pets\"\n  db:\n    Name: Varchar\n").unwrap();
    let grid: Grid<Value> = Grid::new("people", Vec::new()).with_model(Arc::new(registry.model("Person").unwrap()));
    assert_eq!(FilterHeader::new().search_form(&grid).unwrap().name, "PeoplePetsSearchForm");
}

#[test]
fn search_form_is_prefilled_and_typed() {
    let grid = team_grid().with_request(filter_request(json!({"City": "Leeds", "q": "utd"})));
    let form = FilterHeader::new().search_form(&grid).unwrap();

    assert_eq!(form.field("Search__City").unwrap().value, "Leeds");
    assert_eq!(form.field("Search__q").unwrap().value, "utd");
    assert_eq!(form.field("Search__Name").unwrap().value, "");
    assert_eq!(form.field("Search__Founded").unwrap().kind, FormFieldKind::Numeric);
}

#[test]
fn search_form_uses_the_custom_search_field() {
    let form = FilterHeader::new()
        .with_search_field("Keywords")
        .search_form(&team_grid())
        .unwrap();
    assert_eq!(form.fields[0].name, "Search__Keywords");
}

// ============================================================================
// Narrowing
// ============================================================================

#[test]
fn empty_criteria_leave_the_list_alone() {
    let grid = team_grid();
    let list = FilterHeader::new().manipulated_data(&grid, grid.list()).unwrap();
    assert_eq!(names(&list), vec!["Rovers", "City", "United"]);
}

#[test]
fn retained_filters_narrow_the_list() {
    let mut grid = team_grid();
    let header = FilterHeader::new();
    header
        .handle_action(&mut grid, "filter", &json!({"filter": {"testfield": {"City": "bristol"}}}))
        .unwrap();

    let list = header.manipulated_data(&grid, grid.list()).unwrap();
    assert_eq!(names(&list), vec!["Rovers", "City"]);
    assert_eq!(grid.list().len(), 3);
}

#[test]
fn general_search_matches_any_field() {
    let grid = team_grid().with_request(filter_request(json!({"q": "city"})));
    let list = FilterHeader::new().manipulated_data(&grid, grid.list()).unwrap();
    assert_eq!(names(&list), vec!["City"]);
}

#[test]
fn non_searchable_models_pass_through() {
    let grid: Grid<Value> = Grid::new("rows", vec![json!({"Name": "x"}), json!({"Name": "y"})])
        .with_request(GridRequest::new("POST", "/").with_post_vars(json!({"filter": {"rows": {"Name": "x"}}})));
    let list = FilterHeader::new().manipulated_data(&grid, grid.list()).unwrap();
    assert_eq!(list.len(), 2);
}

#[test]
fn queryable_lists_get_a_queryable_context() {
    let header = FilterHeader::new();
    assert_eq!(header.search_context(&team_grid()).unwrap().backing(), Backing::InMemory);
    assert_eq!(
        header.search_context(&queryable_team_grid()).unwrap().backing(),
        Backing::Queryable
    );
}

#[test]
fn both_contexts_expose_the_same_fields_and_filters() {
    let header = FilterHeader::new();
    let memory = header.search_context(&team_grid()).unwrap();
    let queryable = header.search_context(&queryable_team_grid()).unwrap();

    assert_eq!(memory.search_fields(), queryable.search_fields());
    assert_eq!(memory.filters(), queryable.filters());
    assert!(memory
        .filters()
        .iter()
        .all(|filter| filter.kind() == FilterKind::PartialMatch || filter.kind() == FilterKind::ExactMatch));
}

#[test]
fn both_contexts_narrow_alike() {
    let header = FilterHeader::new();
    for vars in [
        json!({"City": "bristol"}),
        json!({"q": "united"}),
        json!({"Founded": "1894"}),
        json!({"Name": "r", "City": "Bris"}),
    ] {
        let memory = team_grid().with_request(filter_request(vars.clone()));
        let queryable = queryable_team_grid().with_request(filter_request(vars.clone()));

        let a = header.manipulated_data(&memory, memory.list()).unwrap();
        let b = header.manipulated_data(&queryable, queryable.list()).unwrap();
        assert!(b.is_queryable());
        assert_eq!(names(&a), names(&b), "criteria {vars}");
    }
}

#[test]
fn general_filter_override_applies_to_every_field() {
    let definition = model("Team")
        .searchable()
        .unwrap()
        .default_search_context()
        .general_filter(FilterSpec::new(FilterKind::StartsWith));
    let header = FilterHeader::new().with_search_context(definition);
    let grid = team_grid().with_request(filter_request(json!({"q": "ci"})));

    let list = header.manipulated_data(&grid, grid.list()).unwrap();
    assert_eq!(names(&list), vec!["City"]);
}

// ============================================================================
// Flags and invalid filters
// ============================================================================

fn flag_header() -> FilterHeader {
    let fields = SearchableFields::new()
        .with(SearchField::new("Name", FieldType::Text))
        .with(SearchField::new("Active", FieldType::Boolean));
    FilterHeader::new().with_search_context(SearchDefinition::new("Player", fields))
}

fn flag_grid(rows: Vec<Value>, active: &str) -> Grid<Value> {
    Grid::new("testfield", rows).with_request(filter_request(json!({"Active": active})))
}

#[test]
fn flag_filters_match_rows_storing_integers() {
    let rows = vec![
        json!({"Name": "Ann", "Active": 1}),
        json!({"Name": "Bea", "Active": 0}),
    ];
    let header = flag_header();

    let grid = flag_grid(rows.clone(), "1");
    assert_eq!(names(&header.manipulated_data(&grid, grid.list()).unwrap()), vec!["Ann"]);
    let grid = flag_grid(rows, "0");
    assert_eq!(names(&header.manipulated_data(&grid, grid.list()).unwrap()), vec!["Bea"]);
}

#[test]
fn flag_filters_match_rows_storing_text() {
    let rows = vec![
        json!({"Name": "Ann", "Active": "1"}),
        json!({"Name": "Bea", "Active": "0"}),
        json!({"Name": "Cara", "Active": true}),
    ];
    let grid = flag_grid(rows, "yes");
    let list = flag_header().manipulated_data(&grid, grid.list()).unwrap();
    assert_eq!(names(&list), vec!["Ann", "Cara"]);
}

#[test]
fn comparison_filter_on_a_flag_field_is_a_query_error() {
    let fields = SearchableFields::new().with(
        SearchField::new("Active", FieldType::Boolean).filter(FilterSpec::new(FilterKind::GreaterThan)),
    );
    let header = FilterHeader::new().with_search_context(SearchDefinition::new("Player", fields));
    let grid = flag_grid(vec![json!({"Name": "Ann", "Active": 1})], "1");

    let err = header.manipulated_data(&grid, grid.list()).unwrap_err();
    assert!(matches!(err, GridError::Query(_)));
}
