//! Behaviour checks across clause and query combinations.

use gridview_seeker::{Clause, ClauseValue, Number, Op, Query, SeekerError, Value};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Cheerleader {
    name: String,
    hat_colour: Option<String>,
    age: u8,
}

fn cheerleader<'a>(row: &'a Cheerleader, field: &str) -> Value<'a> {
    match field {
        "Name" => Value::from(row.name.as_str()),
        "Hat.Colour" => match &row.hat_colour {
            Some(colour) => Value::from(colour.as_str()),
            None => Value::None,
        },
        "Age" => Value::Number(Number::from(row.age)),
        _ => Value::None,
    }
}

fn squad() -> Vec<Cheerleader> {
    vec![
        Cheerleader {
            name: "Ann".into(),
            hat_colour: Some("Blue".into()),
            age: 19,
        },
        Cheerleader {
            name: "Bea".into(),
            hat_colour: None,
            age: 22,
        },
        Cheerleader {
            name: "Cara".into(),
            hat_colour: Some("Light blue".into()),
            age: 25,
        },
    ]
}

// ============================================================================
// Relation paths and missing values
// ============================================================================

#[test]
fn dotted_relation_paths_are_plain_field_names() {
    let squad = squad();
    let found = Query::new()
        .and_contains("Hat.Colour", "blue")
        .filter(&squad, cheerleader);
    let names: Vec<&str> = found.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Cara"]);
}

#[test]
fn rows_without_the_field_are_excluded_even_by_not_equal() {
    let squad = squad();
    let found = Query::new()
        .and("Hat.Colour", Op::Ne, "Blue")
        .filter(&squad, cheerleader);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Cara");
}

// ============================================================================
// Typed comparisons
// ============================================================================

#[test]
fn numeric_ranges() {
    let squad = squad();
    let found = Query::new()
        .and_gt("Age", 19i64)
        .and_lt("Age", 25i64)
        .filter(&squad, cheerleader);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Bea");
}

#[test]
fn submitted_text_compares_numerically_for_exact_match() {
    let clause = Clause::new("Age", Op::Eq, "22");
    let squad = squad();
    let found = Query::new()
        .and_clause(clause)
        .filter(&squad, cheerleader);
    assert_eq!(found[0].name, "Bea");
}

#[test]
fn anchored_matches() {
    let starts = Query::new().and("Name", Op::StartsWith, "c");
    let ends = Query::new().and_endswith("Name", "A");
    assert_eq!(starts.count(&squad(), cheerleader), 1);
    assert_eq!(ends.count(&squad(), cheerleader), 2);
}

// ============================================================================
// Errors and introspection
// ============================================================================

#[test]
fn invalid_operator_for_type_is_reported() {
    let err = Clause::try_new("Age", Op::Contains, ClauseValue::Number(Number::I64(1))).unwrap_err();
    assert!(matches!(
        err,
        SeekerError::InvalidOperatorForType { op: "contains", value_type: "number" }
    ));
    assert_eq!(
        err.to_string(),
        "operator 'contains' is not valid for number values"
    );
}

#[test]
fn query_equality_reflects_clauses() {
    let a = Query::new().and_eq("Name", "Ann");
    let b = Query::new().and_eq("Name", "Ann");
    assert_eq!(a, b);
    assert_ne!(a, Query::new());
}
