//! Seeker - filter clause evaluation for grid search contexts.
//!
//! A search context turns submitted criteria into a [`Query`]. Queryable
//! collections translate that query for their own engine; in-memory
//! collections evaluate it here, row by row, through an accessor function.
//!
//! # Quick Start
//!
//! ```rust
//! use gridview_seeker::{Number, Query, Value};
//!
//! struct Team {
//!     name: String,
//!     founded: i64,
//! }
//!
//! fn accessor<'a>(team: &'a Team, field: &str) -> Value<'a> {
//!     match field {
//!         "Name" => Value::from(team.name.as_str()),
//!         "Founded" => Value::Number(Number::I64(team.founded)),
//!         _ => Value::None,
//!     }
//! }
//!
//! let teams = vec![
//!     Team { name: "Rovers".into(), founded: 1883 },
//!     Team { name: "Wanderers".into(), founded: 1877 },
//! ];
//!
//! let query = Query::new()
//!     .and_contains("Name", "ROV")
//!     .and_gt("Founded", 1880i64);
//!
//! let results = query.filter(&teams, accessor);
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].name, "Rovers");
//! ```
//!
//! # Query Semantics
//!
//! ```text
//! match = (all AND clauses match)
//!       ∧ (each ANY group has a matching clause)
//!       ∧ (no NOT clause matches)
//! ```
//!
//! Text comparisons fold case unless a clause is marked case sensitive.
//! Missing fields ([`Value::None`]) never match.

mod clause;
mod error;
mod op;
mod query;
mod value;

pub use clause::{Clause, ClauseValue};
pub use error::{Result, SeekerError};
pub use op::Op;
pub use query::Query;
pub use value::{Number, Value};
