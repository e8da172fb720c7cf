//! HTML fragment templates.
//!
//! Templates are stored as `(name, content)` pairs and rendered with
//! minijinja. Names end in `.html` so values are auto-escaped.

use minijinja::Environment;

use crate::error::Result;

pub const SEARCH_HOLDER: &str = "gridview/search-holder.html";
pub const SEARCH_TOGGLE: &str = "gridview/search-toggle.html";

/// Every fragment template, as `(name_with_extension, content)`.
pub const FRAGMENT_TEMPLATES: &[(&str, &str)] = &[
    (SEARCH_HOLDER, SEARCH_HOLDER_TEMPLATE),
    (SEARCH_TOGGLE, SEARCH_TOGGLE_TEMPLATE),
];

/// Placeholder the client-side search component mounts on.
///
/// Template variables:
/// - `schema`: the search field schema as JSON
const SEARCH_HOLDER_TEMPLATE: &str = r#"<div class="search-holder grid-field__search-holder grid-field__search-holder--hidden" data-schema="{{ schema }}"></div>"#;

/// Toolbar button opening the search panel.
///
/// Template variables:
/// - `label`: button label, also used as its title
const SEARCH_TOGGLE_TEMPLATE: &str = r#"<button type="button" name="showFilter" aria-label="{{ label }}" title="{{ label }}" class="btn btn-secondary font-icon-search btn--no-text btn--icon-large grid-field__filter-open"><span class="visually-hidden">{{ label }}</span></button>"#;

/// An environment with every fragment template registered.
pub fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    for &(name, source) in FRAGMENT_TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(env)
}
