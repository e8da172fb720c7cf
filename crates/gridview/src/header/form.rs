//! The search form a filter header offers.

use serde::Serialize;

use crate::search::FormFieldKind;

/// Options of the boolean dropdown, as `(value, label)`.
pub const BOOLEAN_OPTIONS: [(&str, &str); 3] = [("", "Any"), ("1", "Yes"), ("0", "No")];

/// One input of the search form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    /// Input name, `Search__<Field>`.
    pub name: String,
    pub title: String,
    pub kind: FormFieldKind,
    pub value: String,
    pub extra_classes: Vec<String>,
}

impl FormField {
    pub fn new(name: impl Into<String>, title: impl Into<String>, kind: FormFieldKind) -> Self {
        FormField {
            name: name.into(),
            title: title.into(),
            kind,
            value: String::new(),
            extra_classes: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn add_extra_class(&mut self, class: &str) {
        if !self.has_extra_class(class) {
            self.extra_classes.push(class.to_string());
        }
    }

    pub fn has_extra_class(&self, class: &str) -> bool {
        self.extra_classes.iter().any(|existing| existing == class)
    }

    /// `(value, label)` choices for dropdowns, empty otherwise.
    pub fn options(&self) -> Vec<(&'static str, &'static str)> {
        match self.kind {
            FormFieldKind::Dropdown => BOOLEAN_OPTIONS.to_vec(),
            _ => Vec::new(),
        }
    }
}

/// A search form: a name, styling classes and its fields in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchForm {
    pub name: String,
    pub extra_classes: Vec<String>,
    pub fields: Vec<FormField>,
}

impl SearchForm {
    pub fn new(name: impl Into<String>) -> Self {
        SearchForm {
            name: name.into(),
            extra_classes: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn add_extra_class(&mut self, class: &str) {
        if !self.has_extra_class(class) {
            self.extra_classes.push(class.to_string());
        }
    }

    pub fn has_extra_class(&self, class: &str) -> bool {
        self.extra_classes.iter().any(|existing| existing == class)
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_classes_are_unique() {
        let mut field = FormField::new("Search__Name", "Name", FormFieldKind::Text);
        field.add_extra_class("stacked");
        field.add_extra_class("stacked");
        assert_eq!(field.extra_classes, vec!["stacked"]);
        assert!(!field.has_extra_class("no-change-track"));
    }

    #[test]
    fn dropdowns_offer_any_yes_no() {
        let field = FormField::new("Search__Active", "Active", FormFieldKind::Dropdown);
        let labels: Vec<&str> = field.options().into_iter().map(|(_, label)| label).collect();
        assert_eq!(labels, vec!["Any", "Yes", "No"]);
        assert!(FormField::new("Search__Name", "Name", FormFieldKind::Text).options().is_empty());
    }
}
