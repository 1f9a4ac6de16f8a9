use std::{collections::BTreeMap, fmt};

use shared::domain::{FormField, FormKind};

use crate::state::FormErrors;

/// Order (delivery) or contacts form as last rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    kind: FormKind,
    values: BTreeMap<FormField, String>,
    valid: bool,
    errors: String,
}

impl FormView {
    pub fn new(kind: FormKind) -> Self {
        let mut view = Self {
            kind,
            values: BTreeMap::new(),
            valid: false,
            errors: String::new(),
        };
        view.reset_form();
        view
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn value(&self, field: FormField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &str {
        &self.errors
    }

    /// Fields that belong to another form are ignored.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        if field.owner() == self.kind {
            self.values.insert(field, value.into());
        }
    }

    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    pub fn set_error_text(&mut self, text: impl Into<String>) {
        self.errors = text.into();
    }

    pub fn apply_errors(&mut self, errors: &FormErrors) {
        self.valid = errors.is_empty();
        self.errors = errors.messages();
    }

    pub fn reset_form(&mut self) {
        self.values = self
            .kind
            .fields()
            .iter()
            .map(|&field| (field, String::new()))
            .collect();
        self.valid = false;
        self.errors.clear();
    }
}

impl fmt::Display for FormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (title, action) = match self.kind {
            FormKind::Order => ("Delivery", "Next"),
            FormKind::Contacts => ("Contacts", "Pay"),
        };
        writeln!(f, "{title}")?;
        for &field in self.kind.fields() {
            writeln!(f, "  {field}: {}", self.value(field))?;
        }
        if !self.errors.is_empty() {
            writeln!(f, "  ! {}", self.errors)?;
        }
        if self.valid {
            write!(f, "  <{action}>")
        } else {
            write!(f, "  ({action})")
        }
    }
}
