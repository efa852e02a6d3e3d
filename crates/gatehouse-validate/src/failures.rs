use std::collections::BTreeMap;

use gatehouse_core::{ValidationError, ValidationErrors};

use crate::request::HttpRequest;

/// Field-level validation failures, ordered by field name
///
/// Keys are the descriptor's Rust field identifiers; conversion to the
/// wire shape renames them through the descriptor's binding table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Failures(BTreeMap<String, String>);

impl Failures {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record a failure for a field; the first message per field wins
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    /// A non-empty set is an error, an empty one passes validation
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Consume into the wire shape: fields renamed through the
    /// descriptor's binding table, message starts upper-cased
    pub fn into_validation_errors<T: HttpRequest>(self) -> ValidationErrors {
        let errors = self
            .0
            .into_iter()
            .map(|(field, message)| ValidationError {
                field: T::source_key(&field).to_owned(),
                message: ucfirst(&message),
            })
            .collect();

        ValidationErrors { errors }
    }
}

impl From<validator::ValidationErrors> for Failures {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut failures = Self::new();

        for (field, errors) in errors.field_errors() {
            if let Some(error) = errors.first() {
                let message = error.message.as_ref().map_or_else(
                    || format!("failed {} validation", error.code),
                    ToString::to_string,
                );
                failures.add(field.to_string(), message);
            }
        }

        failures
    }
}

/// Upper-case the first letter of a message
fn ucfirst(message: &str) -> String {
    let mut chars = message.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
