use std::collections::BTreeMap;

use super::registry::Syntax;
use crate::core::{Element, ExtractionError, SourceField};

/// Source field values read from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    values: BTreeMap<SourceField, String>,
    errors: Vec<ExtractionError>,
}

impl ExtractedFields {
    pub fn get(&self, field: SourceField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<SourceField, String> {
        &self.values
    }

    /// Getter failures encountered while extracting. Never fatal.
    pub fn errors(&self) -> &[ExtractionError] {
        &self.errors
    }

    pub fn into_parts(self) -> (BTreeMap<SourceField, String>, Vec<ExtractionError>) {
        (self.values, self.errors)
    }
}

/// Read every source field the syntax declares getters for.
///
/// Getters of one field are tried in declaration order; the first one that
/// yields a value wins. A failing getter is recorded and the next one tried.
pub fn extract_fields(syntax: &Syntax, root: &Element) -> ExtractedFields {
    let mut out = ExtractedFields::default();

    for field in SourceField::ALL {
        for getter in syntax.getters(field) {
            match getter.get(root) {
                Ok(Some(value)) => {
                    out.values.insert(field, value);
                    break;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(
                        syntax = syntax.id(),
                        field = field.id(),
                        getter = %getter.description(),
                        error = %e,
                        "field getter failed"
                    );
                    out.errors
                        .push(ExtractionError::new(field, getter.description(), e.to_string()));
                }
            }
        }
    }

    out
}
