use std::collections::BTreeMap;

use super::tree::{If, Outcome, SelectorTree};
use crate::core::{DeterminedField, FlagSet, SourceField};

/// The result of evaluating a selector tree: at most one leaf's content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeterminedValues {
    fields: BTreeMap<DeterminedField, String>,
    flags: FlagSet,
}

impl DeterminedValues {
    pub fn get(&self, field: DeterminedField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<DeterminedField, String> {
        &self.fields
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// Nothing was deduced. Not an error.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.flags.is_empty()
    }

    pub fn into_parts(self) -> (BTreeMap<DeterminedField, String>, FlagSet) {
        (self.fields, self.flags)
    }

    fn apply(&mut self, outcome: &Outcome) {
        for (field, value) in outcome.values() {
            self.fields.insert(*field, value.clone());
        }
        self.flags.extend(outcome.flags().iter());
    }
}

impl SelectorTree {
    /// Deduce determined fields and flags from source field values.
    ///
    /// Depth-first, first match wins: selectors are consulted in declaration
    /// order, and the first leaf reached ends the whole evaluation. A branch
    /// whose nested selectors yield nothing lets evaluation continue with the
    /// next selector of the enclosing level.
    pub fn evaluate<'a, F>(&self, source: F) -> DeterminedValues
    where
        F: Fn(SourceField) -> Option<&'a str>,
    {
        let mut out = DeterminedValues::default();
        evaluate_level(self, &source, &mut out);
        out
    }
}

fn evaluate_level<'a, F>(level: &SelectorTree, source: &F, out: &mut DeterminedValues) -> bool
where
    F: Fn(SourceField) -> Option<&'a str>,
{
    for select in level.iter() {
        let Some(value) = source(select.selector()) else {
            continue;
        };
        let Some(node) = select.get(value) else {
            continue;
        };
        match node {
            If::Leaf(outcome) => {
                tracing::trace!(selector = %select.selector(), value, "selector leaf matched");
                out.apply(outcome);
                return true;
            }
            If::Branch(nested) => {
                if evaluate_level(nested, source, out) {
                    return true;
                }
            }
        }
    }
    false
}
