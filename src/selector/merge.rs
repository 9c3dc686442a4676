//! Union of independently authored selector trees.

use super::tree::{If, Select, SelectorTree};
use crate::core::{ConfigError, SourceField};

impl SelectorTree {
    /// Merge `other` into a copy of this tree; see [`merge_trees`].
    pub fn merge(&self, other: &SelectorTree) -> Result<SelectorTree, ConfigError> {
        merge_trees(self, other)
    }
}

/// Union two selector trees level by level.
///
/// Selectors and conditions present on one side only are copied. A condition
/// present on both sides recurses when both are branches; two leaves conflict
/// unless identical, and a leaf against a branch is always a conflict.
/// Entries of `primary` keep their position, entries only in `secondary` are
/// appended in their own order.
pub fn merge_trees(
    primary: &SelectorTree,
    secondary: &SelectorTree,
) -> Result<SelectorTree, ConfigError> {
    let mut merged = SelectorTree::new();
    for select in primary.iter() {
        let combined = match secondary.get(select.selector()) {
            Some(other) => merge_selects(select, other)?,
            None => select.clone(),
        };
        merged.insert(combined)?;
    }
    for select in secondary.iter() {
        if primary.get(select.selector()).is_none() {
            merged.insert(select.clone())?;
        }
    }
    Ok(merged)
}

fn merge_selects(primary: &Select, secondary: &Select) -> Result<Select, ConfigError> {
    let selector = primary.selector();
    let mut merged = Select::new(selector);
    for (value, node) in primary.conditions() {
        let combined = match secondary.get(value) {
            Some(other) => merge_nodes(selector, value, node, other)?,
            None => node.clone(),
        };
        merged.insert(value, combined)?;
    }
    for (value, node) in secondary.conditions() {
        if primary.get(value).is_none() {
            merged.insert(value, node.clone())?;
        }
    }
    Ok(merged)
}

fn merge_nodes(selector: SourceField, value: &str, primary: &If, secondary: &If) -> Result<If, ConfigError> {
    match (primary, secondary) {
        (If::Leaf(a), If::Leaf(b)) if a == b => Ok(If::Leaf(a.clone())),
        (If::Leaf(_), If::Leaf(_)) => Err(ConfigError::MergeConflict {
            selector,
            value: value.to_string(),
        }),
        (If::Branch(a), If::Branch(b)) => Ok(If::Branch(merge_trees(a, b)?)),
        _ => Err(ConfigError::MergeStructureConflict {
            selector,
            value: value.to_string(),
        }),
    }
}
