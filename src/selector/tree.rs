use std::collections::BTreeMap;

use crate::core::{ConfigError, DeterminedField, FlagSet, SourceField};

/// Determined values and flags applied when a leaf condition matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    values: BTreeMap<DeterminedField, String>,
    flags: FlagSet,
}

impl Outcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a determined field. Each field may be assigned once.
    pub fn set(mut self, field: DeterminedField, value: impl Into<String>) -> Result<Self, ConfigError> {
        if self.values.contains_key(&field) {
            return Err(ConfigError::DuplicateSetter {
                field: field.id().to_string(),
            });
        }
        self.values.insert(field, value.into());
        Ok(self)
    }

    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn get(&self, field: DeterminedField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<DeterminedField, String> {
        &self.values
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.flags.is_empty()
    }
}

/// The node under one condition of a [`Select`]: either the values to apply
/// or further selectors to consult.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum If {
    Leaf(Outcome),
    Branch(SelectorTree),
}

impl If {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Leaf(o) => o.is_empty(),
            Self::Branch(t) => t.is_empty(),
        }
    }

    /// Whether any leaf at or below this node assigns `source`.
    pub(crate) fn sets_source(&self, source: SourceField) -> bool {
        match self {
            Self::Leaf(o) => o.values.keys().any(|f| f.sets_source(source)),
            Self::Branch(t) => t
                .iter()
                .flat_map(|s| s.conditions().map(|(_, node)| node))
                .any(|node| node.sets_source(source)),
        }
    }
}

/// Conditions on the value of one source field, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    selector: SourceField,
    conditions: Vec<(String, If)>,
}

impl Select {
    pub fn new(selector: SourceField) -> Self {
        Self {
            selector,
            conditions: Vec::new(),
        }
    }

    /// Append a condition; see [`Select::insert`].
    pub fn add(mut self, value: impl Into<String>, node: If) -> Result<Self, ConfigError> {
        self.insert(value, node)?;
        Ok(self)
    }

    /// Append a condition. Rejects duplicate values, empty nodes and nodes
    /// that would assign the selector field itself.
    pub fn insert(&mut self, value: impl Into<String>, node: If) -> Result<(), ConfigError> {
        let value = value.into();
        let selector = self.selector;
        if self.get(&value).is_some() {
            return Err(ConfigError::DuplicateCondition { selector, value });
        }
        if node.is_empty() {
            return Err(ConfigError::EmptyIf { selector, value });
        }
        if node.sets_source(selector) {
            return Err(ConfigError::SelfReferencingSetter { selector, value });
        }
        self.conditions.push((value, node));
        Ok(())
    }

    pub fn selector(&self) -> SourceField {
        self.selector
    }

    /// The node for an exact (case-sensitive) value.
    pub fn get(&self, value: &str) -> Option<&If> {
        self.conditions
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, node)| node)
    }

    pub fn conditions(&self) -> impl Iterator<Item = (&str, &If)> {
        self.conditions.iter().map(|(v, node)| (v.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// One level of selectors, each on a distinct source field, consulted in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorTree {
    selects: Vec<Select>,
}

impl SelectorTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a selector; see [`SelectorTree::insert`].
    pub fn add(mut self, select: Select) -> Result<Self, ConfigError> {
        self.insert(select)?;
        Ok(self)
    }

    /// Append a selector. Each source field may be selected once per level.
    pub fn insert(&mut self, select: Select) -> Result<(), ConfigError> {
        if self.get(select.selector).is_some() {
            return Err(ConfigError::DuplicateSelector {
                selector: select.selector,
            });
        }
        if select.is_empty() {
            return Err(ConfigError::Malformed(format!(
                "selector {} has no conditions",
                select.selector
            )));
        }
        self.selects.push(select);
        Ok(())
    }

    pub fn get(&self, selector: SourceField) -> Option<&Select> {
        self.selects.iter().find(|s| s.selector == selector)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Select> {
        self.selects.iter()
    }

    pub fn len(&self) -> usize {
        self.selects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selects.is_empty()
    }
}
