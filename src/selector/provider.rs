use chrono::{NaiveDate, NaiveDateTime};

use super::evaluate::DeterminedValues;
use super::tree::SelectorTree;
use crate::core::{ConfigError, SourceField};

/// The selector tree configured for one syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueProvider {
    syntax_id: String,
    tree: SelectorTree,
}

impl ValueProvider {
    pub fn new(syntax_id: impl Into<String>, tree: SelectorTree) -> Self {
        Self {
            syntax_id: syntax_id.into(),
            tree,
        }
    }

    pub fn syntax_id(&self) -> &str {
        &self.syntax_id
    }

    pub fn tree(&self) -> &SelectorTree {
        &self.tree
    }

    pub fn evaluate<'a, F>(&self, source: F) -> DeterminedValues
    where
        F: Fn(SourceField) -> Option<&'a str>,
    {
        self.tree.evaluate(source)
    }
}

/// Value providers for all syntaxes, at most one per syntax id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValueProviderList {
    last_modified: Option<NaiveDateTime>,
    providers: Vec<ValueProvider>,
}

impl ValueProviderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata only; never consulted during determination.
    pub fn with_last_modified(mut self, last_modified: NaiveDateTime) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    pub fn add(mut self, provider: ValueProvider) -> Result<Self, ConfigError> {
        self.insert(provider)?;
        Ok(self)
    }

    pub fn insert(&mut self, provider: ValueProvider) -> Result<(), ConfigError> {
        if self.get(&provider.syntax_id).is_some() {
            return Err(ConfigError::DuplicateValueProvider(provider.syntax_id));
        }
        self.providers.push(provider);
        Ok(())
    }

    pub fn last_modified(&self) -> Option<NaiveDateTime> {
        self.last_modified
    }

    pub fn get(&self, syntax_id: &str) -> Option<&ValueProvider> {
        self.providers.iter().find(|p| p.syntax_id == syntax_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValueProvider> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Merge per syntax id with [`merge_trees`](super::merge_trees). The
    /// result is as recent as the more recent input.
    pub fn merge(&self, other: &ValueProviderList) -> Result<ValueProviderList, ConfigError> {
        let mut merged = ValueProviderList {
            last_modified: self.last_modified.max(other.last_modified),
            providers: Vec::new(),
        };
        for provider in &self.providers {
            let tree = match other.get(&provider.syntax_id) {
                Some(o) => provider
                    .tree
                    .merge(&o.tree)
                    .map_err(|e| e.in_syntax(&provider.syntax_id))?,
                None => provider.tree.clone(),
            };
            merged.insert(ValueProvider::new(&provider.syntax_id, tree))?;
        }
        for provider in &other.providers {
            if self.get(&provider.syntax_id).is_none() {
                merged.insert(provider.clone())?;
            }
        }
        Ok(merged)
    }
}

/// Parse a `lastModified` value: `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS[.fff]`.
pub fn parse_last_modified(s: &str) -> Result<NaiveDateTime, ConfigError> {
    let s = s.trim();
    if let Ok(dt) = s.parse::<NaiveDateTime>() {
        return Ok(dt);
    }
    s.parse::<NaiveDate>()
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ConfigError::InvalidDate(s.to_string()))
}
