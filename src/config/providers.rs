use crate::core::{ConfigError, DddError, DeterminedField, Element, SourceField};
use crate::selector::{
    If, Outcome, Select, SelectorTree, ValueProvider, ValueProviderList, parse_last_modified,
};
use crate::xml::parse_document;

use super::required_attribute;

/// Load a `<ValueProviderList>` document.
pub fn parse_value_provider_list(xml: &str) -> Result<ValueProviderList, DddError> {
    let root = parse_document(xml)?;
    Ok(load_value_provider_list(&root)?)
}

/// Build a value-provider list from an already parsed `<ValueProviderList>`
/// element. Tree errors are reported with the syntax id they occurred in.
pub fn load_value_provider_list(root: &Element) -> Result<ValueProviderList, ConfigError> {
    if root.local_name() != "ValueProviderList" {
        return Err(ConfigError::Malformed(format!(
            "expected <ValueProviderList>, found <{}>",
            root.local_name()
        )));
    }
    let mut list = ValueProviderList::new();
    if let Some(date) = root.attribute("", "lastModified") {
        list = list.with_last_modified(parse_last_modified(date)?);
    }
    for el in root.children_by_local_name("ValueProvider") {
        let syntax_id = required_attribute(el, "syntaxID")?;
        let tree = load_tree(el).map_err(|e| e.in_syntax(syntax_id))?;
        list.insert(ValueProvider::new(syntax_id, tree))?;
    }
    tracing::debug!(providers = list.len(), "value provider list loaded");
    Ok(list)
}

fn load_tree(parent: &Element) -> Result<SelectorTree, ConfigError> {
    let mut tree = SelectorTree::new();
    for el in parent.children_by_local_name("Select") {
        tree.insert(load_select(el)?)?;
    }
    Ok(tree)
}

fn load_select(el: &Element) -> Result<Select, ConfigError> {
    let id = required_attribute(el, "id")?;
    let selector =
        SourceField::from_id(id).ok_or_else(|| ConfigError::UnknownSourceField(id.to_string()))?;
    let mut select = Select::new(selector);
    for cond in el.children_by_local_name("If") {
        let value = required_attribute(cond, "value")?;
        let node = load_if(selector, value, cond)?;
        select.insert(value, node)?;
    }
    Ok(select)
}

fn load_if(selector: SourceField, value: &str, el: &Element) -> Result<If, ConfigError> {
    let has_outcome = el
        .children()
        .iter()
        .any(|c| matches!(c.local_name(), "Set" | "Flag"));
    let has_selects = el.child_by_local_name("Select").is_some();

    match (has_outcome, has_selects) {
        (true, true) => Err(ConfigError::AmbiguousIf {
            selector,
            value: value.to_string(),
        }),
        (false, false) => Err(ConfigError::EmptyIf {
            selector,
            value: value.to_string(),
        }),
        (false, true) => Ok(If::Branch(load_tree(el)?)),
        (true, false) => {
            let mut outcome = Outcome::new();
            for child in el.children() {
                match child.local_name() {
                    "Set" => {
                        let id = required_attribute(child, "id")?;
                        let field = DeterminedField::from_id(id)
                            .ok_or_else(|| ConfigError::UnknownDeterminedField(id.to_string()))?;
                        outcome = outcome.set(field, required_attribute(child, "value")?)?;
                    }
                    "Flag" => {
                        let flag = child.text().trim();
                        if flag.is_empty() {
                            return Err(ConfigError::Malformed(format!(
                                "empty Flag in selector {selector} condition '{value}'"
                            )));
                        }
                        outcome = outcome.flag(flag);
                    }
                    _ => {}
                }
            }
            Ok(If::Leaf(outcome))
        }
    }
}
