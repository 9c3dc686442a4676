//! Loading the syntax list and value-provider list from XML.
//!
//! Both documents are matched by local name only, so any (or no) namespace
//! may be used. Built-in configurations for UBL 2.x and CII D16B invoices are
//! available through [`DeterminationConfig::builtin`].

mod providers;
mod syntaxes;

pub use providers::{load_value_provider_list, parse_value_provider_list};
pub use syntaxes::{load_syntax_list, parse_syntax_list};

use crate::core::{ConfigError, DddError, Element};
use crate::determine::DeterminationConfig;

/// The shipped syntax list.
pub const BUILTIN_SYNTAXES: &str = include_str!("../../resources/syntaxes.xml");
/// The shipped value-provider list.
pub const BUILTIN_VALUE_PROVIDERS: &str = include_str!("../../resources/value-providers.xml");

impl DeterminationConfig {
    /// Load a configuration from a syntax list and a value-provider list.
    pub fn from_xml(syntaxes: &str, value_providers: &str) -> Result<Self, DddError> {
        Ok(Self::new(
            parse_syntax_list(syntaxes)?,
            parse_value_provider_list(value_providers)?,
        ))
    }

    /// The shipped configuration: UBL Invoice, UBL CreditNote and CII
    /// syntaxes with Peppol BIS 3, XRechnung 3 and EN 16931 rules.
    pub fn builtin() -> Result<Self, DddError> {
        Self::from_xml(BUILTIN_SYNTAXES, BUILTIN_VALUE_PROVIDERS)
    }
}

fn required_attribute<'a>(el: &'a Element, name: &str) -> Result<&'a str, ConfigError> {
    el.attribute("", name).ok_or_else(|| {
        ConfigError::Malformed(format!(
            "<{}> is missing the '{name}' attribute",
            el.local_name()
        ))
    })
}

fn required_child<'a>(el: &'a Element, name: &str) -> Result<&'a Element, ConfigError> {
    el.child_by_local_name(name).ok_or_else(|| {
        ConfigError::Malformed(format!("<{}> is missing <{name}>", el.local_name()))
    })
}
