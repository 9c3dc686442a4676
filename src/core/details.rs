use serde::{Deserialize, Serialize};

use super::identifier::Identifier;

/// Insertion-ordered set of flag strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet(#[serde(deserialize_with = "deserialize_dedup")] Vec<String>);

fn deserialize_dedup<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(raw.into_iter().collect::<FlagSet>().0)
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flag. Returns `false` if it was already present.
    pub fn insert(&mut self, flag: impl Into<String>) -> bool {
        let flag = flag.into();
        if self.contains(&flag) {
            return false;
        }
        self.0.push(flag);
        true
    }

    /// Remove a flag. Returns `true` if it was present.
    pub fn remove(&mut self, flag: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|f| f != flag);
        self.0.len() != before
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.0.iter().any(|f| f == flag)
    }

    pub fn extend<I, S>(&mut self, flags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for flag in flags {
            self.insert(flag);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FlagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a FlagSet {
    type Item = &'a str;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().map(String::as_str as fn(&'a String) -> &'a str)
    }
}

/// The normalized result of determining an XML business document.
///
/// Immutable once built; construct through [`DocumentDetailsBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentDetails {
    pub(crate) syntax_id: Option<String>,
    pub(crate) syntax_version: Option<String>,
    pub(crate) sender_id: Option<Identifier>,
    pub(crate) receiver_id: Option<Identifier>,
    pub(crate) document_type_id: Option<Identifier>,
    pub(crate) process_id: Option<Identifier>,
    pub(crate) customization_id: Option<String>,
    pub(crate) business_document_id: Option<String>,
    pub(crate) sender_name: Option<String>,
    pub(crate) sender_country_code: Option<String>,
    pub(crate) receiver_name: Option<String>,
    pub(crate) receiver_country_code: Option<String>,
    pub(crate) vesid: Option<String>,
    pub(crate) profile_name: Option<String>,
    pub(crate) flags: FlagSet,
}

impl DocumentDetails {
    pub fn builder() -> DocumentDetailsBuilder {
        DocumentDetailsBuilder::default()
    }

    pub fn syntax_id(&self) -> Option<&str> {
        self.syntax_id.as_deref()
    }

    pub fn syntax_version(&self) -> Option<&str> {
        self.syntax_version.as_deref()
    }

    pub fn sender_id(&self) -> Option<&Identifier> {
        self.sender_id.as_ref()
    }

    pub fn receiver_id(&self) -> Option<&Identifier> {
        self.receiver_id.as_ref()
    }

    pub fn document_type_id(&self) -> Option<&Identifier> {
        self.document_type_id.as_ref()
    }

    pub fn process_id(&self) -> Option<&Identifier> {
        self.process_id.as_ref()
    }

    pub fn customization_id(&self) -> Option<&str> {
        self.customization_id.as_deref()
    }

    pub fn business_document_id(&self) -> Option<&str> {
        self.business_document_id.as_deref()
    }

    pub fn sender_name(&self) -> Option<&str> {
        self.sender_name.as_deref()
    }

    pub fn sender_country_code(&self) -> Option<&str> {
        self.sender_country_code.as_deref()
    }

    pub fn receiver_name(&self) -> Option<&str> {
        self.receiver_name.as_deref()
    }

    pub fn receiver_country_code(&self) -> Option<&str> {
        self.receiver_country_code.as_deref()
    }

    pub fn vesid(&self) -> Option<&str> {
        self.vesid.as_deref()
    }

    pub fn profile_name(&self) -> Option<&str> {
        self.profile_name.as_deref()
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// Sender, receiver, document type, process and VESID are all known:
    /// enough to route and validate the document.
    pub fn has_all_key_fields(&self) -> bool {
        self.sender_id.is_some()
            && self.receiver_id.is_some()
            && self.document_type_id.is_some()
            && self.process_id.is_some()
            && self.vesid.is_some()
    }

    /// Start a builder pre-filled with this record.
    pub fn to_builder(&self) -> DocumentDetailsBuilder {
        DocumentDetailsBuilder {
            details: self.clone(),
        }
    }
}

/// Builder for [`DocumentDetails`].
///
/// ```
/// use docdet::core::*;
///
/// let details = DocumentDetails::builder()
///     .syntax_id("ubl2-invoice")
///     .sender_id(Identifier::new("iso6523-actorid-upis", "0088:123").unwrap())
///     .flag("self-billing")
///     .build();
/// assert_eq!(details.syntax_id(), Some("ubl2-invoice"));
/// assert!(!details.has_all_key_fields());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentDetailsBuilder {
    details: DocumentDetails,
}

impl DocumentDetailsBuilder {
    pub fn syntax_id(mut self, id: impl Into<String>) -> Self {
        self.details.syntax_id = Some(id.into());
        self
    }

    pub fn syntax_version(mut self, version: impl Into<String>) -> Self {
        self.details.syntax_version = Some(version.into());
        self
    }

    pub fn sender_id(mut self, id: Identifier) -> Self {
        self.details.sender_id = Some(id);
        self
    }

    pub fn receiver_id(mut self, id: Identifier) -> Self {
        self.details.receiver_id = Some(id);
        self
    }

    pub fn document_type_id(mut self, id: Identifier) -> Self {
        self.details.document_type_id = Some(id);
        self
    }

    pub fn process_id(mut self, id: Identifier) -> Self {
        self.details.process_id = Some(id);
        self
    }

    pub fn customization_id(mut self, id: impl Into<String>) -> Self {
        self.details.customization_id = Some(id.into());
        self
    }

    pub fn business_document_id(mut self, id: impl Into<String>) -> Self {
        self.details.business_document_id = Some(id.into());
        self
    }

    pub fn sender_name(mut self, name: impl Into<String>) -> Self {
        self.details.sender_name = Some(name.into());
        self
    }

    pub fn sender_country_code(mut self, code: impl Into<String>) -> Self {
        self.details.sender_country_code = Some(code.into());
        self
    }

    pub fn receiver_name(mut self, name: impl Into<String>) -> Self {
        self.details.receiver_name = Some(name.into());
        self
    }

    pub fn receiver_country_code(mut self, code: impl Into<String>) -> Self {
        self.details.receiver_country_code = Some(code.into());
        self
    }

    pub fn vesid(mut self, vesid: impl Into<String>) -> Self {
        self.details.vesid = Some(vesid.into());
        self
    }

    pub fn profile_name(mut self, name: impl Into<String>) -> Self {
        self.details.profile_name = Some(name.into());
        self
    }

    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.details.flags.insert(flag);
        self
    }

    pub fn flags(mut self, flags: FlagSet) -> Self {
        self.details.flags = flags;
        self
    }

    // Option-taking setters used when assembling from partially known data.

    pub(crate) fn maybe_syntax_id(mut self, v: Option<String>) -> Self {
        self.details.syntax_id = v;
        self
    }

    pub(crate) fn maybe_syntax_version(mut self, v: Option<String>) -> Self {
        self.details.syntax_version = v;
        self
    }

    pub(crate) fn maybe_sender_id(mut self, v: Option<Identifier>) -> Self {
        self.details.sender_id = v;
        self
    }

    pub(crate) fn maybe_receiver_id(mut self, v: Option<Identifier>) -> Self {
        self.details.receiver_id = v;
        self
    }

    pub(crate) fn maybe_document_type_id(mut self, v: Option<Identifier>) -> Self {
        self.details.document_type_id = v;
        self
    }

    pub(crate) fn maybe_process_id(mut self, v: Option<Identifier>) -> Self {
        self.details.process_id = v;
        self
    }

    pub(crate) fn maybe_customization_id(mut self, v: Option<String>) -> Self {
        self.details.customization_id = v;
        self
    }

    pub(crate) fn maybe_business_document_id(mut self, v: Option<String>) -> Self {
        self.details.business_document_id = v;
        self
    }

    pub(crate) fn maybe_sender_name(mut self, v: Option<String>) -> Self {
        self.details.sender_name = v;
        self
    }

    pub(crate) fn maybe_sender_country_code(mut self, v: Option<String>) -> Self {
        self.details.sender_country_code = v;
        self
    }

    pub(crate) fn maybe_receiver_name(mut self, v: Option<String>) -> Self {
        self.details.receiver_name = v;
        self
    }

    pub(crate) fn maybe_receiver_country_code(mut self, v: Option<String>) -> Self {
        self.details.receiver_country_code = v;
        self
    }

    pub(crate) fn maybe_vesid(mut self, v: Option<String>) -> Self {
        self.details.vesid = v;
        self
    }

    pub(crate) fn maybe_profile_name(mut self, v: Option<String>) -> Self {
        self.details.profile_name = v;
        self
    }

    pub fn build(self) -> DocumentDetails {
        self.details
    }
}
