use std::fmt;

use super::error::IdentifierError;

/// Default Peppol participant identifier scheme.
pub const PARTICIPANT_SCHEME_ISO6523: &str = "iso6523-actorid-upis";

/// Default Peppol document type identifier scheme.
pub const DOCTYPE_SCHEME_BUSDOX_QNS: &str = "busdox-docid-qns";

/// Default Peppol process identifier scheme.
pub const PROCESS_SCHEME_CENBII: &str = "cenbii-procid-ubl";

const URI_SEPARATOR: &str = "::";

/// A scheme-qualified identifier (participant, document type or process).
///
/// Both parts are non-empty and the scheme never contains `::` or ends in
/// `:`, so [`to_uri`](Self::to_uri) and [`from_uri`](Self::from_uri) always
/// agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    scheme: String,
    value: String,
}

impl Identifier {
    pub fn new(
        scheme: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, IdentifierError> {
        let scheme = scheme.into();
        let value = value.into();
        if scheme.is_empty() {
            return Err(IdentifierError::EmptyScheme);
        }
        if value.is_empty() {
            return Err(IdentifierError::EmptyValue { scheme });
        }
        if scheme.contains(URI_SEPARATOR) || scheme.ends_with(':') {
            return Err(IdentifierError::InvalidScheme(scheme));
        }
        Ok(Self { scheme, value })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The URI-encoded form `scheme::value`.
    pub fn to_uri(&self) -> String {
        format!("{}{URI_SEPARATOR}{}", self.scheme, self.value)
    }

    /// Parse `scheme::value`. Only the first separator splits, so document type
    /// values containing `::` survive unchanged.
    pub fn from_uri(uri: &str) -> Option<Self> {
        let (scheme, value) = uri.split_once(URI_SEPARATOR)?;
        Self::new(scheme, value).ok()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{URI_SEPARATOR}{}", self.scheme, self.value)
    }
}

/// Builds identifiers from the raw strings found in (or deduced for) a document.
///
/// Returning `None` means the value cannot form a valid identifier; the
/// corresponding document details field stays absent.
pub trait IdentifierFactory: Send + Sync {
    /// `scheme` is the identifier scheme read from the document (e.g. an EAS
    /// code like `0088`), not the identifier scheme of the result.
    fn participant_id(&self, scheme: Option<&str>, value: &str) -> Option<Identifier>;

    fn document_type_id(&self, value: &str) -> Option<Identifier>;

    fn process_id(&self, value: &str) -> Option<Identifier>;
}

/// Identifier schemes applied by [`SchemeIdentifierFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierSchemes {
    pub participant: String,
    pub document_type: String,
    pub process: String,
}

impl Default for IdentifierSchemes {
    fn default() -> Self {
        Self {
            participant: PARTICIPANT_SCHEME_ISO6523.to_string(),
            document_type: DOCTYPE_SCHEME_BUSDOX_QNS.to_string(),
            process: PROCESS_SCHEME_CENBII.to_string(),
        }
    }
}

/// Identifier factory qualifying every value with a fixed scheme.
///
/// Participant values get the document's scheme prepended (`0088:123456`),
/// which is how Peppol encodes ISO 6523 participant identifiers.
#[derive(Debug, Clone, Default)]
pub struct SchemeIdentifierFactory {
    schemes: IdentifierSchemes,
}

impl SchemeIdentifierFactory {
    pub fn new(schemes: IdentifierSchemes) -> Self {
        Self { schemes }
    }

    pub fn schemes(&self) -> &IdentifierSchemes {
        &self.schemes
    }
}

impl IdentifierFactory for SchemeIdentifierFactory {
    fn participant_id(&self, scheme: Option<&str>, value: &str) -> Option<Identifier> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let full = match scheme.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => format!("{s}:{value}"),
            None => value.to_string(),
        };
        Identifier::new(&self.schemes.participant, full).ok()
    }

    fn document_type_id(&self, value: &str) -> Option<Identifier> {
        if value.trim().is_empty() {
            return None;
        }
        Identifier::new(&self.schemes.document_type, value).ok()
    }

    fn process_id(&self, value: &str) -> Option<Identifier> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Identifier::new(&self.schemes.process, value).ok()
    }
}

/// Compose the busdox-style document type identifier value
/// `{namespace}::{local name}##{customization id}::{version}`.
pub fn document_type_value(
    namespace_uri: &str,
    local_name: &str,
    customization_id: &str,
    version: &str,
) -> String {
    format!("{namespace_uri}::{local_name}##{customization_id}::{version}")
}
