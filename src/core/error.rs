use thiserror::Error;

use super::fields::SourceField;

/// Errors that can occur while loading configuration or encoding results.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DddError {
    /// The syntax list or value-provider list is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// XML parsing or writing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON parsing or writing error.
    #[error("JSON error: {0}")]
    Json(String),

    /// A serialized document details record could not be read back.
    #[error("encoding error: {0}")]
    Encoding(String),
}

/// Fatal configuration problems. The engine refuses to start with any of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("unknown source field '{0}'")]
    UnknownSourceField(String),

    #[error("unknown determined field '{0}'")]
    UnknownDeterminedField(String),

    #[error("duplicate syntax id '{0}'")]
    DuplicateSyntaxId(String),

    #[error("syntax '{syntax_id}' uses root element {{{namespace_uri}}}{local_name} which is already registered by '{existing}'")]
    DuplicateRootElement {
        syntax_id: String,
        existing: String,
        namespace_uri: String,
        local_name: String,
    },

    #[error("syntax '{syntax_id}' must declare at least one getter for {field}")]
    MissingGetter {
        syntax_id: String,
        field: SourceField,
    },

    #[error("invalid getter expression '{expression}': {message}")]
    InvalidGetter { expression: String, message: String },

    #[error("selector {selector} appears more than once on the same level")]
    DuplicateSelector { selector: SourceField },

    #[error("selector {selector} has more than one condition for value '{value}'")]
    DuplicateCondition { selector: SourceField, value: String },

    #[error("determined field '{field}' is set more than once")]
    DuplicateSetter { field: String },

    #[error("selector {selector} condition '{value}' has neither determined values nor nested selectors")]
    EmptyIf { selector: SourceField, value: String },

    #[error("selector {selector} condition '{value}' has both determined values and nested selectors")]
    AmbiguousIf { selector: SourceField, value: String },

    #[error("selector {selector} condition '{value}' sets its own selector field")]
    SelfReferencingSetter { selector: SourceField, value: String },

    #[error("selector {selector} condition '{value}' defines determined values in both merged trees")]
    MergeConflict { selector: SourceField, value: String },

    #[error("selector {selector} condition '{value}' is a leaf in one merged tree and a branch in the other")]
    MergeStructureConflict { selector: SourceField, value: String },

    #[error("more than one value provider for syntax '{0}'")]
    DuplicateValueProvider(String),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("malformed configuration: {0}")]
    Malformed(String),

    #[error("value provider for syntax '{syntax_id}': {source}")]
    ValueProvider {
        syntax_id: String,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Attach the syntax id a selector tree error occurred in.
    pub fn in_syntax(self, syntax_id: impl Into<String>) -> Self {
        Self::ValueProvider {
            syntax_id: syntax_id.into(),
            source: Box::new(self),
        }
    }
}

/// A scheme/value pair that cannot form an [`Identifier`](super::Identifier).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IdentifierError {
    #[error("identifier scheme is empty")]
    EmptyScheme,

    #[error("identifier value for scheme '{scheme}' is empty")]
    EmptyValue { scheme: String },

    #[error("identifier scheme '{0}' contains '::' or ends with ':'")]
    InvalidScheme(String),
}

/// A getter failed against a particular document. Collected per call, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionError {
    /// The source field the getter was declared for.
    pub field: SourceField,
    /// Description of the failing getter (e.g. its path expression).
    pub getter: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.field, self.getter, self.message)
    }
}

impl ExtractionError {
    pub fn new(field: SourceField, getter: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            getter: getter.into(),
            message: message.into(),
        }
    }
}
