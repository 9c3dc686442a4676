use std::fmt;

/// A field read directly from a document via the getters of its syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceField {
    CustomizationId,
    ProcessId,
    BusinessDocumentId,
    SenderIdScheme,
    SenderIdValue,
    SenderName,
    SenderCountryCode,
    ReceiverIdScheme,
    ReceiverIdValue,
    ReceiverName,
    ReceiverCountryCode,
}

impl SourceField {
    /// All source fields in declaration order.
    pub const ALL: [SourceField; 11] = [
        Self::CustomizationId,
        Self::ProcessId,
        Self::BusinessDocumentId,
        Self::SenderIdScheme,
        Self::SenderIdValue,
        Self::SenderName,
        Self::SenderCountryCode,
        Self::ReceiverIdScheme,
        Self::ReceiverIdValue,
        Self::ReceiverName,
        Self::ReceiverCountryCode,
    ];

    /// The identifier used in configuration files.
    pub fn id(&self) -> &'static str {
        match self {
            Self::CustomizationId => "CustomizationID",
            Self::ProcessId => "ProcessID",
            Self::BusinessDocumentId => "BusinessDocumentID",
            Self::SenderIdScheme => "SenderIDScheme",
            Self::SenderIdValue => "SenderIDValue",
            Self::SenderName => "SenderName",
            Self::SenderCountryCode => "SenderCountryCode",
            Self::ReceiverIdScheme => "ReceiverIDScheme",
            Self::ReceiverIdValue => "ReceiverIDValue",
            Self::ReceiverName => "ReceiverName",
            Self::ReceiverCountryCode => "ReceiverCountryCode",
        }
    }

    /// Look up a source field by its configuration identifier (case-sensitive).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }

    /// Whether every syntax definition must declare a getter for this field.
    pub fn is_syntax_required(&self) -> bool {
        matches!(self, Self::CustomizationId)
    }
}

impl fmt::Display for SourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A field deduced by a selector tree rather than read from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeterminedField {
    ProcessId,
    SyntaxVersion,
    Vesid,
    ProfileName,
}

impl DeterminedField {
    pub const ALL: [DeterminedField; 4] = [
        Self::ProcessId,
        Self::SyntaxVersion,
        Self::Vesid,
        Self::ProfileName,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::ProcessId => "ProcessID",
            Self::SyntaxVersion => "SyntaxVersion",
            Self::Vesid => "VESID",
            Self::ProfileName => "ProfileName",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }

    /// The source field this determined field overrides, if any.
    pub fn source_counterpart(&self) -> Option<SourceField> {
        match self {
            Self::ProcessId => Some(SourceField::ProcessId),
            _ => None,
        }
    }

    /// Whether setting this field would also set `source`, making a selector
    /// on `source` reference itself.
    pub fn sets_source(&self, source: SourceField) -> bool {
        self.source_counterpart() == Some(source) || self.id() == source.id()
    }
}

impl fmt::Display for DeterminedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
