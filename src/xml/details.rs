use super::reader::parse_document;
use super::writer::write_document;
use crate::core::{DddError, DocumentDetails, Element, FlagSet, Identifier};

/// Namespace of the root element written by [`DocumentDetails::to_element`].
pub const DOCUMENT_DETAILS_NS: &str = "urn:docdet:document-details:1.0";
/// Local name of the root element written by [`DocumentDetails::to_element`].
pub const DOCUMENT_DETAILS_ROOT: &str = "DocumentDetails";

const SYNTAX_ID: &str = "SyntaxID";
const SYNTAX_VERSION: &str = "SyntaxVersion";
const SENDER_ID: &str = "SenderID";
const RECEIVER_ID: &str = "ReceiverID";
const DOCTYPE_ID: &str = "DocTypeID";
const PROCESS_ID: &str = "ProcessID";
const CUSTOMIZATION_ID: &str = "CustomizationID";
const BUSINESS_DOCUMENT_ID: &str = "BusinessDocumentID";
const SENDER_NAME: &str = "SenderName";
const SENDER_COUNTRY_CODE: &str = "SenderCountryCode";
const RECEIVER_NAME: &str = "ReceiverName";
const RECEIVER_COUNTRY_CODE: &str = "ReceiverCountryCode";
const VESID: &str = "VESID";
const PROFILE_NAME: &str = "ProfileName";
const FLAG: &str = "Flag";

impl DocumentDetails {
    /// Element-tree encoding under the default root element.
    pub fn to_element(&self) -> Element {
        self.to_element_named(DOCUMENT_DETAILS_NS, DOCUMENT_DETAILS_ROOT)
    }

    /// Element-tree encoding under a caller-chosen root element. Children
    /// share the root's namespace.
    pub fn to_element_named(&self, namespace_uri: &str, local_name: &str) -> Element {
        let mut root = Element::new(namespace_uri, local_name);
        let mut text = |name: &str, value: Option<&str>| {
            if let Some(v) = value {
                root.push_child(Element::new(namespace_uri, name).with_text(v));
            }
        };
        let uri = |id: Option<&Identifier>| id.map(Identifier::to_uri);

        text(SYNTAX_ID, self.syntax_id());
        text(SYNTAX_VERSION, self.syntax_version());
        text(SENDER_ID, uri(self.sender_id()).as_deref());
        text(RECEIVER_ID, uri(self.receiver_id()).as_deref());
        text(DOCTYPE_ID, uri(self.document_type_id()).as_deref());
        text(PROCESS_ID, uri(self.process_id()).as_deref());
        text(CUSTOMIZATION_ID, self.customization_id());
        text(BUSINESS_DOCUMENT_ID, self.business_document_id());
        text(SENDER_NAME, self.sender_name());
        text(SENDER_COUNTRY_CODE, self.sender_country_code());
        text(RECEIVER_NAME, self.receiver_name());
        text(RECEIVER_COUNTRY_CODE, self.receiver_country_code());
        text(VESID, self.vesid());
        text(PROFILE_NAME, self.profile_name());
        for flag in self.flags() {
            text(FLAG, Some(flag));
        }
        root
    }

    /// Read the element-tree encoding. The root element's name and all
    /// namespaces are ignored; children are matched by local name.
    pub fn from_element(element: &Element) -> Result<Self, DddError> {
        let mut builder = DocumentDetails::builder();
        let mut seen: Vec<&str> = Vec::new();
        let mut flags = FlagSet::new();

        for child in element.children() {
            let name = child.local_name();
            let value = child.text();
            if name == FLAG {
                flags.insert(value);
                continue;
            }
            if seen.contains(&name) {
                return Err(DddError::Encoding(format!("duplicate element '{name}'")));
            }
            seen.push(name);
            builder = match name {
                SYNTAX_ID => builder.syntax_id(value),
                SYNTAX_VERSION => builder.syntax_version(value),
                SENDER_ID => builder.sender_id(identifier(name, value)?),
                RECEIVER_ID => builder.receiver_id(identifier(name, value)?),
                DOCTYPE_ID => builder.document_type_id(identifier(name, value)?),
                PROCESS_ID => builder.process_id(identifier(name, value)?),
                CUSTOMIZATION_ID => builder.customization_id(value),
                BUSINESS_DOCUMENT_ID => builder.business_document_id(value),
                SENDER_NAME => builder.sender_name(value),
                SENDER_COUNTRY_CODE => builder.sender_country_code(value),
                RECEIVER_NAME => builder.receiver_name(value),
                RECEIVER_COUNTRY_CODE => builder.receiver_country_code(value),
                VESID => builder.vesid(value),
                PROFILE_NAME => builder.profile_name(value),
                other => {
                    return Err(DddError::Encoding(format!("unexpected element '{other}'")));
                }
            };
        }
        Ok(builder.flags(flags).build())
    }

    /// Serialize [`to_element`](Self::to_element) as an XML document.
    pub fn to_xml_string(&self) -> Result<String, DddError> {
        write_document(&self.to_element())
    }

    /// Parse an XML document written by [`to_xml_string`](Self::to_xml_string).
    pub fn from_xml_str(xml: &str) -> Result<Self, DddError> {
        Self::from_element(&parse_document(xml)?)
    }
}

fn identifier(element: &str, value: &str) -> Result<Identifier, DddError> {
    Identifier::from_uri(value).ok_or_else(|| {
        DddError::Encoding(format!("'{value}' in {element} is not a scheme::value identifier"))
    })
}
