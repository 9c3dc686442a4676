//! Flat JSON encoding of [`DocumentDetails`].
//!
//! Identifiers are written in their `scheme::value` URI form, absent fields
//! are omitted, and `flags` is omitted when empty.
//!
//! ```
//! use docdet::core::{DocumentDetails, Identifier};
//!
//! let details = DocumentDetails::builder()
//!     .syntax_id("ubl2-invoice")
//!     .sender_id(Identifier::new("iso6523-actorid-upis", "0088:123").unwrap())
//!     .build();
//! let json = details.to_json_string().unwrap();
//! assert_eq!(
//!     json,
//!     r#"{"syntaxID":"ubl2-invoice","sender":"iso6523-actorid-upis::0088:123"}"#
//! );
//! assert_eq!(DocumentDetails::from_json_str(&json).unwrap(), details);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{DddError, DocumentDetails, FlagSet, Identifier};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Record {
    #[serde(rename = "syntaxID", skip_serializing_if = "Option::is_none")]
    syntax_id: Option<String>,
    #[serde(rename = "syntaxVersion", skip_serializing_if = "Option::is_none")]
    syntax_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    receiver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    doctype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    process: Option<String>,
    #[serde(rename = "customizationID", skip_serializing_if = "Option::is_none")]
    customization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bdid: Option<String>,
    #[serde(rename = "senderName", skip_serializing_if = "Option::is_none")]
    sender_name: Option<String>,
    #[serde(rename = "senderCountryCode", skip_serializing_if = "Option::is_none")]
    sender_country_code: Option<String>,
    #[serde(rename = "receiverName", skip_serializing_if = "Option::is_none")]
    receiver_name: Option<String>,
    #[serde(rename = "receiverCountryCode", skip_serializing_if = "Option::is_none")]
    receiver_country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vesid: Option<String>,
    #[serde(rename = "profileName", skip_serializing_if = "Option::is_none")]
    profile_name: Option<String>,
    #[serde(default, skip_serializing_if = "FlagSet::is_empty")]
    flags: FlagSet,
}

impl From<&DocumentDetails> for Record {
    fn from(d: &DocumentDetails) -> Self {
        let uri = |id: Option<&Identifier>| id.map(Identifier::to_uri);
        let owned = |s: Option<&str>| s.map(str::to_string);
        Record {
            syntax_id: owned(d.syntax_id()),
            syntax_version: owned(d.syntax_version()),
            sender: uri(d.sender_id()),
            receiver: uri(d.receiver_id()),
            doctype: uri(d.document_type_id()),
            process: uri(d.process_id()),
            customization_id: owned(d.customization_id()),
            bdid: owned(d.business_document_id()),
            sender_name: owned(d.sender_name()),
            sender_country_code: owned(d.sender_country_code()),
            receiver_name: owned(d.receiver_name()),
            receiver_country_code: owned(d.receiver_country_code()),
            vesid: owned(d.vesid()),
            profile_name: owned(d.profile_name()),
            flags: d.flags().clone(),
        }
    }
}

impl TryFrom<Record> for DocumentDetails {
    type Error = DddError;

    fn try_from(r: Record) -> Result<Self, DddError> {
        Ok(DocumentDetails::builder()
            .maybe_syntax_id(r.syntax_id)
            .maybe_syntax_version(r.syntax_version)
            .maybe_sender_id(identifier("sender", r.sender)?)
            .maybe_receiver_id(identifier("receiver", r.receiver)?)
            .maybe_document_type_id(identifier("doctype", r.doctype)?)
            .maybe_process_id(identifier("process", r.process)?)
            .maybe_customization_id(r.customization_id)
            .maybe_business_document_id(r.bdid)
            .maybe_sender_name(r.sender_name)
            .maybe_sender_country_code(r.sender_country_code)
            .maybe_receiver_name(r.receiver_name)
            .maybe_receiver_country_code(r.receiver_country_code)
            .maybe_vesid(r.vesid)
            .maybe_profile_name(r.profile_name)
            .flags(r.flags)
            .build())
    }
}

fn identifier(key: &str, value: Option<String>) -> Result<Option<Identifier>, DddError> {
    value
        .map(|v| {
            Identifier::from_uri(&v).ok_or_else(|| {
                DddError::Encoding(format!("'{v}' in {key} is not a scheme::value identifier"))
            })
        })
        .transpose()
}

fn json_err(e: serde_json::Error) -> DddError {
    DddError::Json(e.to_string())
}

impl DocumentDetails {
    pub fn to_json(&self) -> Result<serde_json::Value, DddError> {
        serde_json::to_value(Record::from(self)).map_err(json_err)
    }

    pub fn to_json_string(&self) -> Result<String, DddError> {
        serde_json::to_string(&Record::from(self)).map_err(json_err)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, DddError> {
        serde_json::to_string_pretty(&Record::from(self)).map_err(json_err)
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self, DddError> {
        let record = Record::deserialize(value).map_err(json_err)?;
        DocumentDetails::try_from(record)
    }

    pub fn from_json_str(json: &str) -> Result<Self, DddError> {
        let record: Record = serde_json::from_str(json).map_err(json_err)?;
        DocumentDetails::try_from(record)
    }
}
