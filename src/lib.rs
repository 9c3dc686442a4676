//! # docdet
//!
//! Document details determination for XML business documents: detects the
//! syntax of a document from its root element, extracts sender, receiver and
//! profile information, and deduces the validation ruleset (VESID) and
//! profile name through configurable selector trees.
//!
//! The built-in configuration covers UBL 2.x invoices and credit notes and
//! UN/CEFACT CII D16B invoices following Peppol BIS Billing 3, XRechnung 3
//! and [EN 16931](https://standards.cencenelec.eu/dyn/www/f?p=205:110:0::::FSP_PROJECT:60602).
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use docdet::determine::{DeterminationConfig, Determinator};
//!
//! let xml = r#"<Invoice xmlns="urn:oasis:names:specification:ubl:schema:xsd:Invoice-2"
//!     xmlns:cbc="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2">
//!   <cbc:CustomizationID>urn:cen.eu:en16931:2017#compliant#urn:fdc:peppol.eu:2017:poacc:billing:3.0</cbc:CustomizationID>
//!   <cbc:ProfileID>urn:fdc:peppol.eu:2017:poacc:billing:01:1.0</cbc:ProfileID>
//!   <cbc:ID>RE-2024-001</cbc:ID>
//! </Invoice>"#;
//!
//! let determinator = Determinator::new(Arc::new(DeterminationConfig::builtin().unwrap()));
//! let details = determinator.determine_xml(xml).unwrap().unwrap();
//!
//! assert_eq!(details.syntax_id(), Some("ubl2-invoice"));
//! assert_eq!(details.vesid(), Some("eu.peppol.bis3:invoice:latest-active"));
//! assert_eq!(details.business_document_id(), Some("RE-2024-001"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `xml` (default) | XML parsing, configuration loading, built-in configuration, XML encoding of results |
//! | `json` (default) | JSON encoding of results |
//! | `all` | Everything |

pub mod core;
pub mod determine;
pub mod selector;
pub mod syntax;

#[cfg(feature = "xml")]
pub mod config;

#[cfg(feature = "xml")]
pub mod xml;

#[cfg(feature = "json")]
pub mod json;

// Re-export core types at crate root for convenience
pub use crate::core::*;
