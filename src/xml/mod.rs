//! XML support: parsing documents into the [`Element`](crate::core::Element)
//! tree, writing element trees, and the element encoding of
//! [`DocumentDetails`](crate::core::DocumentDetails).

mod details;
mod reader;
mod writer;

pub use details::{DOCUMENT_DETAILS_NS, DOCUMENT_DETAILS_ROOT};
pub use reader::parse_document;
pub use writer::write_document;
