//! Core types: fields, identifiers, the document element tree, the
//! resulting document details, and errors.

mod details;
mod element;
mod error;
mod fields;
mod identifier;

pub use details::*;
pub use element::*;
pub use error::*;
pub use fields::*;
pub use identifier::*;
