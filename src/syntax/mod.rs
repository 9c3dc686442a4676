//! Syntax detection and source field extraction.
//!
//! A [`Syntax`] is identified by the namespace URI and local name of the
//! document root. Each syntax declares, per [`SourceField`](crate::core::SourceField),
//! an ordered list of [`FieldGetter`]s; [`extract_fields`] applies them.

mod extract;
mod getter;
mod registry;

pub use extract::{ExtractedFields, extract_fields};
pub use getter::{FieldGetter, FnGetter, GetterError, NamespaceContext, PathGetter};
pub use registry::{Syntax, SyntaxBuilder, SyntaxRegistry};
