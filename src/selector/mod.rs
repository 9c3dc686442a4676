//! Selector trees: rule-based deduction of determined fields and flags.
//!
//! A [`SelectorTree`] level holds one [`Select`] per source field. A `Select`
//! maps literal field values to an [`If`] node, which is either a leaf
//! ([`Outcome`]: determined values plus flags) or a branch (a nested level).
//! Construction enforces the structural invariants, so a tree that exists is
//! a valid tree.
//!
//! # Example
//!
//! ```
//! use docdet::core::{DeterminedField, SourceField};
//! use docdet::selector::{If, Outcome, Select, SelectorTree};
//!
//! let tree = SelectorTree::new()
//!     .add(
//!         Select::new(SourceField::CustomizationId)
//!             .add(
//!                 "urn:cen.eu:en16931:2017",
//!                 If::Leaf(Outcome::new().set(DeterminedField::ProfileName, "EN 16931")?),
//!             )?,
//!     )?;
//!
//! let out = tree.evaluate(|f| match f {
//!     SourceField::CustomizationId => Some("urn:cen.eu:en16931:2017"),
//!     _ => None,
//! });
//! assert_eq!(out.get(DeterminedField::ProfileName), Some("EN 16931"));
//! # Ok::<(), docdet::core::ConfigError>(())
//! ```

mod evaluate;
mod merge;
mod provider;
mod tree;

pub use evaluate::DeterminedValues;
pub use merge::merge_trees;
pub use provider::{ValueProvider, ValueProviderList, parse_last_modified};
pub use tree::{If, Outcome, Select, SelectorTree};
