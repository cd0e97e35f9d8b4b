//! An ordered key/value container backed by an unbalanced binary search
//! tree, navigated with a cursor that keeps no parent links.
//!
//! Alongside lookup, insertion and deletion the [`Tree`] offers set union
//! (rebuilt as a complete tree), shape-independent equality, ordered walks,
//! merkle digests over its exact shape and Graphviz rendering.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(coverage_nightly, feature(no_coverage))]

pub mod error;
pub mod hash;
pub mod node_ref;
pub mod tree;
pub mod visualization;

pub use crate::error::TreeError;
pub use crate::tree::bst::{Cursor, LevelSlot, Tree};
pub use crate::tree::config::TreeConfig;
