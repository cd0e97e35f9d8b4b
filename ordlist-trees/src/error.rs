//! Errors raised by tree operations.

use thiserror::Error;

use crate::node_ref::NodeId;

/// The error type for [`Tree`](crate::Tree) and [`NodeStore`](crate::node_ref::NodeStore)
/// operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// An insert was attempted for a key that is already present.
    #[error("cannot insert a duplicate key")]
    DuplicateKey,

    /// A retrieve was attempted while the cursor was not positioned on an item.
    #[error("cannot retrieve from this location")]
    InvalidRetrieve,

    /// A node or buffer could not be allocated, or the node limit was reached.
    #[error("cannot allocate node")]
    OutOfMemory,

    /// A handle did not refer to a live node.
    #[error("dangling node handle {0}")]
    DanglingNode(NodeId),
}
