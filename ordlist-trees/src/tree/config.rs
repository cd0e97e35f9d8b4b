//! Settings for the node store of a tree.

/// Settings applied to the node store of a [`Tree`](crate::Tree).
///
/// Copies and unions inherit the configuration of their left operand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeConfig {
    /// The maximum number of nodes the tree may hold. Inserting past the
    /// limit fails with [`TreeError::OutOfMemory`](crate::TreeError::OutOfMemory).
    pub max_nodes: Option<usize>,
}

impl TreeConfig {
    /// Creates an unbounded configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the tree at `max_nodes` nodes.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }
}
