use std::fmt::{Display, Formatter};

/// A handle to a node slot in a [`NodeStore`](crate::node_ref::NodeStore).
///
/// Handles do not own the node they point to. They stay valid until the
/// node is deleted from its store, after which the slot may be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A reference to a child node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    /// A node held by the store.
    Inner(NodeId),
    /// No node.
    Empty,
}

impl Default for NodeRef {
    fn default() -> Self {
        NodeRef::Empty
    }
}

impl NodeRef {
    /// Returns the handle of the referenced node, if any.
    pub fn id(self) -> Option<NodeId> {
        match self {
            NodeRef::Inner(id) => Some(id),
            NodeRef::Empty => None,
        }
    }

    /// Returns true if no node is referenced.
    pub fn is_empty(self) -> bool {
        matches!(self, NodeRef::Empty)
    }

    /// Returns true if this references exactly the node `id`.
    pub fn is(self, id: NodeId) -> bool {
        self == NodeRef::Inner(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::node_ref::{NodeId, NodeRef};
    use coverage_helper::test;

    #[test]
    fn test_default() {
        match NodeRef::default() {
            NodeRef::Inner(_) => panic!(),
            NodeRef::Empty => {}
        }
    }

    #[test]
    fn test_id() {
        let id = NodeId::from_index(3);
        assert_eq!(NodeRef::Inner(id).id(), Some(id));
        assert_eq!(NodeRef::Empty.id(), None);
        assert!(NodeRef::Inner(id).is(id));
        assert!(!NodeRef::Inner(id).is(NodeId::from_index(4)));
        assert!(!NodeRef::Empty.is(id));
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeId::from_index(0).to_string(), "#0");
    }
}
