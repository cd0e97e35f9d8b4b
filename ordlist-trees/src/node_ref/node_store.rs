use tracing::trace;

use crate::error::TreeError;
use crate::node_ref::r#impl::NodeId;

/// The trait to be implemented by all node storage mediums.
///
/// A store owns every node of one tree. Nodes refer to each other through
/// [`NodeId`] handles handed out by [`insert`](NodeStore::insert).
pub trait NodeStore<N> {
    /// Moves a new node into storage and returns the handle to it.
    /// Fails with [`TreeError::OutOfMemory`] when no slot can be allocated.
    fn insert(&mut self, node: N) -> Result<NodeId, TreeError>;

    /// Reads a node by its handle.
    fn read(&self, id: NodeId) -> Result<&N, TreeError>;

    /// Reads a node mutably by its handle.
    fn read_mut(&mut self, id: NodeId) -> Result<&mut N, TreeError>;

    /// Removes the node with the provided handle from storage and returns it.
    fn delete(&mut self, id: NodeId) -> Result<N, TreeError>;

    /// Ensures `additional` more nodes can be inserted without reallocating.
    fn reserve(&mut self, additional: usize) -> Result<(), TreeError>;

    /// Returns the number of live nodes.
    fn len(&self) -> usize;

    /// Returns true if no further node can be inserted.
    fn is_full(&self) -> bool;

    /// Drops every node.
    fn clear(&mut self);
}

/// A node store backed by a slot vector with a free list.
#[derive(Debug)]
pub struct MemNodeStore<N> {
    slots: Vec<Option<N>>,
    free: Vec<NodeId>,
    len: usize,
    max_nodes: Option<usize>,
}

impl<N> Default for MemNodeStore<N> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<N> MemNodeStore<N> {
    /// Creates an empty store holding at most `max_nodes` nodes, or unbounded with `None`.
    pub fn new(max_nodes: Option<usize>) -> Self {
        MemNodeStore {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            max_nodes,
        }
    }
}

impl<N> NodeStore<N> for MemNodeStore<N> {
    fn insert(&mut self, node: N) -> Result<NodeId, TreeError> {
        if self.is_full() {
            return Err(TreeError::OutOfMemory);
        }
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = Some(node);
                id
            }
            None => {
                self.slots.try_reserve(1).map_err(|_| TreeError::OutOfMemory)?;
                // the free list must be able to take this slot back without allocating
                self.free
                    .try_reserve(self.slots.len() + 1 - self.free.len())
                    .map_err(|_| TreeError::OutOfMemory)?;
                self.slots.push(Some(node));
                NodeId::from_index(self.slots.len() - 1)
            }
        };
        self.len += 1;
        trace!(node = %id, len = self.len, "allocated node");
        Ok(id)
    }

    fn read(&self, id: NodeId) -> Result<&N, TreeError> {
        match self.slots.get(id.index()) {
            Some(Some(node)) => Ok(node),
            _ => Err(TreeError::DanglingNode(id)),
        }
    }

    fn read_mut(&mut self, id: NodeId) -> Result<&mut N, TreeError> {
        match self.slots.get_mut(id.index()) {
            Some(Some(node)) => Ok(node),
            _ => Err(TreeError::DanglingNode(id)),
        }
    }

    fn delete(&mut self, id: NodeId) -> Result<N, TreeError> {
        let node = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(TreeError::DanglingNode(id))?;
        self.free.push(id);
        self.len -= 1;
        trace!(node = %id, len = self.len, "freed node");
        Ok(node)
    }

    fn reserve(&mut self, additional: usize) -> Result<(), TreeError> {
        if let Some(max) = self.max_nodes {
            if self.len + additional > max {
                return Err(TreeError::OutOfMemory);
            }
        }
        let fresh = additional.saturating_sub(self.free.len());
        self.slots.try_reserve(fresh).map_err(|_| TreeError::OutOfMemory)?;
        self.free
            .try_reserve(self.slots.len() + fresh - self.free.len())
            .map_err(|_| TreeError::OutOfMemory)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn is_full(&self) -> bool {
        match self.max_nodes {
            Some(max) => self.len >= max,
            None => false,
        }
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }
}
