use std::borrow::Borrow;
use std::mem;

use tracing::{debug, trace};

use crate::error::TreeError;
use crate::node_ref::{NodeId, NodeRef, NodeStore};
use crate::tree::bst::{Cursor, Node, Side, Tree};

impl<K: Ord, V> Tree<K, V> {
    /// Inserts an item and positions the cursor on it.
    ///
    /// Meant to follow a [`find`](Tree::find) for the same key that returned
    /// false. The attach point is re-derived from the root, so the tree stays
    /// ordered even when that contract is not kept.
    ///
    /// Fails with [`TreeError::DuplicateKey`] if the key is already present and
    /// with [`TreeError::OutOfMemory`] if no node can be allocated.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), TreeError> {
        if let Cursor::On { current, .. } = self.cursor {
            if self.node(current)?.key == key {
                return Err(TreeError::DuplicateKey);
            }
        }
        let hit = self.search(&key)?;
        if hit.current.is_some() {
            return Err(TreeError::DuplicateKey);
        }
        let slot = match hit.parent {
            None => None,
            Some(parent) => Some((parent, Side::toward(&key, &self.node(parent)?.key))),
        };

        let id = self.store.insert(Node::new_node(key, value))?;
        match slot {
            None => self.root = NodeRef::Inner(id),
            Some((parent, side)) => self.node_mut(parent)?.set_child(side, NodeRef::Inner(id)),
        }
        self.cursor = Cursor::On {
            current: id,
            parent: hit.parent,
        };
        Ok(())
    }

    /// Removes `key` and returns its value, or `None` if it is not present.
    ///
    /// Uses the cursor's position when it is on `key` (as after a successful
    /// [`find`](Tree::find)), otherwise looks the key up first. A node with two
    /// children takes over the item of its in-order predecessor, and the
    /// predecessor's node is unlinked instead. Afterwards the cursor is on the
    /// node that held the key if it survived, otherwise on the removed node's
    /// parent; removing a childless or single-child root leaves it unset.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<Option<V>, TreeError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let at_cursor = match self.cursor {
            Cursor::On { current, parent } => {
                let held: &Q = self.node(current)?.key.borrow();
                (held == key).then_some((current, parent))
            }
            _ => None,
        };
        let (current, parent) = match at_cursor {
            Some(found) => found,
            None => {
                let hit = self.search(key)?;
                match hit.current {
                    Some(current) => (current, hit.parent),
                    None => return Ok(None),
                }
            }
        };

        let (left, right) = {
            let node = self.node(current)?;
            (node.left, node.right)
        };
        let removed = match (left.id(), right.id()) {
            (Some(left), Some(_)) => {
                trace!(node = %current, "deleting node with two children");
                let value = self.promote_predecessor(current, left)?;
                self.cursor = Cursor::On {
                    current,
                    parent: self.parent_of(current)?,
                };
                value
            }
            _ => {
                trace!(node = %current, "deleting node with at most one child");
                let child = if left.is_empty() { right } else { left };
                match parent {
                    None => self.root = child,
                    Some(parent) => {
                        let parent_node = self.node_mut(parent)?;
                        if parent_node.left.is(current) {
                            parent_node.left = child;
                        } else {
                            parent_node.right = child;
                        }
                    }
                }
                let node = self.store.delete(current)?;
                self.cursor = match parent {
                    Some(parent) => Cursor::On {
                        current: parent,
                        parent: self.parent_of(parent)?,
                    },
                    None => Cursor::Unset,
                };
                node.value
            }
        };
        Ok(Some(removed))
    }

    // Moves the item of the rightmost node under `left` into `target`,
    // splices that node's left subtree into its place, and returns
    // `target`'s previous value.
    fn promote_predecessor(&mut self, target: NodeId, left: NodeId) -> Result<V, TreeError> {
        let (predecessor, holder) = self.extreme(left, Some(target), Side::Right)?;
        let Node { key, value, left: orphan, .. } = self.store.delete(predecessor)?;
        match holder {
            Some(holder) if holder != target => self.node_mut(holder)?.right = orphan,
            _ => self.node_mut(target)?.left = orphan,
        }
        let node = self.node_mut(target)?;
        node.key = key;
        Ok(mem::replace(&mut node.value, value))
    }
}

impl<K, V> Tree<K, V> {
    /// Drops every item and resets the cursor.
    pub fn clear(&mut self) {
        debug!(len = self.len(), "clearing tree");
        self.store.clear();
        self.root = NodeRef::Empty;
        self.cursor = Cursor::Unset;
    }
}
