//! An unbalanced binary search tree with a parent-free cursor.
//!
//! Nodes keep no reference to their parent. The [`Cursor`] remembers the
//! current node together with its parent, and whenever the parent of a node
//! is needed but not at hand it is re-derived by a fresh descent from the
//! root (`Tree::parent_of`). Navigation therefore costs O(height) per step
//! in the worst case, in exchange for two links per node instead of three.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};

use tracing::debug;

use crate::error::TreeError;
use crate::node_ref::{MemNodeStore, NodeId, NodeRef, NodeStore};
use crate::tree::config::TreeConfig;

mod algebra;
mod cursor;
mod digest;
mod mutation;
mod traversal;

pub use crate::tree::bst::cursor::Cursor;
pub use crate::tree::bst::traversal::{LevelSlot, LEVEL_SNAPSHOT_DEPTH, LEVEL_SNAPSHOT_SLOTS};

/// An ordered key/value container backed by an unbalanced binary search tree.
///
/// Keys are unique. Ordering and equality of items are defined by key alone;
/// two trees compare equal when they hold the same key set, whatever their
/// shapes.
pub struct Tree<K, V> {
    root: NodeRef,
    store: MemNodeStore<Node<K, V>>,
    cursor: Cursor,
    config: TreeConfig,
}

/// A tree node owning one item and, through its links, its two subtrees.
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    left: NodeRef,
    right: NodeRef,
}

/// Which child of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    // the side of `pivot` that `key` belongs on
    fn toward<Q: ?Sized + Ord>(key: &Q, pivot: &Q) -> Side {
        if key < pivot {
            Side::Left
        } else {
            Side::Right
        }
    }
}

impl<K, V> Node<K, V> {
    fn new_node(key: K, value: V) -> Self {
        Node {
            key,
            value,
            left: NodeRef::Empty,
            right: NodeRef::Empty,
        }
    }

    pub(crate) fn child(&self, side: Side) -> NodeRef {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn set_child(&mut self, side: Side, child: NodeRef) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

/// The outcome of a descent from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SearchHit {
    /// The node holding the key, if present.
    current: Option<NodeId>,
    /// The parent of `current`, or the node the key would attach to.
    parent: Option<NodeId>,
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Tree<K, V> {
    /// Creates an empty, unbounded tree.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Creates an empty tree using `config`.
    pub fn with_config(config: TreeConfig) -> Self {
        Tree {
            root: NodeRef::Empty,
            store: MemNodeStore::new(config.max_nodes),
            cursor: Cursor::Unset,
            config,
        }
    }

    /// Returns the configuration of this tree.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Returns true if the configured node limit has been reached.
    /// Always false for an unbounded tree.
    pub fn is_full(&self) -> bool {
        self.store.is_full()
    }

    /// Returns the number of levels, 0 for an empty tree.
    pub fn height(&self) -> Result<usize, TreeError> {
        let mut height = 0;
        let mut pending: Vec<(NodeId, usize)> =
            self.root.id().map(|id| (id, 1)).into_iter().collect();
        while let Some((id, depth)) = pending.pop() {
            height = height.max(depth);
            let node = self.node(id)?;
            for child in [node.left, node.right].into_iter().filter_map(NodeRef::id) {
                pending.push((child, depth + 1));
            }
        }
        Ok(height)
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node<K, V>, TreeError> {
        self.store.read(id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<K, V>, TreeError> {
        self.store.read_mut(id)
    }

    /// Follows `side` links from `start` to the last node on that side.
    /// Returns that node and its parent, given that `parent` is the parent of `start`.
    pub(crate) fn extreme(
        &self,
        start: NodeId,
        parent: Option<NodeId>,
        side: Side,
    ) -> Result<(NodeId, Option<NodeId>), TreeError> {
        let (mut current, mut parent) = (start, parent);
        while let Some(next) = self.node(current)?.child(side).id() {
            parent = Some(current);
            current = next;
        }
        Ok((current, parent))
    }
}

impl<K: Ord, V> Tree<K, V> {
    /// Descends from the root looking for `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Result<SearchHit, TreeError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut parent = None;
        let mut walk = self.root;
        while let Some(at) = walk.id() {
            let node = self.node(at)?;
            walk = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Equal => {
                    return Ok(SearchHit {
                        current: Some(at),
                        parent,
                    })
                }
                Ordering::Greater => node.right,
            };
            parent = Some(at);
        }
        Ok(SearchHit { current: None, parent })
    }

    /// Re-derives the parent of `id` by descending from the root and
    /// comparing keys until a node linking to `id` is reached.
    pub(crate) fn parent_of(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        let key = &self.node(id)?.key;
        let mut parent = None;
        let mut walk = self.root;
        while let Some(at) = walk.id() {
            if at == id {
                return Ok(parent);
            }
            let node = self.node(at)?;
            walk = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                // another node holds the same key, so `id` is not in this tree
                Ordering::Equal => break,
            };
            parent = Some(at);
        }
        Err(TreeError::DanglingNode(id))
    }

    /// Returns the value stored under `key`, without moving the cursor.
    pub fn get<Q>(&self, key: &Q) -> Result<Option<&V>, TreeError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.search(key)?.current {
            None => Ok(None),
            Some(id) => Ok(Some(&self.node(id)?.value)),
        }
    }

    /// Returns true if `key` is present, without moving the cursor.
    pub fn contains_key<Q>(&self, key: &Q) -> Result<bool, TreeError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Ok(self.search(key)?.current.is_some())
    }
}

impl<K: Ord + Clone, V: Clone> Tree<K, V> {
    /// Makes a deep copy of this tree: a disjoint node set with the same
    /// items in the same shape. The copy's cursor is repositioned on the
    /// corresponding key.
    ///
    /// Fails with [`TreeError::OutOfMemory`] without leaving any partial copy behind.
    pub fn try_clone(&self) -> Result<Self, TreeError> {
        self.clone_with_config(self.config.clone())
    }

    /// Replaces the contents of this tree with a deep copy of `other`.
    /// On failure this tree is left unchanged.
    pub fn assign_from(&mut self, other: &Self) -> Result<(), TreeError> {
        *self = other.clone_with_config(self.config.clone())?;
        Ok(())
    }

    fn clone_with_config(&self, config: TreeConfig) -> Result<Self, TreeError> {
        let mut copy = Self::with_config(config);
        copy.store.reserve(self.len())?;

        // pre-order, so every parent exists before its children are linked in
        let mut pending: Vec<(NodeId, Option<(NodeId, Side)>)> = Vec::new();
        if let Some(root) = self.root.id() {
            pending.push((root, None));
        }
        while let Some((source, slot)) = pending.pop() {
            let node = self.node(source)?;
            let id = copy.store.insert(Node::new_node(node.key.clone(), node.value.clone()))?;
            match slot {
                None => copy.root = NodeRef::Inner(id),
                Some((parent, side)) => copy.node_mut(parent)?.set_child(side, NodeRef::Inner(id)),
            }
            if let Some(right) = node.right.id() {
                pending.push((right, Some((id, Side::Right))));
            }
            if let Some(left) = node.left.id() {
                pending.push((left, Some((id, Side::Left))));
            }
        }

        copy.cursor = match self.cursor {
            Cursor::On { current, .. } => {
                copy.find(&self.node(current)?.key)?;
                copy.cursor
            }
            Cursor::Vacant { parent: Some(parent) } => {
                copy.find(&self.node(parent)?.key)?;
                match copy.cursor {
                    Cursor::On { current, .. } => Cursor::Vacant { parent: Some(current) },
                    other => other,
                }
            }
            other => other,
        };
        debug!(len = copy.len(), "deep copied tree");
        Ok(copy)
    }
}

impl<K: Debug, V: Debug> Debug for Tree<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        let walked = self.walk(traversal::Order::InOrder, |_, node| -> Result<(), TreeError> {
            map.entry(&node.key, &node.value);
            Ok(())
        });
        if walked.is_err() {
            return Err(std::fmt::Error);
        }
        map.finish()
    }
}
