use std::borrow::Borrow;

use tracing::trace;

use crate::error::TreeError;
use crate::node_ref::NodeId;
use crate::tree::bst::{Side, Tree};

/// The position of a tree's cursor.
///
/// The cursor never stores a link that the tree would have to keep up to
/// date; `parent` is always re-derived when it is not known from the step
/// that produced `current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Not positioned: the tree is empty or nothing has been looked up yet.
    #[default]
    Unset,
    /// The insertion point left by a failed [`Tree::find`].
    Vacant {
        /// The node the missing key would attach to, or `None` for an empty tree.
        parent: Option<NodeId>,
    },
    /// Positioned on a node.
    On {
        /// The node under the cursor.
        current: NodeId,
        /// The structural parent of `current`, `None` at the root.
        parent: Option<NodeId>,
    },
    /// One position before the first item.
    Before,
    /// One position past the last item.
    After,
}

impl Cursor {
    // the sentinel reached by walking off the `side` end of the tree
    fn past(side: Side) -> Cursor {
        match side {
            Side::Left => Cursor::Before,
            Side::Right => Cursor::After,
        }
    }
}

impl<K, V> Tree<K, V> {
    /// Returns the current cursor position.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Returns the item under the cursor.
    ///
    /// Fails with [`TreeError::InvalidRetrieve`] unless the cursor is on an item:
    /// after a failed find, after walking off either end, or on an empty tree.
    pub fn retrieve(&self) -> Result<(&K, &V), TreeError> {
        match self.cursor {
            Cursor::On { current, .. } => {
                let node = self.node(current)?;
                Ok((&node.key, &node.value))
            }
            _ => Err(TreeError::InvalidRetrieve),
        }
    }

    /// Returns the key of the cursor's parent component, if it has one.
    pub fn parent_key(&self) -> Result<Option<&K>, TreeError> {
        match self.cursor {
            Cursor::On { parent: Some(parent), .. } | Cursor::Vacant { parent: Some(parent) } => {
                Ok(Some(&self.node(parent)?.key))
            }
            _ => Ok(None),
        }
    }

    /// Returns true if the cursor has walked past the last item.
    pub fn end_of_list(&self) -> bool {
        self.cursor == Cursor::After
    }

    /// Returns true if the cursor has walked before the first item.
    pub fn beginning_of_list(&self) -> bool {
        self.cursor == Cursor::Before
    }

    /// Moves the cursor to the smallest key. An empty tree moves it past the end.
    pub fn first_position(&mut self) -> Result<(), TreeError> {
        self.cursor = self.edge_position(Side::Left)?;
        Ok(())
    }

    /// Moves the cursor to the largest key. An empty tree moves it before the beginning.
    pub fn last_position(&mut self) -> Result<(), TreeError> {
        self.cursor = self.edge_position(Side::Right)?;
        Ok(())
    }

    fn edge_position(&self, side: Side) -> Result<Cursor, TreeError> {
        Ok(match self.root.id() {
            None => Cursor::past(side.opposite()),
            Some(root) => {
                let (current, parent) = self.extreme(root, None, side)?;
                Cursor::On { current, parent }
            }
        })
    }
}

impl<K: Ord, V> Tree<K, V> {
    /// Positions the cursor on `key` and returns true, or on the point where
    /// `key` would be inserted and returns false.
    pub fn find<Q>(&mut self, key: &Q) -> Result<bool, TreeError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let hit = self.search(key)?;
        self.cursor = match hit.current {
            Some(current) => Cursor::On {
                current,
                parent: hit.parent,
            },
            None => Cursor::Vacant { parent: hit.parent },
        };
        Ok(hit.current.is_some())
    }

    /// Moves the cursor to the in-order successor. From the last item it
    /// moves past the end; from before the beginning it moves to the first
    /// item. Otherwise a cursor that is not on an item stays put.
    pub fn next_position(&mut self) -> Result<(), TreeError> {
        self.step(Side::Right)
    }

    /// Moves the cursor to the in-order predecessor, mirroring
    /// [`next_position`](Tree::next_position).
    pub fn prev_position(&mut self) -> Result<(), TreeError> {
        self.step(Side::Left)
    }

    // `toward` is Right for successor steps and Left for predecessor steps
    fn step(&mut self, toward: Side) -> Result<(), TreeError> {
        self.cursor = match self.cursor {
            Cursor::On { current, parent } => match self.node(current)?.child(toward).id() {
                Some(subtree) => {
                    let (current, parent) =
                        self.extreme(subtree, Some(current), toward.opposite())?;
                    Cursor::On { current, parent }
                }
                None => self.ascend(current, parent, toward)?,
            },
            Cursor::Before if toward == Side::Right => self.edge_position(Side::Left)?,
            Cursor::After if toward == Side::Left => self.edge_position(Side::Right)?,
            other => other,
        };
        Ok(())
    }

    // Climbs from `current` until an ancestor is reached from its `toward.opposite()`
    // side. Each level up needs a root search, as nodes do not know their parents.
    fn ascend(
        &self,
        current: NodeId,
        parent: Option<NodeId>,
        toward: Side,
    ) -> Result<Cursor, TreeError> {
        let mut child = current;
        let mut parent = parent;
        while let Some(candidate) = parent {
            let grandparent = self.parent_of(candidate)?;
            if self.node(candidate)?.child(toward.opposite()).is(child) {
                trace!(node = %candidate, "reconstructed ancestor");
                return Ok(Cursor::On {
                    current: candidate,
                    parent: grandparent,
                });
            }
            child = candidate;
            parent = grandparent;
        }
        Ok(Cursor::past(toward))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::TreeError;
    use crate::tree::bst::tests::{assert_cursor_parent, build, T1_KEYS};
    use crate::tree::bst::{Cursor, Tree};
    use coverage_helper::test;

    fn forward(tree: &mut Tree<i32, String>) -> Result<Vec<i32>, TreeError> {
        let mut seen = vec![];
        tree.first_position()?;
        while !tree.end_of_list() {
            assert_cursor_parent(tree);
            seen.push(*tree.retrieve()?.0);
            tree.next_position()?;
        }
        Ok(seen)
    }

    fn backward(tree: &mut Tree<i32, String>) -> Result<Vec<i32>, TreeError> {
        let mut seen = vec![];
        tree.last_position()?;
        while !tree.beginning_of_list() {
            assert_cursor_parent(tree);
            seen.push(*tree.retrieve()?.0);
            tree.prev_position()?;
        }
        Ok(seen)
    }

    #[test]
    fn test_forward_iteration() -> anyhow::Result<()> {
        let mut tree = build(&T1_KEYS)?;
        assert_eq!(forward(&mut tree)?, vec![1, 2, 3, 6, 7, 8, 9, 10, 12, 15, 17]);
        assert_eq!(tree.retrieve(), Err(TreeError::InvalidRetrieve));
        Ok(())
    }

    #[test]
    fn test_backward_iteration() -> anyhow::Result<()> {
        let mut tree = build(&T1_KEYS)?;
        assert_eq!(backward(&mut tree)?, vec![17, 15, 12, 10, 9, 8, 7, 6, 3, 2, 1]);
        assert_eq!(tree.retrieve(), Err(TreeError::InvalidRetrieve));
        Ok(())
    }

    #[test]
    fn test_degenerate_chains() -> anyhow::Result<()> {
        let ascending: Vec<i32> = (0..40).collect();
        let mut right_chain = build(&ascending)?;
        assert_eq!(forward(&mut right_chain)?, ascending);

        let descending: Vec<i32> = (0..40).rev().collect();
        let mut left_chain = build(&descending)?;
        assert_eq!(forward(&mut left_chain)?, ascending);
        assert_eq!(backward(&mut left_chain)?, descending);
        Ok(())
    }

    #[test]
    fn test_sentinels_turn_around() -> anyhow::Result<()> {
        let mut tree = build(&T1_KEYS)?;
        tree.last_position()?;
        tree.next_position()?;
        assert!(tree.end_of_list());
        assert!(!tree.beginning_of_list());
        tree.next_position()?;
        assert_eq!(tree.cursor(), Cursor::After);
        tree.prev_position()?;
        assert_eq!(tree.retrieve()?.0, &17);

        tree.first_position()?;
        tree.prev_position()?;
        assert!(tree.beginning_of_list());
        tree.prev_position()?;
        assert_eq!(tree.cursor(), Cursor::Before);
        tree.next_position()?;
        assert_eq!(tree.retrieve()?.0, &1);
        Ok(())
    }

    #[test]
    fn test_empty_tree_positions() -> anyhow::Result<()> {
        let mut tree: Tree<i32, String> = Tree::new();
        assert_eq!(tree.cursor(), Cursor::Unset);
        assert_eq!(tree.retrieve(), Err(TreeError::InvalidRetrieve));
        tree.first_position()?;
        assert!(tree.end_of_list());
        tree.last_position()?;
        assert!(tree.beginning_of_list());
        assert!(!tree.find(&1)?);
        assert_eq!(tree.cursor(), Cursor::Vacant { parent: None });
        assert_eq!(tree.parent_key()?, None);
        Ok(())
    }

    #[test]
    fn test_find_positions() -> anyhow::Result<()> {
        let mut tree = build(&T1_KEYS)?;
        assert!(tree.find(&8)?);
        assert_eq!(tree.retrieve()?, (&8, &"v8".to_string()));
        assert_eq!(tree.parent_key()?, Some(&7));
        assert_cursor_parent(&tree);

        assert!(tree.find(&10)?);
        assert_eq!(tree.parent_key()?, None);

        assert!(!tree.find(&11)?);
        assert_eq!(tree.parent_key()?, Some(&12));
        assert_eq!(tree.retrieve(), Err(TreeError::InvalidRetrieve));

        // a vacant cursor does not move
        tree.next_position()?;
        assert!(matches!(tree.cursor(), Cursor::Vacant { .. }));
        Ok(())
    }

    #[test]
    fn test_step_from_found_key() -> anyhow::Result<()> {
        let mut tree = build(&T1_KEYS)?;
        tree.find(&3)?;
        tree.next_position()?;
        assert_eq!(tree.retrieve()?.0, &6);
        assert_cursor_parent(&tree);
        tree.find(&8)?;
        tree.next_position()?;
        assert_eq!(tree.retrieve()?.0, &9);
        assert_eq!(tree.parent_key()?, Some(&10));
        tree.find(&12)?;
        tree.prev_position()?;
        assert_eq!(tree.retrieve()?.0, &10);
        assert_eq!(tree.parent_key()?, None);
        Ok(())
    }

    mod properties {
        use std::collections::BTreeSet;

        use super::{backward, forward};
        use crate::tree::bst::tests::build;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn walks_keep_parent_in_step(
                inserted in prop::collection::vec(-300i32..300, 0..120),
                deleted in prop::collection::vec(-300i32..300, 0..40),
            ) {
                let mut tree = build(&inserted).expect("build");
                let mut expected: BTreeSet<i32> = inserted.iter().copied().collect();
                let ascending: Vec<i32> = expected.iter().copied().collect();
                prop_assert_eq!(forward(&mut tree).expect("forward"), ascending.clone());
                let descending: Vec<i32> = ascending.into_iter().rev().collect();
                prop_assert_eq!(backward(&mut tree).expect("backward"), descending);

                for key in &deleted {
                    tree.delete(key).expect("delete");
                    expected.remove(key);
                }
                let ascending: Vec<i32> = expected.iter().copied().collect();
                prop_assert_eq!(forward(&mut tree).expect("forward"), ascending.clone());
                let descending: Vec<i32> = ascending.into_iter().rev().collect();
                prop_assert_eq!(backward(&mut tree).expect("backward"), descending);
            }
        }
    }
}
