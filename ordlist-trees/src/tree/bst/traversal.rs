use crate::error::TreeError;
use crate::node_ref::{NodeId, NodeRef};
use crate::tree::bst::{Node, Side, Tree};

/// Number of levels covered by [`Tree::level_snapshot`].
pub const LEVEL_SNAPSHOT_DEPTH: usize = 5;
/// Number of slots in a level snapshot, one per position of a full tree of
/// [`LEVEL_SNAPSHOT_DEPTH`] levels.
pub const LEVEL_SNAPSHOT_SLOTS: usize = (1 << LEVEL_SNAPSHOT_DEPTH) - 1;

/// One position of a level-order snapshot.
#[derive(Debug, PartialEq, Eq)]
pub enum LevelSlot<'a, K, V> {
    /// An item held at this position.
    Item(&'a K, &'a V),
    /// An absent child of a present node.
    Missing,
    /// A position below a missing slot.
    Unreachable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Order {
    InOrder,
    Reverse,
    PreOrder,
}

impl<K, V> Tree<K, V> {
    /// Visits every node once in `order`. Stops at the first error.
    pub(crate) fn walk<E: From<TreeError>>(
        &self,
        order: Order,
        mut visit: impl FnMut(NodeId, &Node<K, V>) -> Result<(), E>,
    ) -> Result<(), E> {
        let near = match order {
            Order::PreOrder => {
                let mut pending: Vec<NodeId> = self.root.id().into_iter().collect();
                while let Some(id) = pending.pop() {
                    let node = self.node(id)?;
                    visit(id, node)?;
                    pending.extend(node.right.id());
                    pending.extend(node.left.id());
                }
                return Ok(());
            }
            Order::InOrder => Side::Left,
            Order::Reverse => Side::Right,
        };

        let mut pending: Vec<NodeId> = vec![];
        let mut walk = self.root;
        loop {
            while let Some(id) = walk.id() {
                pending.push(id);
                walk = self.node(id)?.child(near);
            }
            let Some(id) = pending.pop() else { break };
            let node = self.node(id)?;
            visit(id, node)?;
            walk = node.child(near.opposite());
        }
        Ok(())
    }

    /// Calls `visit` on every item in ascending key order.
    pub fn in_order(
        &self,
        mut visit: impl FnMut(&K, &V) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        self.walk(Order::InOrder, |_, node| visit(&node.key, &node.value))
    }

    /// Calls `visit` on every item in descending key order.
    pub fn reverse_in_order(
        &self,
        mut visit: impl FnMut(&K, &V) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        self.walk(Order::Reverse, |_, node| visit(&node.key, &node.value))
    }

    /// Calls `visit` on every item, each node before its left then right subtree.
    ///
    /// Replaying the keys through find and insert in this order rebuilds the
    /// same shape.
    pub fn pre_order(
        &self,
        mut visit: impl FnMut(&K, &V) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        self.walk(Order::PreOrder, |_, node| visit(&node.key, &node.value))
    }

    /// Returns the top [`LEVEL_SNAPSHOT_DEPTH`] levels in level order.
    ///
    /// Slot 0 is the root and the children of slot `i` are `2i + 1` and
    /// `2i + 2`. An empty tree has a [`LevelSlot::Missing`] root.
    pub fn level_snapshot(&self) -> Result<Vec<LevelSlot<'_, K, V>>, TreeError> {
        // None marks a slot that no present node links to
        let mut links: Vec<Option<NodeRef>> = Vec::with_capacity(LEVEL_SNAPSHOT_SLOTS);
        for slot in 0..LEVEL_SNAPSHOT_SLOTS {
            let link = if slot == 0 {
                Some(self.root)
            } else {
                match links[(slot - 1) / 2] {
                    Some(NodeRef::Inner(parent)) => {
                        let side = if slot % 2 == 1 { Side::Left } else { Side::Right };
                        Some(self.node(parent)?.child(side))
                    }
                    _ => None,
                }
            };
            links.push(link);
        }

        links
            .into_iter()
            .map(|link| {
                Ok(match link {
                    None => LevelSlot::Unreachable,
                    Some(NodeRef::Empty) => LevelSlot::Missing,
                    Some(NodeRef::Inner(id)) => {
                        let node = self.node(id)?;
                        LevelSlot::Item(&node.key, &node.value)
                    }
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use crate::tree::bst::tests::{build, T1_KEYS};
    use crate::tree::bst::{LevelSlot, Tree, LEVEL_SNAPSHOT_SLOTS};
    use coverage_helper::test;

    type Visitor<'a> = &'a mut dyn FnMut(&i32, &String) -> anyhow::Result<()>;

    fn collect(
        walk: impl FnOnce(Visitor<'_>) -> anyhow::Result<()>,
    ) -> anyhow::Result<Vec<i32>> {
        let mut seen = vec![];
        walk(&mut |key, _| {
            seen.push(*key);
            Ok(())
        })?;
        Ok(seen)
    }

    #[test]
    fn test_orders() -> anyhow::Result<()> {
        let tree = build(&T1_KEYS)?;
        assert_eq!(
            collect(|visit| tree.in_order(visit))?,
            vec![1, 2, 3, 6, 7, 8, 9, 10, 12, 15, 17]
        );
        assert_eq!(
            collect(|visit| tree.reverse_in_order(visit))?,
            vec![17, 15, 12, 10, 9, 8, 7, 6, 3, 2, 1]
        );
        assert_eq!(
            collect(|visit| tree.pre_order(visit))?,
            vec![10, 9, 6, 1, 2, 3, 7, 8, 15, 12, 17]
        );
        Ok(())
    }

    #[test]
    fn test_walk_leaves_cursor_alone() -> anyhow::Result<()> {
        let mut tree = build(&T1_KEYS)?;
        tree.find(&7)?;
        let before = tree.cursor();
        tree.in_order(|_, _| Ok(()))?;
        assert_eq!(tree.cursor(), before);
        Ok(())
    }

    #[test]
    fn test_visitor_error_stops_walk() -> anyhow::Result<()> {
        let tree = build(&T1_KEYS)?;
        let mut visited = 0;
        let result = tree.in_order(|key, _| {
            visited += 1;
            if *key == 6 {
                return Err(anyhow!("stop at {}", key));
            }
            Ok(())
        });
        assert_eq!(result.map_err(|e| e.to_string()), Err("stop at 6".to_string()));
        assert_eq!(visited, 4);
        Ok(())
    }

    #[test]
    fn test_empty_walks() -> anyhow::Result<()> {
        let tree: Tree<i32, String> = Tree::new();
        assert!(collect(|visit| tree.in_order(visit))?.is_empty());
        assert!(collect(|visit| tree.pre_order(visit))?.is_empty());

        let snapshot = tree.level_snapshot()?;
        assert_eq!(snapshot.len(), LEVEL_SNAPSHOT_SLOTS);
        assert_eq!(snapshot[0], LevelSlot::Missing);
        assert!(snapshot[1..].iter().all(|slot| *slot == LevelSlot::Unreachable));
        Ok(())
    }

    #[test]
    fn test_level_snapshot() -> anyhow::Result<()> {
        let tree = build(&T1_KEYS)?;
        let snapshot = tree.level_snapshot()?;
        let key_at = |slot: usize| match snapshot[slot] {
            LevelSlot::Item(key, _) => Some(*key),
            _ => None,
        };
        assert_eq!(key_at(0), Some(10));
        assert_eq!((key_at(1), key_at(2)), (Some(9), Some(15)));
        assert_eq!(key_at(3), Some(6));
        assert_eq!(snapshot[4], LevelSlot::Missing);
        assert_eq!((key_at(5), key_at(6)), (Some(12), Some(17)));
        assert_eq!((key_at(7), key_at(8)), (Some(1), Some(7)));
        assert_eq!(snapshot[9], LevelSlot::Unreachable);
        assert_eq!(snapshot[11], LevelSlot::Missing);
        assert_eq!(snapshot[15], LevelSlot::Missing);
        assert_eq!(key_at(16), Some(2));
        assert_eq!(key_at(18), Some(8));
        assert_eq!(snapshot[19], LevelSlot::Unreachable);

        // 3 is on the sixth level and is left out
        let items = snapshot.iter().filter(|slot| matches!(slot, LevelSlot::Item(..))).count();
        assert_eq!(items, 10);
        Ok(())
    }
}
