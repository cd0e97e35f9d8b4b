use std::ops::Add;

use tracing::debug;

use crate::error::TreeError;
use crate::node_ref::NodeStore;
use crate::tree::bst::traversal::Order;
use crate::tree::bst::{Cursor, Tree};
use crate::tree::config::TreeConfig;

// Stops a key comparison walk.
enum KeyScan {
    Missing,
    Failed(TreeError),
}

impl From<TreeError> for KeyScan {
    fn from(err: TreeError) -> Self {
        KeyScan::Failed(err)
    }
}

impl<K: Ord, V> Tree<K, V> {
    /// Returns true if both trees hold exactly the same keys, whatever their
    /// shapes. Values and cursors are not compared. Stops at the first key
    /// missing from `other`.
    pub fn same_keys(&self, other: &Self) -> Result<bool, TreeError> {
        if self.len() != other.len() {
            return Ok(false);
        }
        let walked = self.walk(Order::InOrder, |_, node| -> Result<(), KeyScan> {
            if other.contains_key(&node.key)? {
                Ok(())
            } else {
                Err(KeyScan::Missing)
            }
        });
        match walked {
            Ok(()) => Ok(true),
            Err(KeyScan::Missing) => Ok(false),
            Err(KeyScan::Failed(err)) => Err(err),
        }
    }

    // Builds a complete tree from items in ascending key order. The largest
    // perfect block goes in first, midpoints before halves, then the items
    // that fill the last level from the left.
    fn complete_from_sorted(items: Vec<(K, V)>, config: TreeConfig) -> Result<Self, TreeError> {
        let total = items.len();
        let mut top_len = 0;
        while 2 * top_len + 1 <= total {
            top_len = 2 * top_len + 1;
        }
        let bottom_len = total - top_len;

        let mut top = Vec::new();
        let mut bottom = Vec::new();
        top.try_reserve_exact(top_len).map_err(|_| TreeError::OutOfMemory)?;
        bottom.try_reserve_exact(bottom_len).map_err(|_| TreeError::OutOfMemory)?;
        for (index, item) in items.into_iter().enumerate() {
            if index < 2 * bottom_len && index % 2 == 0 {
                bottom.push(Some(item));
            } else {
                top.push(Some(item));
            }
        }

        let mut tree = Self::with_config(config);
        tree.store.reserve(total)?;
        tree.insert_midpoints(&mut top)?;
        tree.insert_midpoints(&mut bottom)?;
        tree.cursor = Cursor::Unset;
        debug!(len = total, top = top_len, bottom = bottom_len, "rebuilt complete tree");
        Ok(tree)
    }

    fn insert_midpoints(&mut self, block: &mut [Option<(K, V)>]) -> Result<(), TreeError> {
        let mut ranges = vec![(0, block.len())];
        while let Some((start, end)) = ranges.pop() {
            if start >= end {
                continue;
            }
            let mid = start + (end - start - 1) / 2;
            if let Some((key, value)) = block[mid].take() {
                self.insert(key, value)?;
            }
            ranges.push((mid + 1, end));
            ranges.push((start, mid));
        }
        Ok(())
    }
}

impl<K, V> Tree<K, V> {
    /// Consumes the tree and returns its items in ascending key order.
    pub fn into_sorted_vec(mut self) -> Result<Vec<(K, V)>, TreeError> {
        let mut ids = Vec::new();
        ids.try_reserve_exact(self.len()).map_err(|_| TreeError::OutOfMemory)?;
        self.walk(Order::InOrder, |id, _| -> Result<(), TreeError> {
            ids.push(id);
            Ok(())
        })?;

        let mut items = Vec::new();
        items.try_reserve_exact(ids.len()).map_err(|_| TreeError::OutOfMemory)?;
        for id in ids {
            let node = self.store.delete(id)?;
            items.push((node.key, node.value));
        }
        Ok(items)
    }
}

impl<K: Ord + Clone, V: Clone> Tree<K, V> {
    /// Returns a new tree holding every key of either operand, rebuilt as a
    /// complete tree. Where both hold a key the item of `self` is kept.
    ///
    /// The result inherits the configuration of `self`. On
    /// [`TreeError::OutOfMemory`] the partial result is dropped and both
    /// operands are left as they were.
    pub fn union(&self, other: &Self) -> Result<Self, TreeError> {
        let mut merged = self.try_clone()?;
        other.walk(Order::InOrder, |_, node| -> Result<(), TreeError> {
            if !merged.find(&node.key)? {
                merged.insert(node.key.clone(), node.value.clone())?;
            }
            Ok(())
        })?;
        debug!(left = self.len(), right = other.len(), merged = merged.len(), "merged trees");

        let config = merged.config.clone();
        Self::complete_from_sorted(merged.into_sorted_vec()?, config)
    }
}

impl<K: Ord, V> PartialEq for Tree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.same_keys(other).unwrap_or(false)
    }
}

impl<K: Ord, V> Eq for Tree<K, V> {}

impl<K: Ord + Clone, V: Clone> Add<&Tree<K, V>> for &Tree<K, V> {
    type Output = Result<Tree<K, V>, TreeError>;

    fn add(self, rhs: &Tree<K, V>) -> Self::Output {
        self.union(rhs)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::TreeError;
    use crate::tree::bst::tests::{assert_bst, assert_complete, build, keys, T1_KEYS, T2_KEYS};
    use crate::tree::bst::{Cursor, Tree};
    use crate::tree::config::TreeConfig;
    use coverage_helper::test;

    #[test]
    fn test_union_example() -> anyhow::Result<()> {
        let t1 = build(&T1_KEYS)?;
        let t2 = build(&T2_KEYS)?;
        assert_eq!(t1.len(), 11);
        assert_eq!(t2.len(), 13);

        let union = (&t1 + &t2)?;
        assert_eq!(
            keys(&union),
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 15, 17, 18, 19, 20]
        );
        assert_eq!(union.height()?, 5);
        assert_eq!(union.cursor(), Cursor::Unset);
        assert_bst(&union);
        assert_complete(&union);

        assert_eq!(keys(&t1), vec![1, 2, 3, 6, 7, 8, 9, 10, 12, 15, 17]);
        assert_eq!(t2.len(), 13);
        Ok(())
    }

    #[test]
    fn test_union_keeps_left_items() -> anyhow::Result<()> {
        let mut left = Tree::new();
        let mut right = Tree::new();
        for (key, value) in [(1, "left"), (2, "left")] {
            left.find(&key)?;
            left.insert(key, value)?;
        }
        for (key, value) in [(2, "right"), (3, "right")] {
            right.find(&key)?;
            right.insert(key, value)?;
        }
        let union = left.union(&right)?;
        assert_eq!(union.get(&2)?, Some(&"left"));
        assert_eq!(union.get(&3)?, Some(&"right"));
        Ok(())
    }

    #[test]
    fn test_union_with_empty_rebuilds() -> anyhow::Result<()> {
        let chain = build(&[1, 2, 3, 4, 5, 6, 7])?;
        assert_eq!(chain.height()?, 7);
        let empty: Tree<i32, String> = Tree::new();

        let rebuilt = chain.union(&empty)?;
        assert_eq!(rebuilt.height()?, 3);
        assert_complete(&rebuilt);
        assert_eq!(rebuilt, chain);

        let mirrored = empty.union(&chain)?;
        assert_eq!(mirrored.height()?, 3);
        assert_eq!(mirrored, chain);

        let nothing = empty.union(&empty)?;
        assert!(nothing.is_empty());
        assert_eq!(nothing.height()?, 0);
        Ok(())
    }

    #[test]
    fn test_union_out_of_memory() -> anyhow::Result<()> {
        let mut t1: Tree<i32, ()> = Tree::with_config(TreeConfig::new().with_max_nodes(12));
        for key in T1_KEYS {
            t1.find(&key)?;
            t1.insert(key, ())?;
        }
        t1.find(&7)?;
        let mut t2 = Tree::new();
        for key in T2_KEYS {
            t2.find(&key)?;
            t2.insert(key, ())?;
        }

        assert_eq!(t1.union(&t2).map(|_| ()), Err(TreeError::OutOfMemory));
        assert_eq!(t1.len(), 11);
        assert_eq!(t1.retrieve()?.0, &7);
        assert_eq!(t2.len(), 13);

        // the right operand's config does not matter
        let roomy = t2.union(&t1)?;
        assert_eq!(roomy.len(), 17);
        Ok(())
    }

    #[test]
    fn test_equality_ignores_shape_and_values() -> anyhow::Result<()> {
        let balanced = build(&[2, 1, 3])?;
        let chain = build(&[1, 2, 3])?;
        assert_ne!(balanced.height()?, chain.height()?);
        assert_eq!(balanced, chain);
        assert!(balanced.same_keys(&chain)?);

        let mut relabelled = Tree::new();
        for key in [3, 1, 2] {
            relabelled.find(&key)?;
            relabelled.insert(key, "other".to_string())?;
        }
        assert_eq!(balanced, relabelled);

        assert_ne!(balanced, build(&[1, 2])?);
        assert_ne!(balanced, build(&[1, 2, 4])?);
        assert_eq!(Tree::<i32, String>::new(), Tree::new());
        Ok(())
    }

    #[test]
    fn test_same_keys_detects_missing_key() -> anyhow::Result<()> {
        let tree = build(&[5, 3, 8])?;
        let other = build(&[5, 4, 8])?;
        assert!(!tree.same_keys(&other)?);
        assert!(!other.same_keys(&tree)?);

        // a key below the smallest of `other` is the first one checked
        let lower = build(&[5, 1, 8])?;
        assert!(!lower.same_keys(&other)?);
        assert!(lower.same_keys(&build(&[1, 5, 8])?)?);
        Ok(())
    }

    #[test]
    fn test_into_sorted_vec() -> anyhow::Result<()> {
        let tree = build(&[5, 3, 8])?;
        assert_eq!(
            tree.into_sorted_vec()?,
            vec![(3, "v3".to_string()), (5, "v5".to_string()), (8, "v8".to_string())]
        );
        Ok(())
    }

    mod properties {
        use std::collections::BTreeSet;

        use crate::tree::bst::tests::{assert_bst, assert_complete, build, keys};
        use proptest::prelude::*;

        fn complete_height(len: usize) -> usize {
            (usize::BITS - len.leading_zeros()) as usize
        }

        proptest! {
            #[test]
            fn union_holds_both_key_sets(
                left in prop::collection::vec(0i32..200, 0..80),
                right in prop::collection::vec(0i32..200, 0..80),
            ) {
                let a = build(&left).expect("build");
                let b = build(&right).expect("build");
                let union = (&a + &b).expect("union");
                let expected: Vec<i32> = left
                    .iter()
                    .chain(right.iter())
                    .copied()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();
                prop_assert_eq!(keys(&union), expected.clone());
                prop_assert_eq!(union.height().expect("height"), complete_height(expected.len()));
                assert_bst(&union);
                assert_complete(&union);
            }

            #[test]
            fn equality_across_insertion_orders(
                (ordered, shuffled) in prop::collection::btree_set(-1000i32..1000, 0..60)
                    .prop_map(|set| set.into_iter().collect::<Vec<_>>())
                    .prop_flat_map(|keys| (Just(keys.clone()), Just(keys).prop_shuffle()))
            ) {
                let a = build(&ordered).expect("build");
                let b = build(&shuffled).expect("build");
                prop_assert!(a == b);
                let mut c = b.try_clone().expect("clone");
                if let Some(&key) = shuffled.first() {
                    c.delete(&key).expect("delete");
                    prop_assert!(a != c);
                }
            }
        }
    }
}
