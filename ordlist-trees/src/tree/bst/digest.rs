use std::collections::HashMap;
use std::fmt::Debug;

use crate::error::TreeError;
use crate::hash::HashRoot;
use crate::node_ref::NodeId;
use crate::tree::bst::traversal::Order;
use crate::tree::bst::Tree;
use crate::tree::traits::{Hashable, Hasher, MerkleTree, SimpleType};
use crate::visualization::TreeGraph;

impl<K: Hashable, V: Hashable> Tree<K, V> {
    // Digest of every node, children before parents. A node hashes its key,
    // its value, then its children's digests left first.
    fn node_digests(&self, hasher: &dyn Hasher) -> anyhow::Result<HashMap<NodeId, Vec<u8>>> {
        let mut order = vec![];
        self.walk(Order::PreOrder, |id, _| -> Result<(), TreeError> {
            order.push(id);
            Ok(())
        })?;

        let mut digests: HashMap<NodeId, Vec<u8>> = HashMap::with_capacity(order.len());
        for id in order.into_iter().rev() {
            let node = self.node(id)?;
            let mut node_digest = hasher.new();
            node.key.hash(&mut *node_digest)?;
            node.value.hash(&mut *node_digest)?;
            let have_left = match node.left.id() {
                Some(left) => {
                    node_digest.update(digests.get(&left).ok_or(TreeError::DanglingNode(left))?);
                    true
                }
                None => false,
            };
            if let Some(right) = node.right.id() {
                if !have_left {
                    // pad with a 0 in case left is empty to distinguish left from right
                    node_digest.update(&[0]);
                }
                node_digest.update(digests.get(&right).ok_or(TreeError::DanglingNode(right))?);
            }
            digests.insert(id, node_digest.finalize());
        }
        Ok(digests)
    }

    /// Returns the root digest computed with hashers from `new_hash`.
    pub fn digest(&self, new_hash: fn() -> Box<dyn Hasher>) -> anyhow::Result<Vec<u8>> {
        let mut root_hash = HashRoot::new(new_hash);
        self.merkle_hash(&mut root_hash)?;
        Ok(root_hash.result)
    }
}

impl<K: Hashable, V: Hashable> MerkleTree for Tree<K, V> {
    fn merkle_hash(&self, digest: &mut dyn Hasher) -> anyhow::Result<()> {
        match self.root.id() {
            None => {
                let empty = digest.new().finalize();
                digest.update(&empty);
            }
            Some(root) => {
                let digests = self.node_digests(&*digest)?;
                digest.update(digests.get(&root).ok_or(TreeError::DanglingNode(root))?);
            }
        }
        Ok(())
    }
}

impl<K: SimpleType + Hashable, V: Debug + Hashable> Tree<K, V> {
    /// Renders the tree as a DOT graph labelled with its root digest. Each
    /// node shows its key, value and the first bytes of its own digest.
    pub fn to_graphviz(&self, new_hash: fn() -> Box<dyn Hasher>) -> anyhow::Result<TreeGraph> {
        let root_hasher = HashRoot::new(new_hash);
        let digests = self.node_digests(&root_hasher)?;
        let root_digest = match self.root.id() {
            None => new_hash().finalize(),
            Some(root) => digests.get(&root).cloned().ok_or(TreeError::DanglingNode(root))?,
        };
        let mut graph = TreeGraph::new(hex::encode(root_digest));

        let mut drawn = HashMap::with_capacity(digests.len());
        self.walk(Order::PreOrder, |id, node| -> anyhow::Result<()> {
            let hash = digests.get(&id).ok_or(TreeError::DanglingNode(id))?;
            let short = hash.get(..8).unwrap_or(hash.as_slice());
            let label = format!("{} v={:?} {}", node.key, node.value, hex::encode(short));
            drawn.insert(id, graph.new_node(label));
            Ok(())
        })?;
        self.walk(Order::PreOrder, |id, node| -> anyhow::Result<()> {
            let from = drawn.get(&id).ok_or(TreeError::DanglingNode(id))?;
            for (child, side) in [(node.left, "L"), (node.right, "R")] {
                if let Some(child) = child.id() {
                    let to = drawn.get(&child).ok_or(TreeError::DanglingNode(child))?;
                    graph.draw_edge(from, to, side);
                }
            }
            Ok(())
        })?;
        Ok(graph)
    }
}
