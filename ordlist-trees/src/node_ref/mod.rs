//! Primitives for referencing tree nodes through handles into a node store,
//! so that a cursor can hold non-owning references while the store keeps
//! exclusive ownership of every node.

mod r#impl;
mod node_store;

pub use crate::node_ref::r#impl::{NodeId, NodeRef};
pub use crate::node_ref::node_store::{MemNodeStore, NodeStore};
