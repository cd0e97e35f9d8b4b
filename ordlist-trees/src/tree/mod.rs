//! The ordered binary search tree and the traits and value types it is
//! parameterized by.

pub mod bst;
pub mod config;
pub mod traits;
pub mod value;
