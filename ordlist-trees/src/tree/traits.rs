//! Traits shared by tree keys, values and digests.

use std::fmt::{Debug, Display};

/// A printable, cloneable type usable as a key in debug renderings.
pub trait SimpleType: Debug + Clone + Sync + Send + Display {}

impl<T: Debug + Clone + Sync + Send + Display> SimpleType for T {}

/// A type which can feed its canonical bytes into a [`Hasher`].
pub trait Hashable {
    /// Writes this value's bytes into `digest`.
    fn hash(&self, digest: &mut dyn Hasher) -> anyhow::Result<()>;
}

/// An incremental hash function.
pub trait Hasher {
    /// Creates a fresh hasher of the same kind.
    fn new(&self) -> Box<dyn Hasher>;
    /// Feeds bytes into the hasher.
    fn update(&mut self, value: &[u8]);
    /// Returns the digest of everything fed so far.
    fn finalize(&mut self) -> Vec<u8>;
}

/// A structure with a digest over its shape and contents.
pub trait MerkleTree {
    /// Writes the root digest into `digest`.
    fn merkle_hash(&self, digest: &mut dyn Hasher) -> anyhow::Result<()>;
}
