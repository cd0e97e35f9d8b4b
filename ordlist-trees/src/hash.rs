//! [`Hasher`] implementations backing tree digests.

use blake2::Blake2b512;
use digest::Digest;

use crate::tree::traits::Hasher;

/// A BLAKE3 hasher with 32 byte output.
#[derive(Default)]
pub struct Blake3Hash {
    hasher: blake3::Hasher,
}

impl Blake3Hash {
    /// Creates a fresh hasher.
    pub fn new() -> Self {
        Blake3Hash { hasher: blake3::Hasher::new() }
    }
}

impl Hasher for Blake3Hash {
    fn new(&self) -> Box<dyn Hasher> {
        Box::new(Self::new())
    }

    fn update(&mut self, value: &[u8]) {
        self.hasher.update(value);
    }

    fn finalize(&mut self) -> Vec<u8> {
        let hash: [u8; 32] = self.hasher.finalize().into();
        Vec::from(hash)
    }
}

/// A BLAKE2b hasher with 64 byte output.
#[derive(Default)]
pub struct Blake2bHash {
    hasher: Blake2b512,
}

impl Blake2bHash {
    /// Creates a fresh hasher.
    pub fn new() -> Self {
        Blake2bHash { hasher: Blake2b512::new() }
    }
}

impl Hasher for Blake2bHash {
    fn new(&self) -> Box<dyn Hasher> {
        Box::new(Self::new())
    }

    fn update(&mut self, value: &[u8]) {
        Digest::update(&mut self.hasher, value);
    }

    fn finalize(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.hasher).finalize().to_vec()
    }
}

/// Collects the digest handed up by the root of a tree.
///
/// Child digests are computed with fresh hashers from `new_hash`; the last
/// value passed to [`update`](Hasher::update) becomes the result.
pub struct HashRoot {
    /// Creates the hasher used for every node.
    pub new_hash: fn() -> Box<dyn Hasher>,
    /// The root digest.
    pub result: Vec<u8>,
}

impl HashRoot {
    /// Creates an empty collector.
    pub fn new(new_hash: fn() -> Box<dyn Hasher>) -> Self {
        HashRoot {
            new_hash,
            result: vec![],
        }
    }
}

impl Hasher for HashRoot {
    fn new(&self) -> Box<dyn Hasher> {
        (self.new_hash)()
    }

    fn update(&mut self, value: &[u8]) {
        self.result = Vec::from(value);
    }

    fn finalize(&mut self) -> Vec<u8> {
        self.result.clone()
    }
}

/// Returns a boxed [`Blake3Hash`], for use as a `new_hash` constructor.
pub fn new_blake3() -> Box<dyn Hasher> {
    Box::new(Blake3Hash::new())
}

/// Returns a boxed [`Blake2bHash`], for use as a `new_hash` constructor.
pub fn new_blake2b() -> Box<dyn Hasher> {
    Box::new(Blake2bHash::new())
}
