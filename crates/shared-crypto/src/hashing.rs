//! # Hashing
//!
//! - BLAKE3 for fast content fingerprints.
//! - SHA-384 for the record-stream running hash, where each link commits to
//!   its predecessor.

use sha2::{Digest, Sha384};

/// BLAKE3 hash output (256-bit).
pub type Hash = [u8; 32];

/// SHA-384 hash output (384-bit).
pub type Sha384Digest = [u8; 48];

/// Hash data with BLAKE3 (one-shot).
pub fn blake3_hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Hash multiple inputs with BLAKE3, each prefixed by its length so that
/// `["ab", "c"]` and `["a", "bc"]` hash differently.
pub fn blake3_hash_many(inputs: &[&[u8]]) -> Hash {
    let mut hasher = blake3::Hasher::new();
    for input in inputs {
        hasher.update(&(input.len() as u64).to_le_bytes());
        hasher.update(input);
    }
    *hasher.finalize().as_bytes()
}

/// Hash data with SHA-384 (one-shot).
pub fn sha384_hash(data: &[u8]) -> Sha384Digest {
    let mut out = [0u8; 48];
    out.copy_from_slice(&Sha384::digest(data));
    out
}

/// A chained SHA-384 accumulator.
///
/// `next = SHA-384(prev || SHA-384(item))`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunningHashDigest {
    current: Sha384Digest,
}

impl RunningHashDigest {
    /// Starts a chain from a known seed.
    pub fn from_seed(seed: Sha384Digest) -> Self {
        Self { current: seed }
    }

    /// Folds one item into the chain and returns the new head.
    pub fn absorb(&mut self, item: &[u8]) -> Sha384Digest {
        self.current = Self::link(&self.current, item);
        self.current
    }

    /// Current head of the chain.
    pub fn current(&self) -> Sha384Digest {
        self.current
    }

    /// Pure link function between a predecessor and an item.
    pub fn link(prev: &Sha384Digest, item: &[u8]) -> Sha384Digest {
        let mut hasher = Sha384::new();
        hasher.update(prev);
        hasher.update(Sha384::digest(item));
        let mut out = [0u8; 48];
        out.copy_from_slice(&hasher.finalize());
        out
    }
}

impl Default for RunningHashDigest {
    fn default() -> Self {
        Self::from_seed([0u8; 48])
    }
}
