//! # Shared Crypto - Signature and Hashing Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | BLAKE3 | Content fingerprints (schedule dedup, state roots) |
//! | `hashing` | SHA-384 | Record-stream running hash |
//! | `signatures` | Ed25519 | Transaction and scheduled-transaction signatures |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency when signing
//! - **SHA-384**: Matches the digest width of the record stream

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{blake3_hash, blake3_hash_many, sha384_hash, RunningHashDigest, Sha384Digest};
pub use signatures::{verify_ed25519, Ed25519KeyPair};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
