//! # Keys
//!
//! Structured signing keys. Only Ed25519 leaves carry key material; lists and
//! thresholds compose them.

use serde::{Deserialize, Serialize};

/// A 32-byte Ed25519 public key.
pub type Ed25519Key = [u8; 32];

/// A (possibly composite) signing requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A single Ed25519 public key.
    Ed25519(Ed25519Key),
    /// Every member must be active.
    KeyList(Vec<Key>),
    /// At least `threshold` members must be active.
    Threshold { threshold: u32, keys: Vec<Key> },
}

impl Key {
    /// All Ed25519 leaves in depth-first order (duplicates preserved).
    pub fn ed25519_leaves(&self) -> Vec<Ed25519Key> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves(&self, out: &mut Vec<Ed25519Key>) {
        match self {
            Key::Ed25519(bytes) => out.push(*bytes),
            Key::KeyList(keys) | Key::Threshold { keys, .. } => {
                for key in keys {
                    key.collect_leaves(out);
                }
            }
        }
    }

    /// Structural validity: lists are non-empty and thresholds satisfiable.
    pub fn is_valid(&self) -> bool {
        match self {
            Key::Ed25519(_) => true,
            Key::KeyList(keys) => !keys.is_empty() && keys.iter().all(Key::is_valid),
            Key::Threshold { threshold, keys } => {
                *threshold >= 1
                    && (*threshold as usize) <= keys.len()
                    && keys.iter().all(Key::is_valid)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaves_depth_first() {
        let key = Key::KeyList(vec![
            Key::Ed25519([1; 32]),
            Key::Threshold {
                threshold: 1,
                keys: vec![Key::Ed25519([2; 32]), Key::Ed25519([3; 32])],
            },
        ]);
        assert_eq!(key.ed25519_leaves(), vec![[1; 32], [2; 32], [3; 32]]);
    }

    #[test]
    fn test_validity() {
        assert!(Key::Ed25519([0; 32]).is_valid());
        assert!(!Key::KeyList(vec![]).is_valid());
        assert!(!Key::Threshold {
            threshold: 2,
            keys: vec![Key::Ed25519([0; 32])],
        }
        .is_valid());
        assert!(!Key::Threshold {
            threshold: 0,
            keys: vec![Key::Ed25519([0; 32])],
        }
        .is_valid());
    }
}
