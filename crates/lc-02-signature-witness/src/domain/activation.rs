//! # Key Activation
//!
//! Decides whether a structured [`Key`] is satisfied by a predicate over its
//! Ed25519 leaves.
//!
//! | Key | Active when |
//! |-----|-------------|
//! | `Ed25519(k)` | predicate holds for `k` |
//! | `KeyList(ks)` | every member is active |
//! | `Threshold { t, ks }` | at least `t` members are active |

use shared_types::{Ed25519Key, Key};

pub fn is_key_active<F>(key: &Key, is_active: &F) -> bool
where
    F: Fn(&Ed25519Key) -> bool,
{
    match key {
        Key::Ed25519(bytes) => is_active(bytes),
        Key::KeyList(keys) => !keys.is_empty() && keys.iter().all(|k| is_key_active(k, is_active)),
        Key::Threshold { threshold, keys } => {
            let needed = (*threshold).max(1) as usize;
            keys.iter()
                .filter(|k| is_key_active(k, is_active))
                .take(needed)
                .count()
                == needed
        }
    }
}

/// True when every key in `keys` is active.
pub fn are_all_active<F>(keys: &[Key], is_active: &F) -> bool
where
    F: Fn(&Ed25519Key) -> bool,
{
    keys.iter().all(|k| is_key_active(k, is_active))
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Ed25519Key = [1; 32];
    const B: Ed25519Key = [2; 32];
    const C: Ed25519Key = [3; 32];

    fn signed_by(keys: &'static [Ed25519Key]) -> impl Fn(&Ed25519Key) -> bool {
        move |k| keys.contains(k)
    }

    #[test]
    fn test_single_key() {
        assert!(is_key_active(&Key::Ed25519(A), &signed_by(&[A])));
        assert!(!is_key_active(&Key::Ed25519(A), &signed_by(&[B])));
    }

    #[test]
    fn test_key_list_requires_all() {
        let list = Key::KeyList(vec![Key::Ed25519(A), Key::Ed25519(B)]);
        assert!(is_key_active(&list, &signed_by(&[A, B])));
        assert!(!is_key_active(&list, &signed_by(&[A])));
        assert!(!is_key_active(&Key::KeyList(vec![]), &signed_by(&[A])));
    }

    #[test]
    fn test_threshold() {
        let two_of_three = Key::Threshold {
            threshold: 2,
            keys: vec![Key::Ed25519(A), Key::Ed25519(B), Key::Ed25519(C)],
        };
        assert!(is_key_active(&two_of_three, &signed_by(&[A, C])));
        assert!(!is_key_active(&two_of_three, &signed_by(&[B])));
    }

    #[test]
    fn test_nested() {
        let nested = Key::KeyList(vec![
            Key::Ed25519(A),
            Key::Threshold {
                threshold: 1,
                keys: vec![Key::Ed25519(B), Key::Ed25519(C)],
            },
        ]);
        assert!(is_key_active(&nested, &signed_by(&[A, C])));
        assert!(!is_key_active(&nested, &signed_by(&[B, C])));
        assert!(are_all_active(&[nested, Key::Ed25519(B)], &signed_by(&[A, B])));
    }
}
