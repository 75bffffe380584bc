//! # Prefix Expansion
//!
//! Attributes each signature pair to the required Ed25519 keys its public-key
//! prefix matches. A pair with a short prefix can match several keys; at most
//! one of those expansions will verify.
//!
//! A required key matched by two different pairs is ambiguous and fails the
//! whole map with `KEY_PREFIX_MISMATCH`.

use shared_types::{Ed25519Key, ResponseCode, SignatureMap};

/// A required key paired with the signature bytes claimed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedSig<'a> {
    pub key: Ed25519Key,
    pub signature: &'a [u8],
}

/// Expands `sig_map` against the distinct keys in `required`, in
/// required-key order. Keys with no matching pair are skipped.
pub fn expand<'a>(
    sig_map: &'a SignatureMap,
    required: &[Ed25519Key],
) -> Result<Vec<ExpandedSig<'a>>, ResponseCode> {
    let mut distinct: Vec<Ed25519Key> = Vec::with_capacity(required.len());
    for key in required {
        if !distinct.contains(key) {
            distinct.push(*key);
        }
    }

    let mut expanded = Vec::new();
    for key in distinct {
        let mut matches = sig_map
            .pairs
            .iter()
            .filter(|pair| key.starts_with(&pair.pub_key_prefix));
        if let Some(pair) = matches.next() {
            if matches.next().is_some() {
                return Err(ResponseCode::KeyPrefixMismatch);
            }
            expanded.push(ExpandedSig {
                key,
                signature: &pair.signature,
            });
        }
    }
    Ok(expanded)
}
