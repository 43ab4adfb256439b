//! Cryptographic Utilities

use sha2::{Digest, Sha256};

/// Compute SHA-256 over several length-prefixed parts
///
/// Length prefixes keep `("ab", "c")` and `("a", "bc")` apart.
pub fn sha256_parts(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part);
    }
    hasher.finalize().into()
}
