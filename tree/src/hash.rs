//! Root values and the two-input compression seam.

use sha2::{Digest, Sha256};

/// A 32-byte Merkle root or leaf value.
pub type Root = [u8; 32];

/// Two-input 32-byte compression function driving Merkleization.
///
/// Determinism is the only contract. The protocol's designated hash is
/// [`sha256_merge`]; [`blake3_merge`] is provided as an alternative for
/// callers that bring their own pairing rules.
pub type HashFn = fn(&Root, &Root) -> Root;

/// SHA-256 of the 64-byte concatenation `left || right`.
pub fn sha256_merge(left: &Root, right: &Root) -> Root {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Blake3 of the 64-byte concatenation `left || right`.
pub fn blake3_merge(left: &Root, right: &Root) -> Root {
    let mut input = [0u8; 64];
    input[..32].copy_from_slice(left);
    input[32..].copy_from_slice(right);
    *blake3::hash(&input).as_bytes()
}
