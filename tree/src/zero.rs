//! Canonical roots of all-zero subtrees.

use std::sync::LazyLock;

use crate::hash::{sha256_merge, Root};

/// Deepest subtree the zero table covers. A `u64` target cannot address
/// positions below this depth anyway.
pub const MAX_DEPTH: u8 = 64;

/// `ZERO_HASHES[d]` is the root of an all-zero subtree of depth `d`:
/// `ZERO_HASHES[0] = [0; 32]` and
/// `ZERO_HASHES[d] = H(ZERO_HASHES[d-1], ZERO_HASHES[d-1])`.
///
/// Computed once with the canonical SHA-256 merge, shared by reference,
/// never mutated afterwards.
static ZERO_HASHES: LazyLock<[Root; MAX_DEPTH as usize + 1]> = LazyLock::new(|| {
    let mut table = [[0u8; 32]; MAX_DEPTH as usize + 1];
    for d in 1..=MAX_DEPTH as usize {
        table[d] = sha256_merge(&table[d - 1], &table[d - 1]);
    }
    table
});

/// Root of an all-zero subtree of `depth`.
///
/// Panics if `depth` exceeds [`MAX_DEPTH`]; that is an addressing bug in
/// the caller, not a recoverable condition.
pub fn zero_root(depth: u8) -> Root {
    assert!(
        depth <= MAX_DEPTH,
        "zero subtree depth {} exceeds maximum {}",
        depth,
        MAX_DEPTH
    );
    ZERO_HASHES[depth as usize]
}
