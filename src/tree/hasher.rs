//! Hash computation for encoded blocks

use crate::types::Hash;

/// Compute the content hash of a block
///
/// The hash is a pure function of the encoded bytes, so identical nodes
/// always land under the same key.
pub fn compute_block_hash(bytes: &[u8]) -> Hash {
    *blake3::hash(bytes).as_bytes()
}
