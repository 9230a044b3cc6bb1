//! Core types for the mutable filesystem.

use crate::error::StorageError;

/// Hash: BLAKE3 digest of an encoded block, used as the block store key
pub type Hash = [u8; 32];

/// Render a hash in its external textual form (lowercase hex)
pub fn hash_to_string(hash: &Hash) -> String {
    hex::encode(hash)
}

/// Parse the external textual form of a hash
pub fn parse_hash(text: &str) -> Result<Hash, StorageError> {
    let bytes = hex::decode(text)
        .map_err(|e| StorageError::InvalidHash(format!("{}: {}", text, e)))?;
    bytes
        .try_into()
        .map_err(|_| StorageError::InvalidHash(format!("{}: expected 32 bytes", text)))
}
