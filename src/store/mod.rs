//! Block Store
//!
//! Content-addressed storage of immutable blocks. Blocks are keyed by the
//! BLAKE3 hash of their bytes and never rewritten in place.

pub mod persistence;

use crate::error::StorageError;
use crate::tree::hasher::compute_block_hash;
use crate::tree::node::DagNode;
use crate::types::{hash_to_string, Hash};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

pub use persistence::SledBlockStore;

/// Block store interface
#[async_trait]
pub trait BlockStore: Send + Sync {
    async fn get(&self, hash: &Hash) -> Result<Option<Vec<u8>>, StorageError>;
    async fn put(&self, bytes: Vec<u8>) -> Result<Hash, StorageError>;
    async fn has(&self, hash: &Hash) -> Result<bool, StorageError> {
        Ok(self.get(hash).await?.is_some())
    }
}

/// Fetch and decode the node stored under `hash`
pub async fn load_node(store: &dyn BlockStore, hash: &Hash) -> Result<DagNode, StorageError> {
    let bytes = store
        .get(hash)
        .await?
        .ok_or_else(|| StorageError::BlockNotFound(hash_to_string(hash)))?;
    DagNode::decode(hash, &bytes)
}

/// Encode and store a node, returning its hash
pub async fn store_node(store: &dyn BlockStore, node: &DagNode) -> Result<Hash, StorageError> {
    store.put(node.encode()?).await
}

/// In-memory block store
#[derive(Default)]
pub struct MemoryBlockStore {
    blocks: RwLock<HashMap<Hash, Vec<u8>>>,
}

impl MemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }
}

#[async_trait]
impl BlockStore for MemoryBlockStore {
    async fn get(&self, hash: &Hash) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.blocks.read().get(hash).cloned())
    }

    async fn put(&self, bytes: Vec<u8>) -> Result<Hash, StorageError> {
        let hash = compute_block_hash(&bytes);
        self.blocks.write().entry(hash).or_insert(bytes);
        Ok(hash)
    }

    async fn has(&self, hash: &Hash) -> Result<bool, StorageError> {
        Ok(self.blocks.read().contains_key(hash))
    }
}
