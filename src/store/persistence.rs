//! Sled-backed persistence for blocks and the root pointer.

use crate::error::StorageError;
use crate::heads::RootStore;
use crate::store::BlockStore;
use crate::tree::hasher::compute_block_hash;
use crate::types::Hash;
use async_trait::async_trait;
use std::path::Path;

const BLOCKS_TREE: &str = "blocks";
const META_TREE: &str = "meta";
const ROOT_KEY: &[u8] = b"root";

/// Block store persisted in a sled database
///
/// Blocks live in the `blocks` tree; the root pointer lives in `meta`.
#[derive(Clone)]
pub struct SledBlockStore {
    db: sled::Db,
    blocks: sled::Tree,
    meta: sled::Tree,
}

impl SledBlockStore {
    /// Open (or create) a store at `path`
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path)?;
        Self::from_db(sled::open(path)?)
    }

    pub fn from_db(db: sled::Db) -> Result<Self, StorageError> {
        let blocks = db.open_tree(BLOCKS_TREE)?;
        let meta = db.open_tree(META_TREE)?;
        Ok(Self { db, blocks, meta })
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

#[async_trait]
impl BlockStore for SledBlockStore {
    async fn get(&self, hash: &Hash) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.blocks.get(hash)?.map(|value| value.to_vec()))
    }

    async fn put(&self, bytes: Vec<u8>) -> Result<Hash, StorageError> {
        let hash = compute_block_hash(&bytes);
        if !self.blocks.contains_key(hash)? {
            self.blocks.insert(hash, bytes)?;
        }
        Ok(hash)
    }

    async fn has(&self, hash: &Hash) -> Result<bool, StorageError> {
        Ok(self.blocks.contains_key(hash)?)
    }
}

impl RootStore for SledBlockStore {
    fn load_root(&self) -> Result<Option<Hash>, StorageError> {
        match self.meta.get(ROOT_KEY)? {
            Some(value) => {
                let hash = Hash::try_from(&value[..]).map_err(|_| {
                    StorageError::InvalidHash(format!(
                        "stored root pointer has {} bytes",
                        value.len()
                    ))
                })?;
                Ok(Some(hash))
            }
            None => Ok(None),
        }
    }

    fn save_root(&self, root: &Hash) -> Result<(), StorageError> {
        self.meta.insert(ROOT_KEY, root.as_slice())?;
        self.meta.flush()?;
        Ok(())
    }
}
