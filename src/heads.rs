//! Root Pointer
//!
//! The single mutable cell of the filesystem: the hash of the directory
//! currently mounted at "/". Everything it points at is immutable.

use crate::error::StorageError;
use crate::types::Hash;
use parking_lot::RwLock;
use std::sync::Arc;

/// Persistence for the root pointer
pub trait RootStore: Send + Sync {
    fn load_root(&self) -> Result<Option<Hash>, StorageError>;
    fn save_root(&self, root: &Hash) -> Result<(), StorageError>;
}

/// Root store that lives only as long as the process
#[derive(Default)]
pub struct MemoryRootStore {
    root: RwLock<Option<Hash>>,
}

impl MemoryRootStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RootStore for MemoryRootStore {
    fn load_root(&self) -> Result<Option<Hash>, StorageError> {
        Ok(*self.root.read())
    }

    fn save_root(&self, root: &Hash) -> Result<(), StorageError> {
        *self.root.write() = Some(*root);
        Ok(())
    }
}

/// Cached root pointer backed by a [`RootStore`]
///
/// Readers take the current value without blocking on mutations; writers are
/// expected to hold the mutation lock around read-modify-`swap`.
pub struct RootPointer {
    current: RwLock<Hash>,
    backend: Arc<dyn RootStore>,
}

impl RootPointer {
    /// Load the persisted root, or persist `initial` if none exists yet
    pub fn load_or_init(backend: Arc<dyn RootStore>, initial: Hash) -> Result<Self, StorageError> {
        let root = match backend.load_root()? {
            Some(root) => root,
            None => {
                backend.save_root(&initial)?;
                initial
            }
        };
        Ok(Self {
            current: RwLock::new(root),
            backend,
        })
    }

    pub fn current(&self) -> Hash {
        *self.current.read()
    }

    /// Persist and publish a new root; on failure the old root stays visible
    pub fn swap(&self, root: Hash) -> Result<Hash, StorageError> {
        self.backend.save_root(&root)?;
        let mut current = self.current.write();
        Ok(std::mem::replace(&mut *current, root))
    }
}
