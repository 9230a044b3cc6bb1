//! Mutable File System
//!
//! Path-based view over the content-addressed DAG. Reads snapshot the root
//! pointer and stream from immutable blocks; mutations build new blocks,
//! then swap the root pointer while holding the mutation lock.

pub mod ls;
mod mutate;
pub mod path;
pub mod read;
pub mod resolve;

use crate::concurrency::MutationLock;
use crate::config::ChunkerConfig;
use crate::error::MfsError;
use crate::heads::{RootPointer, RootStore};
use crate::store::{store_node, BlockStore};
use crate::tree::node::{DagNode, DirectoryNode, NodeKind};
use crate::types::{hash_to_string, Hash};
use futures::stream::BoxStream;
use mutate::Mutator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

pub use ls::{Entry, EntryType, ListOptions};
pub use path::MfsPath;
pub use resolve::{resolve, Resolved};

#[derive(Debug, Clone, Copy, Default)]
pub struct MkdirOptions {
    /// Create missing intermediate directories; an existing directory is not an error
    pub parents: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Create the file if it does not exist
    pub create: bool,
    /// Create missing intermediate directories
    pub parents: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RmOptions {
    /// Allow removing directories
    pub recursive: bool,
}

/// Result of `stat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub hash: String,
    /// Content size; 0 for directories
    pub size: u64,
    /// Content size of the whole subtree
    pub cumulative_size: u64,
    /// Number of outgoing links
    pub blocks: usize,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
}

/// A mounted mutable filesystem
pub struct Mfs {
    store: Arc<dyn BlockStore>,
    root: RootPointer,
    lock: MutationLock,
    chunker: ChunkerConfig,
}

impl Mfs {
    /// Open the filesystem, initializing an empty root directory on first use
    pub async fn open(
        store: Arc<dyn BlockStore>,
        roots: Arc<dyn RootStore>,
        chunker: ChunkerConfig,
    ) -> Result<Self, MfsError> {
        chunker.validate()?;
        let empty = store_node(store.as_ref(), &DagNode::Directory(DirectoryNode::new())).await?;
        let root = RootPointer::load_or_init(roots, empty)?;
        info!(root = %hash_to_string(&root.current()), "opened mfs");
        Ok(Self {
            store,
            root,
            lock: MutationLock::new(),
            chunker,
        })
    }

    /// Current root pointer
    pub fn root(&self) -> Hash {
        self.root.current()
    }

    /// Current root pointer in its external textual form
    pub fn root_hash(&self) -> String {
        hash_to_string(&self.root.current())
    }

    pub fn store(&self) -> Arc<dyn BlockStore> {
        Arc::clone(&self.store)
    }

    #[instrument(skip(self), err)]
    pub async fn mkdir(&self, path: &str, options: MkdirOptions) -> Result<(), MfsError> {
        let path = MfsPath::parse(path)?;
        let _guard = self.lock.acquire().await;
        let root = self.root.current();
        let new_root = Mutator::new(self.store.as_ref(), &self.chunker)
            .mkdir(&root, &path, options.parents)
            .await?;
        self.commit(root, new_root, "mkdir", &path)
    }

    #[instrument(skip(self, data), fields(bytes = data.len()), err)]
    pub async fn write(
        &self,
        path: &str,
        data: &[u8],
        options: WriteOptions,
    ) -> Result<(), MfsError> {
        let path = MfsPath::parse(path)?;
        let _guard = self.lock.acquire().await;
        let root = self.root.current();
        let new_root = Mutator::new(self.store.as_ref(), &self.chunker)
            .write(&root, &path, data, options.create, options.parents)
            .await?;
        self.commit(root, new_root, "write", &path)
    }

    #[instrument(skip(self), err)]
    pub async fn rm(&self, path: &str, options: RmOptions) -> Result<(), MfsError> {
        let path = MfsPath::parse(path)?;
        let _guard = self.lock.acquire().await;
        let root = self.root.current();
        let new_root = Mutator::new(self.store.as_ref(), &self.chunker)
            .rm(&root, &path, options.recursive)
            .await?;
        self.commit(root, new_root, "rm", &path)
    }

    /// Lazily list `path`; errors arrive as the stream's only item
    pub fn ls(&self, path: &str, options: ListOptions) -> BoxStream<'static, Result<Entry, MfsError>> {
        ls::list(self.store(), self.root.current(), path, options)
    }

    /// Lazily read the file at `path`; errors arrive as the stream's only item
    pub fn read(&self, path: &str) -> BoxStream<'static, Result<Vec<u8>, MfsError>> {
        read::read(self.store(), self.root.current(), path)
    }

    pub async fn stat(&self, path: &str) -> Result<Stat, MfsError> {
        let path = MfsPath::parse(path)?;
        let Resolved { hash, node } = resolve(self.store.as_ref(), &self.root.current(), &path).await?;
        Ok(Stat {
            hash: hash_to_string(&hash),
            size: node.size(),
            cumulative_size: node.cumulative_size(),
            blocks: node.link_count(),
            entry_type: node.kind().into(),
        })
    }

    /// Kind of the node at `path`
    pub async fn kind(&self, path: &str) -> Result<NodeKind, MfsError> {
        let path = MfsPath::parse(path)?;
        let resolved = resolve(self.store.as_ref(), &self.root.current(), &path).await?;
        Ok(resolved.node.kind())
    }

    fn commit(&self, old: Hash, new: Hash, op: &str, path: &MfsPath) -> Result<(), MfsError> {
        if old == new {
            return Ok(());
        }
        self.root.swap(new)?;
        info!(
            op,
            path = %path,
            root = %hash_to_string(&new),
            "committed mutation"
        );
        Ok(())
    }
}
