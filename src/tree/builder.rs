//! File DAG construction
//!
//! Splits content into fixed-size leaves and, when there is more than one,
//! stacks File nodes of at most `max_links` links until a single node remains.

use crate::config::ChunkerConfig;
use crate::error::StorageError;
use crate::store::{store_node, BlockStore};
use crate::tree::node::{DagNode, FileLink, FileNode};
use crate::types::Hash;

/// Builds file DAGs bottom-up into a block store
pub struct FileBuilder<'a> {
    store: &'a dyn BlockStore,
    chunk_size: usize,
    max_links: usize,
}

impl<'a> FileBuilder<'a> {
    pub fn new(store: &'a dyn BlockStore, chunker: &ChunkerConfig) -> Self {
        Self {
            store,
            chunk_size: chunker.chunk_size.max(1),
            max_links: chunker.max_links.max(2),
        }
    }

    /// Store `data` and return the root hash and content size of the file
    pub async fn build(&self, data: &[u8]) -> Result<(Hash, u64), StorageError> {
        let mut links = Vec::with_capacity(data.len() / self.chunk_size + 1);
        if data.is_empty() {
            links.push(self.put_leaf(&[]).await?);
        }
        for chunk in data.chunks(self.chunk_size) {
            links.push(self.put_leaf(chunk).await?);
        }

        if links.len() == 1 {
            let leaf = &links[0];
            return Ok((leaf.hash, leaf.size));
        }

        while links.len() > self.max_links {
            let mut parents = Vec::with_capacity(links.len() / self.max_links + 1);
            for group in links.chunks(self.max_links) {
                parents.push(self.put_file(group.to_vec()).await?);
            }
            links = parents;
        }

        let root = self.put_file(links).await?;
        Ok((root.hash, root.size))
    }

    async fn put_leaf(&self, chunk: &[u8]) -> Result<FileLink, StorageError> {
        let hash = store_node(self.store, &DagNode::Leaf(chunk.to_vec())).await?;
        Ok(FileLink {
            hash,
            size: chunk.len() as u64,
        })
    }

    async fn put_file(&self, links: Vec<FileLink>) -> Result<FileLink, StorageError> {
        let node = FileNode { links };
        let size = node.size();
        let hash = store_node(self.store, &DagNode::File(node)).await?;
        Ok(FileLink { hash, size })
    }
}
