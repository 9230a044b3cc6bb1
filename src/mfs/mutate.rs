//! Mutator: copy-on-write updates of the directory chain.
//!
//! Each operation loads the directories from the root down to the parent of
//! the target, edits the parent, then restores every ancestor bottom-up. The
//! result is a new root hash; publishing it is left to the caller, which holds
//! the mutation lock.

use crate::config::ChunkerConfig;
use crate::error::MfsError;
use crate::mfs::path::MfsPath;
use crate::store::{load_node, store_node, BlockStore};
use crate::tree::builder::FileBuilder;
use crate::tree::node::{DagNode, DirectoryLink, DirectoryNode, NodeKind};
use crate::types::Hash;
use tracing::debug;

/// Edit applied to the innermost directory of a chain
enum Edit {
    Insert(DirectoryLink),
    Remove(String),
}

/// Builds new trees from an existing root
pub(crate) struct Mutator<'a> {
    store: &'a dyn BlockStore,
    chunker: &'a ChunkerConfig,
}

impl<'a> Mutator<'a> {
    pub(crate) fn new(store: &'a dyn BlockStore, chunker: &'a ChunkerConfig) -> Self {
        Self { store, chunker }
    }

    /// Create the directory at `path`; returns the new root
    pub(crate) async fn mkdir(
        &self,
        root: &Hash,
        path: &MfsPath,
        parents: bool,
    ) -> Result<Hash, MfsError> {
        let (parent, name) = match path.split_last() {
            Some(split) => split,
            None if parents => return Ok(*root),
            None => return Err(MfsError::AlreadyExists(path.to_string())),
        };

        let chain = self.load_chain(root, &parent, parents).await?;
        if let Some(existing) = chain.last().and_then(|dir| dir.get(name)) {
            return match existing.kind {
                NodeKind::Directory if parents => Ok(*root),
                _ => Err(MfsError::AlreadyExists(path.to_string())),
            };
        }

        let empty = DagNode::Directory(DirectoryNode::new());
        let hash = store_node(self.store, &empty).await?;
        let link = DirectoryLink {
            name: name.to_string(),
            hash,
            kind: NodeKind::Directory,
            size: 0,
        };
        self.rebuild(chain, &parent, Edit::Insert(link)).await
    }

    /// Replace (or create) the file at `path` with `data`; returns the new root
    pub(crate) async fn write(
        &self,
        root: &Hash,
        path: &MfsPath,
        data: &[u8],
        create: bool,
        parents: bool,
    ) -> Result<Hash, MfsError> {
        let (parent, name) = path
            .split_last()
            .ok_or_else(|| MfsError::InvalidArgument("cannot write to /".to_string()))?;

        let chain = self.load_chain(root, &parent, parents).await?;
        match chain.last().and_then(|dir| dir.get(name)) {
            Some(existing) if existing.kind == NodeKind::Directory => {
                return Err(MfsError::InvalidArgument(format!("{} is a directory", path)));
            }
            Some(_) => {}
            None if !create => return Err(MfsError::NotFound(path.to_string())),
            None => {}
        }

        let (hash, size) = FileBuilder::new(self.store, self.chunker).build(data).await?;
        debug!(path = %path, size, "built file dag");
        let link = DirectoryLink {
            name: name.to_string(),
            hash,
            kind: NodeKind::File,
            size,
        };
        self.rebuild(chain, &parent, Edit::Insert(link)).await
    }

    /// Unlink the entry at `path`; returns the new root
    pub(crate) async fn rm(
        &self,
        root: &Hash,
        path: &MfsPath,
        recursive: bool,
    ) -> Result<Hash, MfsError> {
        let (parent, name) = path
            .split_last()
            .ok_or_else(|| MfsError::InvalidArgument("cannot remove /".to_string()))?;

        let chain = self.load_chain(root, &parent, false).await?;
        let existing = chain
            .last()
            .and_then(|dir| dir.get(name))
            .ok_or_else(|| MfsError::NotFound(path.to_string()))?;
        if existing.kind == NodeKind::Directory && !recursive {
            return Err(MfsError::InvalidArgument(format!(
                "{} is a directory, use recursive to remove it",
                path
            )));
        }

        self.rebuild(chain, &parent, Edit::Remove(name.to_string()))
            .await
    }

    /// Load every directory from the root down to `dir_path`
    ///
    /// The result has `segments + 1` entries. Missing directories are created
    /// empty when `create_missing` is set, otherwise they are `NotFound`.
    async fn load_chain(
        &self,
        root: &Hash,
        dir_path: &MfsPath,
        create_missing: bool,
    ) -> Result<Vec<DirectoryNode>, MfsError> {
        let mut chain = Vec::with_capacity(dir_path.segments().len() + 1);
        match load_node(self.store, root).await? {
            DagNode::Directory(dir) => chain.push(dir),
            _ => return Err(MfsError::NotFound("/".to_string())),
        }

        for (depth, segment) in dir_path.segments().iter().enumerate() {
            let child = chain.last().and_then(|dir| dir.get(segment)).cloned();
            let next = match child {
                Some(link) if link.kind == NodeKind::Directory => {
                    match load_node(self.store, &link.hash).await? {
                        DagNode::Directory(dir) => dir,
                        _ => return Err(MfsError::NotFound(dir_path.prefix(depth + 1))),
                    }
                }
                Some(_) => return Err(MfsError::NotFound(dir_path.prefix(depth + 1))),
                None if create_missing => DirectoryNode::new(),
                None => return Err(MfsError::NotFound(dir_path.prefix(depth + 1))),
            };
            chain.push(next);
        }
        Ok(chain)
    }

    /// Apply `edit` to the innermost directory and store every ancestor anew
    async fn rebuild(
        &self,
        mut chain: Vec<DirectoryNode>,
        dir_path: &MfsPath,
        edit: Edit,
    ) -> Result<Hash, MfsError> {
        let mut edit = Some(edit);
        let mut hash = None;

        for depth in (0..chain.len()).rev() {
            let mut dir = chain.pop().ok_or_else(|| {
                MfsError::InvalidArgument("directory chain is empty".to_string())
            })?;
            match edit.take() {
                Some(Edit::Insert(link)) => dir.insert(link),
                Some(Edit::Remove(name)) => {
                    dir.remove(&name);
                }
                None => {}
            }

            let size = dir.cumulative_size();
            let dir_hash = store_node(self.store, &DagNode::Directory(dir)).await?;
            hash = Some(dir_hash);

            if depth > 0 {
                edit = Some(Edit::Insert(DirectoryLink {
                    name: dir_path.segments()[depth - 1].clone(),
                    hash: dir_hash,
                    kind: NodeKind::Directory,
                    size,
                }));
            }
        }

        hash.ok_or_else(|| MfsError::InvalidArgument("directory chain is empty".to_string()))
    }
}
