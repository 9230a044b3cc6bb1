//! DAG node types and their block encoding

use crate::error::StorageError;
use crate::types::{hash_to_string, Hash};
use serde::{Deserialize, Serialize};

/// Link from a file node to a chunk (leaf or nested file node)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLink {
    pub hash: Hash,
    /// Cumulative content size of the linked subtree
    pub size: u64,
}

/// Chunked file: ordered links whose leaves concatenate to the content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub links: Vec<FileLink>,
}

impl FileNode {
    pub fn size(&self) -> u64 {
        self.links.iter().map(|link| link.size).sum()
    }
}

/// Named link inside a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryLink {
    pub name: String,
    pub hash: Hash,
    /// Kind of the child, recorded so listings need not fetch it
    pub kind: NodeKind,
    /// Cached cumulative content size of the child
    pub size: u64,
}

/// Directory node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
    links: Vec<DirectoryLink>, // sorted by name, names unique
}

impl DirectoryNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links in name order
    pub fn links(&self) -> &[DirectoryLink] {
        &self.links
    }

    pub fn into_links(self) -> Vec<DirectoryLink> {
        self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&DirectoryLink> {
        self.links
            .binary_search_by(|link| link.name.as_str().cmp(name))
            .ok()
            .map(|idx| &self.links[idx])
    }

    /// Insert a link, replacing any existing link with the same name
    pub fn insert(&mut self, link: DirectoryLink) {
        match self
            .links
            .binary_search_by(|existing| existing.name.as_str().cmp(&link.name))
        {
            Ok(idx) => self.links[idx] = link,
            Err(idx) => self.links.insert(idx, link),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<DirectoryLink> {
        self.links
            .binary_search_by(|link| link.name.as_str().cmp(name))
            .ok()
            .map(|idx| self.links.remove(idx))
    }

    /// Cumulative content size of everything below this directory
    pub fn cumulative_size(&self) -> u64 {
        self.links.iter().map(|link| link.size).sum()
    }
}

/// Decoded view of a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DagNode {
    Leaf(Vec<u8>),
    File(FileNode),
    Directory(DirectoryNode),
}

/// Node kind as reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Directory,
}

impl DagNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            DagNode::Leaf(_) | DagNode::File(_) => NodeKind::File,
            DagNode::Directory(_) => NodeKind::Directory,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, DagNode::Directory(_))
    }

    /// Content size: payload length for leaves, sum of links for files, 0 for directories
    pub fn size(&self) -> u64 {
        match self {
            DagNode::Leaf(data) => data.len() as u64,
            DagNode::File(file) => file.size(),
            DagNode::Directory(_) => 0,
        }
    }

    /// Size cached in a parent's link to this node
    pub fn cumulative_size(&self) -> u64 {
        match self {
            DagNode::Directory(dir) => dir.cumulative_size(),
            other => other.size(),
        }
    }

    /// Number of outgoing links
    pub fn link_count(&self) -> usize {
        match self {
            DagNode::Leaf(_) => 0,
            DagNode::File(file) => file.links.len(),
            DagNode::Directory(dir) => dir.len(),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, StorageError> {
        bincode::serialize(self).map_err(|e| StorageError::EncodeError(e.to_string()))
    }

    pub fn decode(hash: &Hash, bytes: &[u8]) -> Result<Self, StorageError> {
        bincode::deserialize(bytes).map_err(|e| StorageError::CorruptBlock {
            hash: hash_to_string(hash),
            reason: e.to_string(),
        })
    }
}
