//! Listing Producer
//!
//! Lazily yields one [`Entry`] per directory child. Nothing is fetched until
//! the consumer polls; in long mode each child is fetched only when its entry
//! is pulled, so dropping the stream early leaves the rest untouched.

use crate::error::MfsError;
use crate::mfs::path::MfsPath;
use crate::mfs::resolve::{resolve, Resolved};
use crate::store::{load_node, BlockStore};
use crate::tree::node::{DagNode, DirectoryLink, NodeKind};
use crate::types::{hash_to_string, Hash};
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;

/// Entry type as exposed to callers: 0 = file, 1 = directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum EntryType {
    File = 0,
    Directory = 1,
}

impl From<NodeKind> for EntryType {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::File => EntryType::File,
            NodeKind::Directory => EntryType::Directory,
        }
    }
}

impl TryFrom<u8> for EntryType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EntryType::File),
            1 => Ok(EntryType::Directory),
            other => Err(format!("unknown entry type {}", other)),
        }
    }
}

impl Serialize for EntryType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// One listing result
///
/// In short mode `size` is 0 and `hash` is empty even when the child has
/// content; only long mode resolves them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub size: u64,
    pub hash: String,
}

impl Entry {
    fn short(link: DirectoryLink) -> Self {
        Self {
            name: link.name,
            entry_type: link.kind.into(),
            size: 0,
            hash: String::new(),
        }
    }

    fn long(name: String, hash: &Hash, node: &DagNode) -> Self {
        Self {
            name,
            entry_type: node.kind().into(),
            size: node.size(),
            hash: hash_to_string(hash),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    /// Resolve each child's size and hash
    pub long: bool,
}

enum ListState {
    Unresolved {
        store: Arc<dyn BlockStore>,
        root: Hash,
        path: String,
        long: bool,
    },
    Listing {
        store: Arc<dyn BlockStore>,
        links: std::vec::IntoIter<DirectoryLink>,
        long: bool,
    },
    Done,
}

/// Stream the entries of `path` as seen from `root`
///
/// A resolution failure is the sole item of the stream.
pub fn list(
    store: Arc<dyn BlockStore>,
    root: Hash,
    path: &str,
    options: ListOptions,
) -> BoxStream<'static, Result<Entry, MfsError>> {
    let state = ListState::Unresolved {
        store,
        root,
        path: path.to_string(),
        long: options.long,
    };
    stream::unfold(state, next_entry).boxed()
}

async fn next_entry(state: ListState) -> Option<(Result<Entry, MfsError>, ListState)> {
    match state {
        ListState::Done => None,
        ListState::Unresolved {
            store,
            root,
            path,
            long,
        } => {
            let path = match MfsPath::parse(&path) {
                Ok(path) => path,
                Err(e) => return Some((Err(e), ListState::Done)),
            };
            match resolve(store.as_ref(), &root, &path).await {
                Err(e) => Some((Err(e), ListState::Done)),
                Ok(Resolved {
                    node: DagNode::Directory(dir),
                    ..
                }) => next_link(store, dir.into_links().into_iter(), long).await,
                Ok(Resolved { hash, node }) => {
                    // A file lists as itself
                    let name = path.name().unwrap_or_default().to_string();
                    let entry = if long {
                        Entry::long(name, &hash, &node)
                    } else {
                        Entry {
                            name,
                            entry_type: EntryType::File,
                            size: 0,
                            hash: String::new(),
                        }
                    };
                    Some((Ok(entry), ListState::Done))
                }
            }
        }
        ListState::Listing { store, links, long } => next_link(store, links, long).await,
    }
}

async fn next_link(
    store: Arc<dyn BlockStore>,
    mut links: std::vec::IntoIter<DirectoryLink>,
    long: bool,
) -> Option<(Result<Entry, MfsError>, ListState)> {
    let link = links.next()?;
    if !long {
        return Some((
            Ok(Entry::short(link)),
            ListState::Listing { store, links, long },
        ));
    }

    match load_node(store.as_ref(), &link.hash).await {
        Ok(node) => {
            let entry = Entry::long(link.name, &link.hash, &node);
            Some((Ok(entry), ListState::Listing { store, links, long }))
        }
        Err(e) => Some((Err(e.into()), ListState::Done)),
    }
}
