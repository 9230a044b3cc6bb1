//! Read Producer
//!
//! Depth-first walk over a file's links, yielding each leaf payload as one
//! chunk. At most one block is fetched per poll.

use crate::error::MfsError;
use crate::mfs::path::MfsPath;
use crate::mfs::resolve::resolve;
use crate::store::{load_node, BlockStore};
use crate::tree::node::DagNode;
use crate::types::Hash;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;

enum ReadState {
    Unresolved {
        store: Arc<dyn BlockStore>,
        root: Hash,
        path: String,
    },
    Walking {
        store: Arc<dyn BlockStore>,
        /// Pending links, next one on top
        stack: Vec<Hash>,
        path: String,
    },
    Done,
}

/// Stream the content of the file at `path` as seen from `root`
///
/// Chunk boundaries follow the stored leaves. A resolution failure is the
/// sole item of the stream; a failed fetch mid-walk ends it after the chunks
/// already produced.
pub fn read(
    store: Arc<dyn BlockStore>,
    root: Hash,
    path: &str,
) -> BoxStream<'static, Result<Vec<u8>, MfsError>> {
    let state = ReadState::Unresolved {
        store,
        root,
        path: path.to_string(),
    };
    stream::unfold(state, next_chunk).boxed()
}

async fn next_chunk(state: ReadState) -> Option<(Result<Vec<u8>, MfsError>, ReadState)> {
    match state {
        ReadState::Done => None,
        ReadState::Unresolved { store, root, path } => {
            let parsed = match MfsPath::parse(&path) {
                Ok(parsed) => parsed,
                Err(e) => return Some((Err(e), ReadState::Done)),
            };
            match resolve(store.as_ref(), &root, &parsed).await {
                Ok(resolved) => walk(store, Vec::new(), Some(resolved.node), path).await,
                Err(e) => Some((Err(e), ReadState::Done)),
            }
        }
        ReadState::Walking { store, stack, path } => walk(store, stack, None, path).await,
    }
}

/// Advance to the next leaf, starting from `pending` if the caller already
/// holds a decoded node
async fn walk(
    store: Arc<dyn BlockStore>,
    mut stack: Vec<Hash>,
    mut pending: Option<DagNode>,
    path: String,
) -> Option<(Result<Vec<u8>, MfsError>, ReadState)> {
    loop {
        let node = match pending.take() {
            Some(node) => node,
            None => {
                let hash = stack.pop()?;
                match load_node(store.as_ref(), &hash).await {
                    Ok(node) => node,
                    Err(e) => return Some((Err(e.into()), ReadState::Done)),
                }
            }
        };

        match node {
            DagNode::Leaf(data) => {
                return Some((Ok(data), ReadState::Walking { store, stack, path }));
            }
            DagNode::File(file) => {
                stack.extend(file.links.iter().rev().map(|link| link.hash));
            }
            DagNode::Directory(_) => {
                return Some((
                    Err(MfsError::InvalidArgument(format!("{} is not a file", path))),
                    ReadState::Done,
                ));
            }
        }
    }
}
