//! Path Resolver: walk a root hash down a path.

use crate::error::MfsError;
use crate::mfs::path::MfsPath;
use crate::store::{load_node, BlockStore};
use crate::tree::node::DagNode;
use crate::types::Hash;
use tracing::debug;

/// Node found at a path
#[derive(Debug, Clone)]
pub struct Resolved {
    pub hash: Hash,
    pub node: DagNode,
}

/// Resolve `path` against the directory stored under `root`
///
/// Fails with `NotFound` naming the first missing prefix, including when an
/// intermediate segment is a file.
pub async fn resolve(
    store: &dyn BlockStore,
    root: &Hash,
    path: &MfsPath,
) -> Result<Resolved, MfsError> {
    let mut hash = *root;
    let mut node = load_node(store, &hash).await?;

    for (depth, segment) in path.segments().iter().enumerate() {
        let dir = match &node {
            DagNode::Directory(dir) => dir,
            _ => return Err(MfsError::NotFound(path.prefix(depth + 1))),
        };
        let link = dir
            .get(segment)
            .ok_or_else(|| MfsError::NotFound(path.prefix(depth + 1)))?;
        hash = link.hash;
        node = load_node(store, &hash).await?;
    }

    debug!(path = %path, "resolved path");
    Ok(Resolved { hash, node })
}
