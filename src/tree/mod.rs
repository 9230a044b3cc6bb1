//! Content-addressed DAG: node codec, hashing, and file construction.

pub mod builder;
pub mod hasher;
pub mod node;

pub use builder::FileBuilder;
pub use node::{DagNode, DirectoryLink, DirectoryNode, FileLink, FileNode, NodeKind};
