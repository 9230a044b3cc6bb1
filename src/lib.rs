//! MFS: Mutable File System over a content-addressed DAG
//!
//! A path-addressed directory tree whose nodes are immutable, hashed blocks.
//! Mutations rebuild the affected chain copy-on-write and swap a single root
//! pointer; listings and reads are lazy streams over immutable blocks.

pub mod concurrency;
pub mod config;
pub mod error;
pub mod heads;
pub mod logging;
pub mod mfs;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;

pub use error::{MfsError, StorageError};
pub use mfs::{Entry, EntryType, ListOptions, Mfs, MkdirOptions, RmOptions, Stat, WriteOptions};
