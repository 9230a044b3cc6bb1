//! Tooling & Integration Layer
//!
//! Command-line access to the filesystem operations.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
