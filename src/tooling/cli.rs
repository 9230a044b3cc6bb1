//! CLI Tooling
//!
//! Command-line front end for the MFS operations. Every command runs against
//! the configured block store and root pointer.

use crate::config::{MfsConfig, StorageBackend};
use crate::error::{MfsError, StorageError};
use crate::heads::MemoryRootStore;
use crate::mfs::{Entry, EntryType, ListOptions, Mfs, MkdirOptions, RmOptions, WriteOptions};
use crate::store::{MemoryBlockStore, SledBlockStore};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use futures::TryStreamExt;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// MFS CLI - Mutable filesystem over a content-addressed block DAG
#[derive(Parser)]
#[command(name = "mfs")]
#[command(about = "Mutable filesystem over a content-addressed block DAG")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Block store directory (overrides storage.path)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a directory
    Mkdir {
        path: String,
        /// Create missing parent directories
        #[arg(short, long)]
        parents: bool,
    },
    /// Write a file from --input or stdin, replacing existing content
    Write {
        path: String,
        /// Read content from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
        /// Create the file if it does not exist
        #[arg(short = 'e', long)]
        create: bool,
        /// Create missing parent directories
        #[arg(short, long)]
        parents: bool,
    },
    /// List a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
        /// Resolve size and hash of every entry
        #[arg(short, long)]
        long: bool,
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Write file content to stdout
    Read { path: String },
    /// Show hash, size, and type of a path
    Stat {
        path: String,
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Remove a file or directory
    Rm {
        path: String,
        /// Remove directories
        #[arg(short, long)]
        recursive: bool,
    },
    /// Print the current root hash
    Root,
}

impl Cli {
    /// Fold command-line overrides into loaded configuration
    pub fn apply_overrides(&self, config: &mut MfsConfig) {
        if let Some(store) = &self.store {
            config.storage.path = Some(store.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
    }
}

/// CLI context holding the mounted filesystem
pub struct CliContext {
    mfs: Mfs,
}

impl CliContext {
    /// Open the store described by `config`
    pub async fn new(config: &MfsConfig) -> Result<Self, MfsError> {
        let mfs = match config.storage.backend {
            StorageBackend::Memory => {
                Mfs::open(
                    Arc::new(MemoryBlockStore::new()),
                    Arc::new(MemoryRootStore::new()),
                    config.chunker.clone(),
                )
                .await?
            }
            StorageBackend::Sled => {
                let path = config.storage.resolve_path()?;
                let store = Arc::new(SledBlockStore::open(&path)?);
                info!(path = %path.display(), "opened sled block store");
                Mfs::open(store.clone(), store, config.chunker.clone()).await?
            }
        };
        Ok(Self { mfs })
    }

    pub fn from_mfs(mfs: Mfs) -> Self {
        Self { mfs }
    }

    pub fn mfs(&self) -> &Mfs {
        &self.mfs
    }

    /// Run one command, writing its output to `out`
    pub async fn execute(&self, command: &Commands, out: &mut dyn Write) -> Result<(), MfsError> {
        match command {
            Commands::Mkdir { path, parents } => {
                self.mfs
                    .mkdir(path, MkdirOptions { parents: *parents })
                    .await
            }
            Commands::Write {
                path,
                input,
                create,
                parents,
            } => {
                let data = match input {
                    Some(file) => std::fs::read(file).map_err(StorageError::from)?,
                    None => {
                        let mut data = Vec::new();
                        std::io::stdin()
                            .read_to_end(&mut data)
                            .map_err(StorageError::from)?;
                        data
                    }
                };
                self.mfs
                    .write(
                        path,
                        &data,
                        WriteOptions {
                            create: *create,
                            parents: *parents,
                        },
                    )
                    .await
            }
            Commands::Ls { path, long, format } => {
                let entries: Vec<Entry> = self
                    .mfs
                    .ls(path, ListOptions { long: *long })
                    .try_collect()
                    .await?;
                let text = match format.as_str() {
                    "json" => to_json(&entries)?,
                    _ => format_entries_text(&entries, *long),
                };
                emit(out, text.as_bytes())
            }
            Commands::Read { path } => {
                let mut chunks = self.mfs.read(path);
                while let Some(chunk) = chunks.try_next().await? {
                    out.write_all(&chunk).map_err(StorageError::from)?;
                }
                out.flush().map_err(StorageError::from)?;
                Ok(())
            }
            Commands::Stat { path, format } => {
                let stat = self.mfs.stat(path).await?;
                let text = match format.as_str() {
                    "json" => to_json(&stat)?,
                    _ => format!(
                        "{}\nSize: {}\nCumulativeSize: {}\nChildBlocks: {}\nType: {}\n",
                        stat.hash,
                        stat.size,
                        stat.cumulative_size,
                        stat.blocks,
                        type_label(stat.entry_type)
                    ),
                };
                emit(out, text.as_bytes())
            }
            Commands::Rm { path, recursive } => {
                self.mfs
                    .rm(
                        path,
                        RmOptions {
                            recursive: *recursive,
                        },
                    )
                    .await
            }
            Commands::Root => emit(out, format!("{}\n", self.mfs.root_hash()).as_bytes()),
        }
    }
}

fn emit(out: &mut dyn Write, bytes: &[u8]) -> Result<(), MfsError> {
    out.write_all(bytes).map_err(StorageError::from)?;
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, MfsError> {
    serde_json::to_string_pretty(value)
        .map(|mut text| {
            text.push('\n');
            text
        })
        .map_err(|e| MfsError::ConfigError(format!("Failed to serialize JSON: {}", e)))
}

fn type_label(entry_type: EntryType) -> &'static str {
    match entry_type {
        EntryType::File => "file",
        EntryType::Directory => "directory",
    }
}

/// Plain names in short mode, a table in long mode
pub fn format_entries_text(entries: &[Entry], long: bool) -> String {
    if !long {
        return entries
            .iter()
            .map(|entry| format!("{}\n", entry.name))
            .collect();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Type", "Size", "Hash"]);
    for entry in entries {
        table.add_row(vec![
            entry.name.clone(),
            type_label(entry.entry_type).to_string(),
            entry.size.to_string(),
            entry.hash.clone(),
        ]);
    }
    format!("{}\n", table)
}
