//! MFS CLI Binary
//!
//! Command-line interface for the mutable filesystem.

use anyhow::Context;
use clap::Parser;
use mfs::config::ConfigLoader;
use mfs::logging::init_logging;
use mfs::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ConfigLoader::load().context("loading config")?,
    };
    cli.apply_overrides(&mut config);
    init_logging(Some(&config.logging))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;

    runtime.block_on(async {
        let context = CliContext::new(&config).await?;
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        context.execute(&cli.command, &mut out).await?;
        Ok::<(), anyhow::Error>(())
    })
}
