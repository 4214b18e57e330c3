//! xmlconf CLI
//!
//! Loads an XML config file (applying the disk cache) and prints looked-up
//! values, dumps the merged tree, or clears the cache entry.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use xmlconf::cache::CacheStore;
use xmlconf::cli::{Cli, ClearArgs, Command, DumpArgs, GetArgs};
use xmlconf::config::{ConfigLoader, ConfigValue};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise -v selects debug over the info default.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Get(args) => get(args, cli.cache_dir, cli.no_cache),
        Command::Dump(args) => dump(args, cli.cache_dir, cli.no_cache),
        Command::Clear(args) => clear(args, cli.cache_dir),
    }
}

fn build_loader(
    file: PathBuf,
    cache_dir: Option<PathBuf>,
    no_cache: bool,
) -> Result<ConfigLoader> {
    let loader = match cache_dir {
        Some(dir) => ConfigLoader::with_cache_dir(file, dir)?,
        None => ConfigLoader::new(file)?,
    };
    Ok(loader.cache_enabled(!no_cache))
}

fn get(args: GetArgs, cache_dir: Option<PathBuf>, no_cache: bool) -> Result<()> {
    let tree = build_loader(args.file, cache_dir, no_cache)?.load()?;

    let mut missing = false;
    for path in &args.paths {
        match tree.get(path) {
            Some(value) => println!("{}", render(value)?),
            None => {
                println!("null");
                missing = true;
            }
        }
    }
    if missing {
        std::process::exit(1);
    }
    Ok(())
}

fn dump(args: DumpArgs, cache_dir: Option<PathBuf>, no_cache: bool) -> Result<()> {
    let tree = build_loader(args.file, cache_dir, no_cache)?.load()?;
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}

fn clear(args: ClearArgs, cache_dir: Option<PathBuf>) -> Result<()> {
    let store = match cache_dir {
        Some(dir) => CacheStore::with_dir(&args.file, dir),
        None => CacheStore::new(&args.file),
    };
    if store.remove()? {
        println!("removed {}", store.cache_path().display());
    } else {
        println!("no cache entry for {}", args.file.display());
    }
    Ok(())
}

/// Scalars print raw; lists and groups print as JSON.
fn render(value: &ConfigValue) -> Result<String> {
    Ok(match value {
        ConfigValue::Scalar(s) => s.clone(),
        other => serde_json::to_string(other)?,
    })
}
