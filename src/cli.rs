//! CLI command definitions for xmlconf.
//!
//! The `Cli` struct carries the global flags; each subcommand has its own
//! args struct.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// XML configuration loader with import resolution and disk caching
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory for cache files (default: current directory)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Bypass the cache for this run (no read, no write)
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a config file and print the value at each path
    Get(GetArgs),

    /// Load a config file and print the merged tree as JSON
    Dump(DumpArgs),

    /// Remove the cache entry for a config file
    Clear(ClearArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Root XML config file
    pub file: PathBuf,

    /// Slash-delimited lookup paths (e.g. thumbnail/width)
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Root XML config file
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Root XML config file whose cache entry should be removed
    pub file: PathBuf,
}
