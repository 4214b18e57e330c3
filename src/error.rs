//! Error types for config loading and caching.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by loading, parsing, and caching configuration.
///
/// Every failure mode is a distinct variant so callers can tell a missing
/// root file apart from a malformed import or a corrupt cache entry.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The root config file does not exist. Raised at loader construction,
    /// before any parsing or cache interaction.
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// A file in the import graph (root or imported) could not be read or
    /// parsed. Aborts the whole load; no partial tree is produced.
    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// The cache blob for a source file could not be decoded.
    #[error("corrupt cache entry {path}: {reason}")]
    CacheCorrupt { path: PathBuf, reason: String },

    /// The import queue did not drain within the document limit. The import
    /// graph is unvalidated, so a cycle shows up as a queue that never
    /// empties rather than as a distinguishable graph error.
    #[error("import limit exceeded: more than {limit} documents processed (import cycle?)")]
    ImportLimit { limit: usize },

    /// I/O failure while persisting or removing a cache entry.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ConfigError {
    pub(crate) fn parse(path: &Path, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for config operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
