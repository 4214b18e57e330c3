//! Disk cache for merged config trees.
//!
//! One entry per source file, named by a stable hash of the source *path*
//! (not its content): `<sha256-hex>.cache` in the cache directory. The blob
//! is the serde_json serialization of the tree and round-trips exactly.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::ConfigTree;
use crate::error::{ConfigError, ConfigResult};

/// Opaque persistence of a [`ConfigTree`] keyed by one source file's path.
#[derive(Debug, Clone)]
pub struct CacheStore {
    source: PathBuf,
    cache_path: PathBuf,
}

impl CacheStore {
    /// Cache entry for `source`, stored in the current working directory.
    pub fn new(source: &Path) -> Self {
        Self::with_dir(source, PathBuf::new())
    }

    /// Cache entry for `source`, stored under `dir`.
    pub fn with_dir(source: &Path, dir: impl Into<PathBuf>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(source.to_string_lossy().as_bytes());
        let digest = hex::encode(hasher.finalize());
        let cache_path = dir.into().join(format!("{digest}.cache"));
        Self {
            source: source.to_path_buf(),
            cache_path,
        }
    }

    /// Whether an entry for this source has ever been written.
    pub fn exists(&self) -> bool {
        self.cache_path.exists()
    }

    /// Whether the entry was written at or after the source's last edit.
    ///
    /// This is an availability signal only: the default load path reads any
    /// existing entry without consulting it, so a stale entry keeps being
    /// served until it is removed. Callers that care can check explicitly.
    pub fn is_fresh(&self) -> io::Result<bool> {
        let source_mtime = fs::metadata(&self.source)?.modified()?;
        let cache_mtime = fs::metadata(&self.cache_path)?.modified()?;
        Ok(source_mtime <= cache_mtime)
    }

    /// Deserialize the persisted tree.
    pub fn read(&self) -> ConfigResult<ConfigTree> {
        let blob = fs::read_to_string(&self.cache_path)?;
        serde_json::from_str(&blob).map_err(|e| ConfigError::CacheCorrupt {
            path: self.cache_path.clone(),
            reason: e.to_string(),
        })
    }

    /// Serialize `tree`, replacing any prior entry.
    pub fn write(&self, tree: &ConfigTree) -> ConfigResult<()> {
        if let Some(parent) = self.cache_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let blob = serde_json::to_string(tree)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.cache_path, blob)?;
        debug!(cache = %self.cache_path.display(), "wrote cache entry");
        Ok(())
    }

    /// Delete the entry. Returns whether one existed.
    pub fn remove(&self) -> io::Result<bool> {
        if !self.cache_path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.cache_path)?;
        Ok(true)
    }

    /// Where this entry lives on disk.
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }
}
