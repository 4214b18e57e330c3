//! Configuration loader with breadth-first import resolution.
//!
//! Processes the import graph as a queue: the root file first, then every
//! imported file in the order it was declared, appending newly discovered
//! imports at the back. Each document's top-level keys overwrite whatever
//! earlier documents produced, so imported files win over their importers
//! on key collisions.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::document::{Document, Element};
use super::merge::{merge_document, sort_by_value_desc};
use super::types::{ConfigTree, ConfigValue, Group};
use crate::cache::CacheStore;
use crate::error::{ConfigError, ConfigResult};

/// Upper bound on documents processed per load.
///
/// The import graph is not validated, so a cyclic graph keeps feeding the
/// queue forever; the bound turns that into an error instead of a hang.
/// Diamond-shaped graphs legitimately process a file more than once (each
/// pass re-applies its keys), which is why repeats are counted, not skipped.
pub const MAX_DOCUMENTS: usize = 256;

/// Loads a config tree from a root XML file, applying the disk cache.
#[derive(Debug)]
pub struct ConfigLoader {
    root: PathBuf,
    cache: CacheStore,
    use_cache: bool,
}

impl ConfigLoader {
    /// Create a loader for `root`, caching in the current directory.
    ///
    /// Fails with [`ConfigError::FileNotFound`] if `root` does not exist;
    /// nothing is parsed and no cache entry is touched in that case.
    pub fn new(root: impl Into<PathBuf>) -> ConfigResult<Self> {
        let root = root.into();
        let cache = CacheStore::new(&root);
        Self::build(root, cache)
    }

    /// Create a loader that keeps cache entries under `cache_dir`.
    pub fn with_cache_dir(
        root: impl Into<PathBuf>,
        cache_dir: impl Into<PathBuf>,
    ) -> ConfigResult<Self> {
        let root = root.into();
        let cache = CacheStore::with_dir(&root, cache_dir);
        Self::build(root, cache)
    }

    fn build(root: PathBuf, cache: CacheStore) -> ConfigResult<Self> {
        if !root.exists() {
            return Err(ConfigError::FileNotFound { path: root });
        }
        Ok(Self {
            root,
            cache,
            use_cache: true,
        })
    }

    /// Enable or disable the cache for this loader (enabled by default).
    ///
    /// Disabled means neither reads nor writes: every `load` resolves from
    /// the XML sources and leaves existing cache entries alone.
    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    /// The cache store backing this loader.
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Produce the merged config tree.
    ///
    /// If a cache entry for the root file exists it is read back as-is.
    /// Freshness is deliberately not checked: edits to the sources are not
    /// picked up until the entry is removed, a known gap kept for
    /// compatibility (see [`CacheStore::is_fresh`]). A corrupt entry is
    /// treated as a miss:
    /// the tree is rebuilt from the sources and the entry rewritten.
    pub fn load(&self) -> ConfigResult<ConfigTree> {
        if self.use_cache && self.cache.exists() {
            match self.cache.read() {
                Ok(tree) => {
                    info!(
                        root = %self.root.display(),
                        cache = %self.cache.cache_path().display(),
                        "loaded config from cache"
                    );
                    return Ok(tree);
                }
                Err(ConfigError::CacheCorrupt { path, reason }) => {
                    warn!(
                        cache = %path.display(),
                        reason = %reason,
                        "cache entry is corrupt, rebuilding from sources"
                    );
                }
                Err(other) => return Err(other),
            }
        }

        let tree = self.resolve()?;
        if self.use_cache {
            self.cache.write(&tree)?;
            debug!(cache = %self.cache.cache_path().display(), "cache entry written");
        }
        Ok(tree)
    }

    /// Resolve imports breadth-first and merge every document into one tree.
    fn resolve(&self) -> ConfigResult<ConfigTree> {
        let mut queue: VecDeque<PathBuf> = VecDeque::from([self.root.clone()]);
        let mut result = Group::new();
        let mut processed = 0usize;

        while let Some(file) = queue.pop_front() {
            processed += 1;
            if processed > MAX_DOCUMENTS {
                return Err(ConfigError::ImportLimit {
                    limit: MAX_DOCUMENTS,
                });
            }

            let document = Document::parse_file(&file)?;
            let base = file.parent().unwrap_or_else(|| Path::new("."));

            // Imports may appear anywhere in the document, not just at the
            // top level; they queue in document order behind everything
            // already pending.
            for import in document.root().descendants_named("Import") {
                match import.attr("src") {
                    Some(src) => {
                        let resolved = base.join(src);
                        debug!(
                            from = %file.display(),
                            import = %resolved.display(),
                            "queued import"
                        );
                        queue.push_back(resolved);
                    }
                    None => warn!(
                        file = %file.display(),
                        "Import element without src attribute, skipping"
                    ),
                }
            }

            let groups = parse_groups(document.root());
            let params = parse_params(document.root().children_named("Param"));
            debug!(
                file = %file.display(),
                groups = groups.len(),
                params = params.len(),
                "merging document"
            );
            merge_document(&mut result, groups);
            merge_document(&mut result, params);
        }

        sort_by_value_desc(&mut result);
        info!(
            root = %self.root.display(),
            documents = processed,
            entries = result.len(),
            "config resolved from sources"
        );
        Ok(ConfigTree::new(result))
    }
}

/// Parse the `Group` children of `scope` into a name → group mapping.
///
/// Each group's value is assembled in a local mapping (nested groups first,
/// then its own params, params winning on key collisions) and inserted
/// wholesale, replacing any earlier value under the same name.
fn parse_groups(scope: &Element) -> Group {
    let mut out = Group::new();
    for group in scope.children_named("Group") {
        let Some(name) = group.attr("name") else {
            warn!("Group element without name attribute, skipping");
            continue;
        };
        let mut body = parse_groups(group);
        merge_document(&mut body, parse_params(group.children_named("Param")));
        out.insert(name.to_string(), ConfigValue::Group(body));
    }
    out
}

/// Parse a sequence of `Param` elements into a key → value mapping.
fn parse_params<'a>(params: impl Iterator<Item = &'a Element>) -> Group {
    let mut out = Group::new();
    for param in params {
        let Some(name) = param.attr("name") else {
            warn!("Param element without name attribute, skipping");
            continue;
        };
        let value = param.attr("value").unwrap_or_default().to_string();

        if let Some(key) = name.strip_suffix("[]") {
            // Array params aggregate in document order; the value attribute
            // is used and any inner text is ignored.
            match out.get_mut(key) {
                Some(ConfigValue::List(items)) => items.push(value),
                _ => {
                    out.insert(key.to_string(), ConfigValue::List(vec![value]));
                }
            }
        } else if let Some(literal) = strip_cdata_envelope(param.raw_text()) {
            out.insert(name.to_string(), ConfigValue::Scalar(literal.to_string()));
        } else {
            out.insert(name.to_string(), ConfigValue::Scalar(value));
        }
    }
    out
}

/// The unwrapped text if `raw` is exactly a `<![CDATA[...]]>` envelope.
fn strip_cdata_envelope(raw: &str) -> Option<&str> {
    raw.strip_prefix("<![CDATA[")?.strip_suffix("]]>")
}
