use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::dataset::{self, DataSources, Dataset};
use crate::error::DataError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SourceKey {
    matches: PathBuf,
    deliveries: PathBuf,
}

impl SourceKey {
    fn for_sources(sources: &DataSources) -> Self {
        Self {
            matches: identity(&sources.matches),
            deliveries: identity(&sources.deliveries),
        }
    }
}

/// Two spellings of the same file share an entry; a path that cannot be
/// canonicalised (usually because it does not exist yet) keys on itself.
fn identity(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Memoises dataset loads per source pair.
///
/// Entries live until [`DatasetCache::invalidate`] or [`DatasetCache::reload`]
/// is called; file changes on disk are not noticed on their own. Failed loads
/// are never cached.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<SourceKey, Arc<Dataset>>,
    loads: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, sources: &DataSources) -> Result<Arc<Dataset>, DataError> {
        let key = SourceKey::for_sources(sources);
        if let Some(hit) = self.entries.get(&key) {
            debug!(matches = %key.matches.display(), "dataset cache hit");
            return Ok(Arc::clone(hit));
        }

        let loaded = Arc::new(dataset::load(sources)?);
        self.loads += 1;
        self.entries.insert(key, Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Drops the entry for `sources` and reads them again.
    pub fn reload(&mut self, sources: &DataSources) -> Result<Arc<Dataset>, DataError> {
        self.invalidate(sources);
        info!(matches = %sources.matches.display(), "reloading dataset");
        self.get_or_load(sources)
    }

    pub fn invalidate(&mut self, sources: &DataSources) -> bool {
        self.entries
            .remove(&SourceKey::for_sources(sources))
            .is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of successful reads from disk over the cache's lifetime.
    pub fn load_count(&self) -> usize {
        self.loads
    }
}
