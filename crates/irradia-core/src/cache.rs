//! Process-wide memoization of merged tables
//!
//! Re-running an analysis against the same source list must not re-read
//! and re-merge the files. The cache is keyed by the ordered
//! (group, path) list; a permuted source list merges into a different
//! row order, so it is a different table and a different key.

use crate::error::AnalysisResult;
use crate::loader::{DatasetLoader, SourceSpec};
use crate::table::MergedTable;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Shared cache of loaded tables
#[derive(Debug, Default)]
pub struct TableCache {
    entries: RwLock<HashMap<String, Arc<MergedTable>>>,
}

impl TableCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for this source list, loading it on the
    /// first request.
    ///
    /// The write lock is held across the load, so concurrent callers
    /// asking for the same sources share a single read of the files.
    /// A failed load caches nothing; the next call retries.
    pub fn get_or_load(
        &self,
        loader: &DatasetLoader,
        sources: &[SourceSpec],
    ) -> AnalysisResult<Arc<MergedTable>> {
        let key = cache_key(sources);

        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&key)
        {
            return Ok(Arc::clone(hit));
        }

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(hit) = entries.get(&key) {
            return Ok(Arc::clone(hit));
        }

        let table = Arc::new(loader.load(sources)?);
        entries.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Drop the entry for this source list, if present
    pub fn invalidate(&self, sources: &[SourceSpec]) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&cache_key(sources));
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    /// Number of cached tables
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Components are length-prefixed: a '=' or ';' inside a group or path
// must not make two differently split source lists share a key.
fn cache_key(sources: &[SourceSpec]) -> String {
    sources
        .iter()
        .map(|s| format!("{}:{}={}:{}", s.group.len(), s.group, s.path.len(), s.path))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_second_load_shares_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(&dir, "a.csv", "GHI\n1.0\n");
        let sources = [SourceSpec::new("north", &a)];

        let cache = TableCache::new();
        let loader = DatasetLoader::new();
        let first = cache.get_or_load(&loader, &sources).unwrap();
        let second = cache.get_or_load(&loader, &sources).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cached_table_survives_file_changes_until_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(&dir, "a.csv", "GHI\n1.0\n");
        let sources = [SourceSpec::new("north", &a)];

        let cache = TableCache::new();
        let loader = DatasetLoader::new();
        let before = cache.get_or_load(&loader, &sources).unwrap();
        assert_eq!(before.len(), 1);

        write_csv(&dir, "a.csv", "GHI\n1.0\n2.0\n");
        let still_cached = cache.get_or_load(&loader, &sources).unwrap();
        assert_eq!(still_cached.len(), 1);

        cache.invalidate(&sources);
        let reloaded = cache.get_or_load(&loader, &sources).unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_source_order_is_part_of_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(&dir, "a.csv", "GHI\n1.0\n");
        let b = write_csv(&dir, "b.csv", "GHI\n2.0\n");

        let forward = [SourceSpec::new("n", &a), SourceSpec::new("s", &b)];
        let backward = [SourceSpec::new("s", &b), SourceSpec::new("n", &a)];

        let cache = TableCache::new();
        let loader = DatasetLoader::new();
        let one = cache.get_or_load(&loader, &forward).unwrap();
        let two = cache.get_or_load(&loader, &backward).unwrap();

        assert!(!Arc::ptr_eq(&one, &two));
        assert_eq!(cache.len(), 2);
        assert_eq!(one.groups(), &["n".to_string(), "s".to_string()]);
        assert_eq!(two.groups(), &["s".to_string(), "n".to_string()]);
    }

    #[test]
    fn test_separator_characters_keep_keys_distinct() {
        // Joined without length prefixes, both lists would read "a=p;b=q"
        let one = [SourceSpec::new("a", "p;b=q")];
        let two = [SourceSpec::new("a", "p"), SourceSpec::new("b", "q")];
        assert_ne!(cache_key(&one), cache_key(&two));
    }

    #[test]
    fn test_failed_load_caches_nothing() {
        let cache = TableCache::new();
        let loader = DatasetLoader::new();
        let sources = [SourceSpec::new("ghost", "/no/such/file.csv")];

        assert!(cache.get_or_load(&loader, &sources).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_empties_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(&dir, "a.csv", "GHI\n1.0\n");
        let cache = TableCache::new();
        let loader = DatasetLoader::new();
        cache
            .get_or_load(&loader, &[SourceSpec::new("north", &a)])
            .unwrap();

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_readers_share_one_entry() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(&dir, "a.csv", "GHI\n1.0\n2.0\n3.0\n");
        let path = a.clone();

        let cache = Arc::new(TableCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let path = path.clone();
                std::thread::spawn(move || {
                    let loader = DatasetLoader::new();
                    cache
                        .get_or_load(&loader, &[SourceSpec::new("north", &path)])
                        .unwrap()
                        .len()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 3);
        }
        assert_eq!(cache.len(), 1);
    }
}
