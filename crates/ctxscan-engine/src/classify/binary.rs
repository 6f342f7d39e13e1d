//! Extension-based binary detection with a lazily populated cache.

use std::path::Path;

use ctxscan_core::types::collections::FxHashSet;

use crate::cache::ClearableCache;

/// Maps lowercase extensions to binary-ness.
///
/// Entries are populated on first lookup and never invalidated individually;
/// extension to binary-ness is stable for the life of the process.
pub struct FileTypeCache {
    binary_extensions: FxHashSet<String>,
    cache: ClearableCache<String, bool>,
}

impl FileTypeCache {
    pub fn new(binary_extensions: impl IntoIterator<Item = String>, capacity: u64) -> Self {
        Self {
            binary_extensions: binary_extensions.into_iter().collect(),
            cache: ClearableCache::new(capacity),
        }
    }

    pub fn is_binary(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();
        if let Some(hit) = self.cache.get(&ext) {
            return hit;
        }
        let binary = self.binary_extensions.contains(&ext);
        self.cache.insert(ext, binary);
        binary
    }

    /// Whether `ext` has been looked up since the last clear.
    pub fn contains(&self, ext: &str) -> bool {
        self.cache.contains_key(&ext.to_ascii_lowercase())
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}
