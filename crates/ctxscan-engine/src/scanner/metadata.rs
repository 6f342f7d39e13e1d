//! Per-path cache of previously built file records.

use std::sync::Arc;

use ctxscan_core::types::{FileRecord, SkipReason};

use crate::cache::ClearableCache;

/// Keyed by absolute normalized path. Only records that reflect the file
/// itself (text, binary, oversized) are stored; transient read failures are
/// retried on the next scan.
///
/// Bounded by bytes held, not by entry count: one text record can carry
/// several megabytes of content.
pub struct FileMetadataCache {
    records: ClearableCache<String, Arc<FileRecord>>,
}

impl FileMetadataCache {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            records: ClearableCache::weighted(max_bytes, record_weight),
        }
    }

    /// The cached record for `path`, re-expressed relative to the current
    /// scan root.
    pub fn get(&self, path: &str, relative_path: &str) -> Option<FileRecord> {
        self.records.get(&path.to_string()).map(|cached| {
            let mut record = FileRecord::clone(&cached);
            if record.relative_path != relative_path {
                record.relative_path = relative_path.to_string();
            }
            record
        })
    }

    pub fn insert(&self, record: &FileRecord) {
        let cacheable = !record.is_skipped
            || record.skip_reason == Some(SkipReason::TooLarge);
        if cacheable {
            self.records.insert(record.path.clone(), Arc::new(record.clone()));
        }
    }

    pub fn clear(&self) {
        self.records.clear();
    }

    /// Bytes currently held.
    pub fn weighted_size(&self) -> u64 {
        self.records.weighted_size()
    }
}

fn record_weight(key: &String, record: &Arc<FileRecord>) -> u32 {
    let bytes = key.len()
        + record.name.len()
        + record.path.len()
        + record.relative_path.len()
        + record.content.as_ref().map_or(0, String::len);
    u32::try_from(bytes).unwrap_or(u32::MAX)
}
