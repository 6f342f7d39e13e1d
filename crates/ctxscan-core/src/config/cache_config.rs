//! Cache bounds.

use serde::{Deserialize, Serialize};

use crate::constants;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CacheConfig {
    pub ignore_filter_capacity: Option<u64>,
    pub file_type_capacity: Option<u64>,
    /// Byte budget of the file-metadata cache, not an entry count.
    pub file_metadata_max_bytes: Option<u64>,
    pub token_count_capacity: Option<u64>,
}

impl CacheConfig {
    pub fn effective_ignore_filter_capacity(&self) -> u64 {
        self.ignore_filter_capacity
            .unwrap_or(constants::DEFAULT_IGNORE_FILTER_CACHE_CAPACITY)
    }

    pub fn effective_file_type_capacity(&self) -> u64 {
        self.file_type_capacity
            .unwrap_or(constants::DEFAULT_FILE_TYPE_CACHE_CAPACITY)
    }

    pub fn effective_file_metadata_max_bytes(&self) -> u64 {
        self.file_metadata_max_bytes
            .unwrap_or(constants::DEFAULT_FILE_METADATA_CACHE_MAX_BYTES)
    }

    pub fn effective_token_count_capacity(&self) -> u64 {
        self.token_count_capacity
            .unwrap_or(constants::DEFAULT_TOKEN_CACHE_CAPACITY)
    }
}
