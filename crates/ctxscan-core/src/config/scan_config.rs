//! Scanner configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for the directory scanner.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Files larger than this are reported as skipped. Default: 5 MiB.
    pub max_file_size: Option<u64>,
    /// Directories walked concurrently per batch. Default: 4.
    pub directory_batch_width: Option<usize>,
    /// Files processed concurrently per chunk. Default: 20.
    pub file_chunk_size: Option<usize>,
    /// Scan deadline in seconds. Default: 300.
    pub timeout_secs: Option<u64>,
    /// Maximum depth below the root. Default: 128.
    pub max_depth: Option<usize>,
    /// Follow symbolic links inside the root. Default: false.
    pub follow_symlinks: Option<bool>,
    /// Use the subword tokenizer rather than the length heuristic. Default: true.
    pub accurate_token_count: Option<bool>,
}

impl ScanConfig {
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(constants::DEFAULT_MAX_FILE_SIZE)
    }

    pub fn effective_directory_batch_width(&self) -> usize {
        self.directory_batch_width
            .unwrap_or(constants::DEFAULT_DIRECTORY_BATCH_WIDTH)
            .max(1)
    }

    pub fn effective_file_chunk_size(&self) -> usize {
        self.file_chunk_size
            .unwrap_or(constants::DEFAULT_FILE_CHUNK_SIZE)
            .max(1)
    }

    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(constants::DEFAULT_TIMEOUT_SECS))
    }

    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.unwrap_or(constants::DEFAULT_MAX_DEPTH)
    }

    pub fn effective_follow_symlinks(&self) -> bool {
        self.follow_symlinks.unwrap_or(false)
    }

    pub fn effective_accurate_token_count(&self) -> bool {
        self.accurate_token_count.unwrap_or(true)
    }
}
