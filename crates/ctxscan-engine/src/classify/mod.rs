//! File classification: binary-ness, size class, and token estimation.
//!
//! All checks here are CPU-bound once their caches are warm. The scanner
//! calls them only after an entry has passed the ignore filter.

pub mod binary;
pub mod tokens;

use std::path::Path;

use ctxscan_core::config::CtxscanConfig;

pub use binary::FileTypeCache;
pub use tokens::{heuristic_tokens, TokenEstimator};

/// Whether a file's content may be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Normal,
    /// Above the configured maximum; reported as skipped without a read.
    Oversized,
}

/// Decides how a file is treated once it passes the ignore filter.
pub struct FileClassifier {
    file_types: FileTypeCache,
    tokens: TokenEstimator,
    max_file_size: u64,
}

impl FileClassifier {
    pub fn new(config: &CtxscanConfig) -> Self {
        Self {
            file_types: FileTypeCache::new(
                config.filter.effective_binary_extensions(),
                config.cache.effective_file_type_capacity(),
            ),
            tokens: TokenEstimator::new(
                config.scan.effective_accurate_token_count(),
                config.cache.effective_token_count_capacity(),
            ),
            max_file_size: config.scan.effective_max_file_size(),
        }
    }

    pub fn is_binary(&self, path: &Path) -> bool {
        self.file_types.is_binary(path)
    }

    pub fn size_class(&self, byte_size: u64) -> SizeClass {
        if byte_size > self.max_file_size {
            SizeClass::Oversized
        } else {
            SizeClass::Normal
        }
    }

    pub fn estimate_tokens(&self, text: &str) -> usize {
        self.tokens.estimate(text)
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn file_types(&self) -> &FileTypeCache {
        &self.file_types
    }

    /// Drop the file-type and token-count caches.
    pub fn clear_caches(&self) {
        self.file_types.clear();
        self.tokens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(max: u64) -> FileClassifier {
        let mut config = CtxscanConfig::default();
        config.scan.max_file_size = Some(max);
        config.scan.accurate_token_count = Some(false);
        FileClassifier::new(&config)
    }

    #[test]
    fn size_threshold_is_inclusive() {
        let c = classifier(5 * 1024 * 1024);
        assert_eq!(c.size_class(5 * 1024 * 1024), SizeClass::Normal);
        assert_eq!(c.size_class(6_291_456), SizeClass::Oversized);
        assert_eq!(c.size_class(0), SizeClass::Normal);
    }

    #[test]
    fn binary_by_extension() {
        let c = classifier(1024);
        assert!(c.is_binary(Path::new("/p/a.png")));
        assert!(c.is_binary(Path::new("/p/A.PNG")));
        assert!(!c.is_binary(Path::new("/p/a.txt")));
        assert!(!c.is_binary(Path::new("/p/Makefile")));
    }

    #[test]
    fn heuristic_tokens_when_tokenizer_disabled() {
        let c = classifier(1024);
        assert_eq!(c.estimate_tokens("abcdefghi"), 3);
        assert_eq!(c.estimate_tokens(""), 0);
    }
}
