//! Canonical cache key for resolved ignore filters.

use std::path::Path;

use ctxscan_core::types::ScanMode;

use crate::path::PathNormalizer;

/// `(normalized root, mode, sorted custom patterns)`.
///
/// Built only through [`IgnoreCacheKey::new`], so the resolver and the
/// introspection endpoint always agree on the key for the same inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IgnoreCacheKey {
    root: String,
    mode: ScanMode,
    patterns: String,
}

impl IgnoreCacheKey {
    pub fn new(
        normalizer: &PathNormalizer,
        root: &Path,
        mode: ScanMode,
        custom_patterns: &[String],
    ) -> Self {
        let mut sorted: Vec<&str> = custom_patterns.iter().map(|p| p.trim()).collect();
        sorted.sort_unstable();
        let patterns = serde_json::to_string(&sorted).unwrap_or_else(|_| sorted.join("\n"));
        Self {
            root: normalizer.normalize(root),
            mode,
            patterns,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(root: &str, mode: ScanMode, patterns: &[&str]) -> IgnoreCacheKey {
        let patterns: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
        IgnoreCacheKey::new(&PathNormalizer::posix(), Path::new(root), mode, &patterns)
    }

    #[test]
    fn pattern_order_does_not_matter() {
        assert_eq!(
            key("/p", ScanMode::Global, &["b", "a"]),
            key("/p", ScanMode::Global, &["a", "b"])
        );
    }

    #[test]
    fn root_spelling_is_normalized() {
        assert_eq!(
            key("/p/./src/", ScanMode::Automatic, &[]),
            key("/p/src", ScanMode::Automatic, &[])
        );
    }

    #[test]
    fn mode_and_patterns_distinguish_keys() {
        assert_ne!(
            key("/p", ScanMode::Global, &[]),
            key("/p", ScanMode::Automatic, &[])
        );
        assert_ne!(
            key("/p", ScanMode::Global, &["a"]),
            key("/p", ScanMode::Global, &["a", "b"])
        );
    }

    #[test]
    fn joined_patterns_cannot_collide() {
        assert_ne!(
            key("/p", ScanMode::Global, &["a\nb"]),
            key("/p", ScanMode::Global, &["a", "b"])
        );
    }
}
